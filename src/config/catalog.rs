//! The platform's tables, associations and per-entity registries.

use super::types::{
    AssociationDef, ColumnDef, ColumnKind, Dependency, EntityDef, EntityKind, ImageSlot, LinkedIds, TableDef,
};
use crate::images::Directory;

use ColumnKind::{BigInt, Json, Text, Timestamp};

static CATEGORY_COLUMNS: [ColumnDef; 2] = [
    ColumnDef::new("name", Text).unique(),
    ColumnDef::new("description", Text).nullable(),
];
pub static CATEGORY_TABLE: TableDef = TableDef {
    name: "category",
    columns: &CATEGORY_COLUMNS,
};

static TAG_COLUMNS: [ColumnDef; 1] = [ColumnDef::new("name", Text).unique()];
pub static TAG_TABLE: TableDef = TableDef {
    name: "tag",
    columns: &TAG_COLUMNS,
};

static TOUR_COLUMNS: [ColumnDef; 8] = [
    ColumnDef::new("name", Text),
    ColumnDef::new("address", Json).nullable(),
    ColumnDef::new("description", Text),
    ColumnDef::new("date_start", Timestamp),
    ColumnDef::new("date_end", Timestamp),
    ColumnDef::new("reg_deadline", Timestamp),
    ColumnDef::new("max_users", BigInt),
    ColumnDef::new("image", Text).nullable(),
];
pub static TOUR_TABLE: TableDef = TableDef {
    name: "tour",
    columns: &TOUR_COLUMNS,
};

static EVENT_COLUMNS: [ColumnDef; 6] = [
    ColumnDef::new("name", Text),
    ColumnDef::new("description", Text).nullable(),
    ColumnDef::new("address", Json).nullable(),
    ColumnDef::new("date", Timestamp),
    ColumnDef::new("category_id", BigInt).references("category"),
    ColumnDef::new("image", Text).nullable(),
];
pub static EVENT_TABLE: TableDef = TableDef {
    name: "event",
    columns: &EVENT_COLUMNS,
};

static UNIVERSITY_COLUMNS: [ColumnDef; 8] = [
    ColumnDef::new("name", Text),
    ColumnDef::new("url", Text).nullable(),
    ColumnDef::new("phone", Text).nullable(),
    ColumnDef::new("email", Text).nullable(),
    ColumnDef::new("address", Json).nullable(),
    ColumnDef::new("description", Text).nullable(),
    ColumnDef::new("reg_date", Timestamp).nullable(),
    ColumnDef::new("image", Text).nullable(),
];
pub static UNIVERSITY_TABLE: TableDef = TableDef {
    name: "university",
    columns: &UNIVERSITY_COLUMNS,
};

// `user` is reserved in PostgreSQL.
static USER_COLUMNS: [ColumnDef; 6] = [
    ColumnDef::new("name", Text),
    ColumnDef::new("surname", Text).nullable(),
    ColumnDef::new("email", Text).unique(),
    ColumnDef::new("phone", Text).nullable(),
    ColumnDef::new("role", Text),
    ColumnDef::new("image", Text).nullable(),
];
pub static USER_TABLE: TableDef = TableDef {
    name: "app_user",
    columns: &USER_COLUMNS,
};

macro_rules! association {
    ($table:ident, $assoc:ident, $name:literal, ($a:ident, $a_col:literal, $a_ref:literal), ($b:ident, $b_col:literal, $b_ref:literal)) => {
        pub static $table: TableDef = TableDef {
            name: $name,
            columns: &[
                ColumnDef::new($a_col, BigInt).references($a_ref),
                ColumnDef::new($b_col, BigInt).references($b_ref),
            ],
        };
        pub static $assoc: AssociationDef = AssociationDef {
            table: &$table,
            fields: [(EntityKind::$a, $a_col), (EntityKind::$b, $b_col)],
        };
    };
}

association!(TOUR_EVENT_TABLE, TOUR_EVENT, "tour_event", (Tour, "tour_id", "tour"), (Event, "event_id", "event"));
association!(EVENT_TAG_TABLE, EVENT_TAG, "event_tag", (Event, "event_id", "event"), (Tag, "tag_id", "tag"));
association!(
    UNIVERSITY_TOUR_TABLE,
    UNIVERSITY_TOUR,
    "university_tour",
    (University, "university_id", "university"),
    (Tour, "tour_id", "tour")
);
association!(
    UNIVERSITY_EVENT_TABLE,
    UNIVERSITY_EVENT,
    "university_event",
    (University, "university_id", "university"),
    (Event, "event_id", "event")
);
association!(USER_EVENT_TABLE, USER_EVENT, "user_event", (User, "user_id", "app_user"), (Event, "event_id", "event"));
association!(USER_TOUR_TABLE, USER_TOUR, "user_tour", (User, "user_id", "app_user"), (Tour, "tour_id", "tour"));
association!(
    USER_UNIVERSITY_TABLE,
    USER_UNIVERSITY,
    "user_university",
    (User, "user_id", "app_user"),
    (University, "university_id", "university")
);

static TOUR_DEPENDENCIES: [Dependency; 3] = [
    Dependency { association: &TOUR_EVENT, role: EntityKind::Tour },
    Dependency { association: &UNIVERSITY_TOUR, role: EntityKind::Tour },
    Dependency { association: &USER_TOUR, role: EntityKind::Tour },
];

static EVENT_DEPENDENCIES: [Dependency; 4] = [
    Dependency { association: &EVENT_TAG, role: EntityKind::Event },
    Dependency { association: &TOUR_EVENT, role: EntityKind::Event },
    Dependency { association: &UNIVERSITY_EVENT, role: EntityKind::Event },
    Dependency { association: &USER_EVENT, role: EntityKind::Event },
];

static TAG_DEPENDENCIES: [Dependency; 1] = [Dependency { association: &EVENT_TAG, role: EntityKind::Tag }];

static UNIVERSITY_DEPENDENCIES: [Dependency; 3] = [
    Dependency { association: &UNIVERSITY_TOUR, role: EntityKind::University },
    Dependency { association: &UNIVERSITY_EVENT, role: EntityKind::University },
    Dependency { association: &USER_UNIVERSITY, role: EntityKind::University },
];

static USER_DEPENDENCIES: [Dependency; 3] = [
    Dependency { association: &USER_EVENT, role: EntityKind::User },
    Dependency { association: &USER_TOUR, role: EntityKind::User },
    Dependency { association: &USER_UNIVERSITY, role: EntityKind::User },
];

pub static CATEGORY: EntityDef = EntityDef {
    kind: EntityKind::Category,
    table: &CATEGORY_TABLE,
    name: "category",
    plural: "categories",
    image: None,
    dependencies: &[],
    linked: None,
};

pub static TAG: EntityDef = EntityDef {
    kind: EntityKind::Tag,
    table: &TAG_TABLE,
    name: "tag",
    plural: "tags",
    image: None,
    dependencies: &TAG_DEPENDENCIES,
    linked: None,
};

pub static TOUR: EntityDef = EntityDef {
    kind: EntityKind::Tour,
    table: &TOUR_TABLE,
    name: "tour",
    plural: "tours",
    image: Some(ImageSlot {
        column: "image",
        directory: Directory::Tour,
    }),
    dependencies: &TOUR_DEPENDENCIES,
    linked: Some(LinkedIds {
        field: "events",
        association: &TOUR_EVENT,
        own: EntityKind::Tour,
        other: EntityKind::Event,
        target: &EVENT_TABLE,
    }),
};

pub static EVENT: EntityDef = EntityDef {
    kind: EntityKind::Event,
    table: &EVENT_TABLE,
    name: "event",
    plural: "events",
    image: Some(ImageSlot {
        column: "image",
        directory: Directory::Event,
    }),
    dependencies: &EVENT_DEPENDENCIES,
    linked: None,
};

pub static UNIVERSITY: EntityDef = EntityDef {
    kind: EntityKind::University,
    table: &UNIVERSITY_TABLE,
    name: "university",
    plural: "universities",
    image: Some(ImageSlot {
        column: "image",
        directory: Directory::University,
    }),
    dependencies: &UNIVERSITY_DEPENDENCIES,
    linked: None,
};

pub static USER: EntityDef = EntityDef {
    kind: EntityKind::User,
    table: &USER_TABLE,
    name: "user",
    plural: "users",
    image: Some(ImageSlot {
        column: "image",
        directory: Directory::User,
    }),
    dependencies: &USER_DEPENDENCIES,
    linked: None,
};

/// Tables in creation order (referenced tables first).
pub static TABLES: [&TableDef; 13] = [
    &CATEGORY_TABLE,
    &TAG_TABLE,
    &TOUR_TABLE,
    &EVENT_TABLE,
    &UNIVERSITY_TABLE,
    &USER_TABLE,
    &TOUR_EVENT_TABLE,
    &EVENT_TAG_TABLE,
    &UNIVERSITY_TOUR_TABLE,
    &UNIVERSITY_EVENT_TABLE,
    &USER_EVENT_TABLE,
    &USER_TOUR_TABLE,
    &USER_UNIVERSITY_TABLE,
];

pub static ENTITIES: [&EntityDef; 6] = [&CATEGORY, &TAG, &TOUR, &EVENT, &UNIVERSITY, &USER];

pub static ASSOCIATIONS: [&AssociationDef; 7] = [
    &TOUR_EVENT,
    &EVENT_TAG,
    &UNIVERSITY_TOUR,
    &UNIVERSITY_EVENT,
    &USER_EVENT,
    &USER_TOUR,
    &USER_UNIVERSITY,
];
