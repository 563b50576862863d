//! Static table, association and entity definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::images::Directory;

/// Column type; drives DDL, the SQL cast on bound parameters and row decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    BigInt,
    Text,
    Timestamp,
    Json,
}

impl ColumnKind {
    pub fn pg_type(self) -> &'static str {
        match self {
            ColumnKind::BigInt => "bigint",
            ColumnKind::Text => "text",
            ColumnKind::Timestamp => "timestamp",
            ColumnKind::Json => "jsonb",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ColumnDef {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub nullable: bool,
    pub unique: bool,
    /// Referenced table (always its `id`).
    pub references: Option<&'static str>,
}

impl ColumnDef {
    pub const fn new(name: &'static str, kind: ColumnKind) -> Self {
        ColumnDef {
            name,
            kind,
            nullable: false,
            unique: false,
            references: None,
        }
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub const fn references(mut self, table: &'static str) -> Self {
        self.references = Some(table);
        self
    }
}

/// A table with an implicit `id BIGSERIAL PRIMARY KEY` followed by `columns`.
#[derive(Debug)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
}

pub const ID_COLUMN: &str = "id";

impl TableDef {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        name == ID_COLUMN || self.column(name).is_some()
    }

    pub fn foreign_keys(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|c| c.references.is_some())
    }
}

/// Role tag naming one side of an association (and the parent entity type it points to).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Tour,
    Event,
    Category,
    Tag,
    University,
    User,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Tour => "tour",
            EntityKind::Event => "event",
            EntityKind::Category => "category",
            EntityKind::Tag => "tag",
            EntityKind::University => "university",
            EntityKind::User => "user",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Join table linking two parents. `fields` maps each role tag to its FK column.
#[derive(Debug)]
pub struct AssociationDef {
    pub table: &'static TableDef,
    pub fields: [(EntityKind, &'static str); 2],
}

impl AssociationDef {
    pub fn column(&self, role: EntityKind) -> Option<&'static str> {
        self.fields.iter().find(|(k, _)| *k == role).map(|(_, c)| *c)
    }

    /// The side opposite to `role`.
    pub fn other(&self, role: EntityKind) -> Option<(EntityKind, &'static str)> {
        match self.fields {
            [(a, _), b] if a == role => Some(b),
            [a, (b, _)] if b == role => Some(a),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.table.name
    }
}

/// One entry of a parent's dependency registry.
#[derive(Debug)]
pub struct Dependency {
    pub association: &'static AssociationDef,
    pub role: EntityKind,
}

/// Id list carried on create/update payloads and resolved on reads
/// (e.g. `events` on a tour, stored in `tour_event`).
#[derive(Debug)]
pub struct LinkedIds {
    pub field: &'static str,
    pub association: &'static AssociationDef,
    pub own: EntityKind,
    pub other: EntityKind,
    /// Table the linked ids point into.
    pub target: &'static TableDef,
}

/// Per-entity configuration: table, names used in messages and data keys,
/// image namespace and dependency registry.
#[derive(Debug)]
pub struct EntityDef {
    pub kind: EntityKind,
    pub table: &'static TableDef,
    /// Human name used in messages ("tour").
    pub name: &'static str,
    /// Data key for lists ("tours").
    pub plural: &'static str,
    pub image: Option<ImageSlot>,
    pub dependencies: &'static [Dependency],
    pub linked: Option<LinkedIds>,
}

#[derive(Clone, Copy, Debug)]
pub struct ImageSlot {
    pub column: &'static str,
    pub directory: Directory,
}

#[cfg(test)]
mod tests {
    use super::*;

    static LEFT: TableDef = TableDef {
        name: "left",
        columns: &[],
    };
    static PAIR_COLUMNS: [ColumnDef; 2] = [
        ColumnDef::new("tour_id", ColumnKind::BigInt).references("tour"),
        ColumnDef::new("event_id", ColumnKind::BigInt).references("event"),
    ];
    static PAIR: TableDef = TableDef {
        name: "pair",
        columns: &PAIR_COLUMNS,
    };
    static ASSOC: AssociationDef = AssociationDef {
        table: &PAIR,
        fields: [(EntityKind::Tour, "tour_id"), (EntityKind::Event, "event_id")],
    };

    #[test]
    fn other_side_is_resolved_in_both_directions() {
        assert_eq!(ASSOC.other(EntityKind::Tour), Some((EntityKind::Event, "event_id")));
        assert_eq!(ASSOC.other(EntityKind::Event), Some((EntityKind::Tour, "tour_id")));
        assert_eq!(ASSOC.other(EntityKind::Tag), None);
        assert_eq!(ASSOC.column(EntityKind::Tag), None);
    }

    #[test]
    fn id_is_always_a_column() {
        assert!(LEFT.has_column("id"));
        assert!(!LEFT.has_column("name"));
        assert_eq!(PAIR.foreign_keys().count(), 2);
    }
}
