//! Registry validation: every association FK pointing at a parent must be in that parent's registry.

use crate::config::{AssociationDef, EntityDef, TableDef};
use crate::error::ConfigError;

pub fn validate(
    tables: &[&'static TableDef],
    entities: &[&'static EntityDef],
    associations: &[&'static AssociationDef],
) -> Result<(), ConfigError> {
    for table in tables {
        for fk in table.foreign_keys() {
            let target = fk.references.unwrap_or_default();
            if !tables.iter().any(|t| t.name == target) {
                return Err(ConfigError::MissingReference {
                    kind: "table",
                    id: format!("{} (from {}.{})", target, table.name, fk.name),
                });
            }
        }
    }

    for assoc in associations {
        for (role, column) in assoc.fields {
            let col = assoc.table.column(column).ok_or(ConfigError::UnknownColumn {
                table: assoc.table.name,
                column,
            })?;
            let parent = entities
                .iter()
                .find(|e| e.kind == role)
                .ok_or_else(|| ConfigError::MissingReference {
                    kind: "entity",
                    id: role.to_string(),
                })?;
            if col.references != Some(parent.table.name) {
                return Err(ConfigError::MissingReference {
                    kind: "foreign key",
                    id: format!("{}.{} -> {}", assoc.table.name, column, parent.table.name),
                });
            }
            let registered = parent
                .dependencies
                .iter()
                .any(|d| d.role == role && d.association.table.name == assoc.table.name);
            if !registered {
                return Err(ConfigError::MissingDependency {
                    parent: role,
                    association: assoc.table.name,
                    column,
                });
            }
        }
    }

    for entity in entities {
        for dep in entity.dependencies {
            if dep.association.column(dep.role).is_none() || dep.role != entity.kind {
                return Err(ConfigError::MissingReference {
                    kind: "dependency side",
                    id: format!("{} in {}", dep.role, dep.association.table.name),
                });
            }
        }
        if let Some(linked) = &entity.linked {
            let target = linked
                .association
                .column(linked.other)
                .and_then(|c| linked.association.table.column(c))
                .and_then(|c| c.references);
            if linked.association.column(linked.own).is_none() || target != Some(linked.target.name) {
                return Err(ConfigError::MissingReference {
                    kind: "linked ids",
                    id: format!("{}.{}", entity.name, linked.field),
                });
            }
        }
        if let Some(slot) = entity.image {
            if entity.table.column(slot.column).is_none() {
                return Err(ConfigError::UnknownColumn {
                    table: entity.table.name,
                    column: slot.column,
                });
            }
        }
    }
    Ok(())
}

/// Validates the built-in catalogue.
pub fn validate_catalog() -> Result<(), ConfigError> {
    use crate::config::catalog::{ASSOCIATIONS, ENTITIES, TABLES};
    validate(&TABLES, &ENTITIES, &ASSOCIATIONS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::catalog::*;
    use crate::config::{Dependency, EntityKind};

    #[test]
    fn builtin_catalog_is_consistent() {
        validate_catalog().unwrap();
    }

    static TAG_WITHOUT_REGISTRY: EntityDef = EntityDef {
        kind: EntityKind::Tag,
        table: &TAG_TABLE,
        name: "tag",
        plural: "tags",
        image: None,
        dependencies: &[],
        linked: None,
    };

    #[test]
    fn missing_registry_entry_is_rejected() {
        let entities = [&CATEGORY, &TAG_WITHOUT_REGISTRY, &TOUR, &EVENT, &UNIVERSITY, &USER];
        let err = validate(&TABLES, &entities, &ASSOCIATIONS).unwrap_err();
        match err {
            ConfigError::MissingDependency { parent, association, .. } => {
                assert_eq!(parent, EntityKind::Tag);
                assert_eq!(association, "event_tag");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    static WRONG_SIDE: [Dependency; 1] = [Dependency {
        association: &EVENT_TAG,
        role: EntityKind::Event,
    }];
    static TAG_WRONG_SIDE: EntityDef = EntityDef {
        kind: EntityKind::Tag,
        table: &TAG_TABLE,
        name: "tag",
        plural: "tags",
        image: None,
        dependencies: &WRONG_SIDE,
        linked: None,
    };

    #[test]
    fn registry_on_the_wrong_side_is_rejected() {
        let entities = [&CATEGORY, &TAG_WRONG_SIDE, &TOUR, &EVENT, &UNIVERSITY, &USER];
        assert!(validate(&TABLES, &entities, &ASSOCIATIONS).is_err());
    }
}
