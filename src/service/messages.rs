//! Envelope texts, derived from the entity's names.

use crate::config::{AssociationDef, EntityDef, EntityKind};

fn capitalized(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Messages {
    name: &'static str,
    plural: &'static str,
}

impl Messages {
    pub fn of(def: &EntityDef) -> Self {
        Messages {
            name: def.name,
            plural: def.plural,
        }
    }

    pub fn get_all_success(&self) -> String {
        format!("{} fetched successfully", capitalized(self.plural))
    }

    pub fn get_all_error(&self) -> String {
        format!("Failed to fetch {}", self.plural)
    }

    pub fn get_one_success(&self, id: i64) -> String {
        format!("{} with id={} fetched successfully", capitalized(self.name), id)
    }

    pub fn get_one_error(&self, id: i64) -> String {
        format!("Failed to fetch {} with id={}", self.name, id)
    }

    pub fn create_success(&self) -> String {
        format!("{} created successfully", capitalized(self.name))
    }

    pub fn create_error(&self) -> String {
        format!("Failed to create {}", self.name)
    }

    pub fn update_success(&self, id: i64) -> String {
        format!("{} with id={} updated successfully", capitalized(self.name), id)
    }

    pub fn update_error(&self, id: i64) -> String {
        format!("Failed to update {} with id={}", self.name, id)
    }

    pub fn delete_success(&self, id: i64) -> String {
        format!("{} with id={} deleted successfully", capitalized(self.name), id)
    }

    pub fn delete_error(&self, id: i64) -> String {
        format!("Failed to delete {} with id={}", self.name, id)
    }

    /// A cascade step failed; names the association that could not be cleared.
    pub fn dependency_error(&self, association: &str, id: i64) -> String {
        format!("Failed to delete {} rows of {} with id={}", association, self.name, id)
    }

    pub fn image_success(&self, id: i64) -> String {
        format!("Image of {} with id={} updated successfully", self.name, id)
    }

    pub fn image_error(&self, id: i64) -> String {
        format!("Failed to update image of {} with id={}", self.name, id)
    }

    pub fn by_category_success(&self) -> String {
        format!("{} filtered by category fetched successfully", capitalized(self.plural))
    }

    pub fn wrong_id(&self, id: i64) -> String {
        format!("There is no {} with id={}", self.name, id)
    }

    pub fn id_mismatch(&self, path_id: i64, body_id: i64) -> String {
        format!("Path id={} does not match {} id={} in the body", path_id, self.name, body_id)
    }

    pub fn no_image(&self, id: i64) -> String {
        format!("{} with id={} has no image", capitalized(self.name), id)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct AssociationMessages {
    table: &'static str,
}

impl AssociationMessages {
    pub fn of(def: &AssociationDef) -> Self {
        AssociationMessages { table: def.name() }
    }

    pub fn filter_success(&self, role: EntityKind, value: i64) -> String {
        format!("{} rows with {} id={} fetched successfully", self.table, role, value)
    }

    pub fn filter_error(&self, role: EntityKind, value: i64) -> String {
        format!("Failed to fetch {} rows with {} id={}", self.table, role, value)
    }

    pub fn create_success(&self) -> String {
        format!("{} rows created successfully", self.table)
    }

    pub fn create_error(&self) -> String {
        format!("Failed to create {} rows", self.table)
    }

    pub fn delete_success(&self) -> String {
        format!("{} rows deleted successfully", self.table)
    }

    pub fn delete_error(&self) -> String {
        format!("Failed to delete {} rows", self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::catalog::{TOUR, TOUR_EVENT};

    #[test]
    fn texts_use_entity_names() {
        let m = Messages::of(&TOUR);
        assert_eq!(m.get_all_success(), "Tours fetched successfully");
        assert_eq!(m.update_error(4), "Failed to update tour with id=4");
        assert_eq!(m.wrong_id(4), "There is no tour with id=4");
        let a = AssociationMessages::of(&TOUR_EVENT);
        assert_eq!(a.filter_success(EntityKind::Tour, 2), "tour_event rows with tour id=2 fetched successfully");
    }
}
