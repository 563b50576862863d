use serde::{Deserialize, Serialize};

use super::Entity;
use crate::config::{catalog, EntityDef};
use crate::error::AppError;
use crate::service::validation::require_text;
use crate::service::Validate;

pub struct Tag;

impl Entity for Tag {
    type Create = TagCreate;
    type Update = TagUpdate;
    type Read = TagRead;

    fn def() -> &'static EntityDef {
        &catalog::TAG
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TagCreate {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TagUpdate {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TagRead {
    pub id: i64,
    pub name: String,
}

impl Validate for TagCreate {
    fn validate(&self) -> Result<(), AppError> {
        require_text("name", &self.name)
    }
}

impl Validate for TagUpdate {
    fn validate(&self) -> Result<(), AppError> {
        require_text("name", &self.name)
    }
}
