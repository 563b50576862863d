use serde::{Deserialize, Serialize};

use super::Entity;
use crate::config::{catalog, EntityDef};
use crate::error::AppError;
use crate::service::validation::require_text;
use crate::service::Validate;

pub struct Category;

impl Entity for Category {
    type Create = CategoryCreate;
    type Update = CategoryUpdate;
    type Read = CategoryRead;

    fn def() -> &'static EntityDef {
        &catalog::CATEGORY
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryRead {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl Validate for CategoryCreate {
    fn validate(&self) -> Result<(), AppError> {
        require_text("name", &self.name)
    }
}

impl Validate for CategoryUpdate {
    fn validate(&self) -> Result<(), AppError> {
        require_text("name", &self.name)
    }
}
