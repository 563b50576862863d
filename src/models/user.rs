use serde::{Deserialize, Serialize};

use super::Entity;
use crate::access::Role;
use crate::config::{catalog, EntityDef};
use crate::error::AppError;
use crate::service::validation::{check_email, check_phone, optional, require_text};
use crate::service::Validate;

pub struct User;

impl Entity for User {
    type Create = UserCreate;
    type Update = UserUpdate;
    type Read = UserRead;

    fn def() -> &'static EntityDef {
        &catalog::USER
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserCreate {
    pub name: String,
    #[serde(default)]
    pub surname: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Role,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub surname: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Role,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserRead {
    pub id: i64,
    pub name: String,
    pub surname: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub image: Option<String>,
}

fn validate_fields(name: &str, email: &str, phone: Option<&str>) -> Result<(), AppError> {
    require_text("name", name)?;
    check_email("email", email)?;
    optional("phone", phone, check_phone)
}

impl Validate for UserCreate {
    fn validate(&self) -> Result<(), AppError> {
        validate_fields(&self.name, &self.email, self.phone.as_deref())
    }
}

impl Validate for UserUpdate {
    fn validate(&self) -> Result<(), AppError> {
        validate_fields(&self.name, &self.email, self.phone.as_deref())
    }
}
