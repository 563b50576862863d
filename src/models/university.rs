use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{Address, Entity};
use crate::config::{catalog, EntityDef};
use crate::dates::wall_clock_option;
use crate::error::AppError;
use crate::service::validation::{check_email, check_phone, check_url, optional, require_text};
use crate::service::Validate;

pub struct University;

impl Entity for University {
    type Create = UniversityCreate;
    type Update = UniversityUpdate;
    type Read = UniversityRead;

    fn def() -> &'static EntityDef {
        &catalog::UNIVERSITY
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UniversityCreate {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "wall_clock_option")]
    pub reg_date: Option<NaiveDateTime>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UniversityUpdate {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "wall_clock_option")]
    pub reg_date: Option<NaiveDateTime>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UniversityRead {
    pub id: i64,
    pub name: String,
    pub url: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<Address>,
    pub description: Option<String>,
    #[serde(default, with = "wall_clock_option")]
    pub reg_date: Option<NaiveDateTime>,
    pub image: Option<String>,
}

fn validate_contacts(name: &str, url: Option<&str>, phone: Option<&str>, email: Option<&str>) -> Result<(), AppError> {
    require_text("name", name)?;
    optional("url", url, check_url)?;
    optional("phone", phone, check_phone)?;
    optional("email", email, check_email)
}

impl Validate for UniversityCreate {
    fn validate(&self) -> Result<(), AppError> {
        validate_contacts(&self.name, self.url.as_deref(), self.phone.as_deref(), self.email.as_deref())
    }
}

impl Validate for UniversityUpdate {
    fn validate(&self) -> Result<(), AppError> {
        validate_contacts(&self.name, self.url.as_deref(), self.phone.as_deref(), self.email.as_deref())
    }
}

/// Body of `POST /university/{id}/tours`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniversityTourLink {
    pub university_id: i64,
    pub tour_id: i64,
}

/// Body of `POST /university/{id}/events`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniversityEventLink {
    pub university_id: i64,
    pub event_id: i64,
}
