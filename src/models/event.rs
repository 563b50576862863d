use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{Address, Entity};
use crate::config::{catalog, EntityDef};
use crate::dates::wall_clock;
use crate::error::AppError;
use crate::service::validation::{check_positive, require_text};
use crate::service::Validate;

pub struct Event;

impl Entity for Event {
    type Create = EventCreate;
    type Update = EventUpdate;
    type Read = EventRead;

    fn def() -> &'static EntityDef {
        &catalog::EVENT
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(with = "wall_clock")]
    pub date: NaiveDateTime,
    pub category_id: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventUpdate {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(with = "wall_clock")]
    pub date: NaiveDateTime,
    pub category_id: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventRead {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<Address>,
    #[serde(with = "wall_clock")]
    pub date: NaiveDateTime,
    pub category_id: i64,
    pub image: Option<String>,
}

impl Validate for EventCreate {
    fn validate(&self) -> Result<(), AppError> {
        require_text("name", &self.name)?;
        check_positive("category_id", self.category_id)
    }
}

impl Validate for EventUpdate {
    fn validate(&self) -> Result<(), AppError> {
        require_text("name", &self.name)?;
        check_positive("category_id", self.category_id)
    }
}

/// Combined event filter; every supplied criterion must hold.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub categories: Vec<i64>,
    pub tag_id: Option<i64>,
    pub tour_id: Option<i64>,
    pub university_id: Option<i64>,
}

/// Body of the event tag endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTagList {
    pub event_id: i64,
    pub tag_ids: Vec<i64>,
}
