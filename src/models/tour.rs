use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{Address, Entity};
use crate::config::{catalog, EntityDef};
use crate::dates::wall_clock;
use crate::error::AppError;
use crate::service::validation::{check_order, check_positive, require_text};
use crate::service::Validate;

pub struct Tour;

impl Entity for Tour {
    type Create = TourCreate;
    type Update = TourUpdate;
    type Read = TourRead;

    fn def() -> &'static EntityDef {
        &catalog::TOUR
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TourCreate {
    pub name: String,
    #[serde(default)]
    pub address: Option<Address>,
    pub description: String,
    #[serde(with = "wall_clock")]
    pub date_start: NaiveDateTime,
    #[serde(with = "wall_clock")]
    pub date_end: NaiveDateTime,
    #[serde(with = "wall_clock")]
    pub reg_deadline: NaiveDateTime,
    pub max_users: i64,
    /// Events included in the tour, stored in `tour_event`.
    #[serde(default)]
    pub events: Vec<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TourUpdate {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub address: Option<Address>,
    pub description: String,
    #[serde(with = "wall_clock")]
    pub date_start: NaiveDateTime,
    #[serde(with = "wall_clock")]
    pub date_end: NaiveDateTime,
    #[serde(with = "wall_clock")]
    pub reg_deadline: NaiveDateTime,
    pub max_users: i64,
    /// Replaces the tour's event list.
    #[serde(default)]
    pub events: Vec<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TourRead {
    pub id: i64,
    pub name: String,
    pub address: Option<Address>,
    pub description: String,
    #[serde(with = "wall_clock")]
    pub date_start: NaiveDateTime,
    #[serde(with = "wall_clock")]
    pub date_end: NaiveDateTime,
    #[serde(with = "wall_clock")]
    pub reg_deadline: NaiveDateTime,
    pub max_users: i64,
    pub image: Option<String>,
    #[serde(default)]
    pub events: Vec<i64>,
}

fn validate_fields(
    name: &str,
    description: &str,
    date_start: &NaiveDateTime,
    date_end: &NaiveDateTime,
    max_users: i64,
) -> Result<(), AppError> {
    require_text("name", name)?;
    require_text("description", description)?;
    check_order("date_start", date_start, "date_end", date_end)?;
    check_positive("max_users", max_users)
}

impl Validate for TourCreate {
    fn validate(&self) -> Result<(), AppError> {
        validate_fields(&self.name, &self.description, &self.date_start, &self.date_end, self.max_users)
    }
}

impl Validate for TourUpdate {
    fn validate(&self) -> Result<(), AppError> {
        validate_fields(&self.name, &self.description, &self.date_start, &self.date_end, self.max_users)
    }
}
