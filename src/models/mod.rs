//! Typed payloads and read schemas for each entity family.

mod address;
mod category;
mod event;
mod tag;
mod tour;
mod university;
mod user;

pub use address::Address;
pub use category::{Category, CategoryCreate, CategoryRead, CategoryUpdate};
pub use event::{Event, EventCreate, EventFilter, EventRead, EventTagList, EventUpdate};
pub use tag::{Tag, TagCreate, TagRead, TagUpdate};
pub use tour::{Tour, TourCreate, TourRead, TourUpdate};
pub use university::{University, UniversityCreate, UniversityEventLink, UniversityRead, UniversityTourLink, UniversityUpdate};
pub use user::{User, UserCreate, UserRead, UserUpdate};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::EntityDef;
use crate::service::Validate;

/// Ties an entity family to its static definition and its three schemas.
pub trait Entity: Send + Sync + 'static {
    /// Creation payload: required fields, no id.
    type Create: Serialize + DeserializeOwned + Validate + Send + Sync;
    /// Update payload: carries the id of an existing record.
    type Update: Serialize + DeserializeOwned + Validate + Identified + Send + Sync;
    /// Read schema: includes the id.
    type Read: Serialize + DeserializeOwned + Identified + Send + Sync;

    fn def() -> &'static EntityDef;
}

pub trait Identified {
    fn id(&self) -> i64;
}

macro_rules! identified {
    ($($t:ty),* $(,)?) => {
        $(impl Identified for $t {
            fn id(&self) -> i64 {
                self.id
            }
        })*
    };
}

identified!(
    CategoryRead,
    CategoryUpdate,
    TagRead,
    TagUpdate,
    TourRead,
    TourUpdate,
    EventRead,
    EventUpdate,
    UniversityRead,
    UniversityUpdate,
    UserRead,
    UserUpdate,
);
