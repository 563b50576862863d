//! Query layer: typed per-entity access and join-table access over a `Store`.

mod association;
mod entity;
mod event;

pub use association::AssociationQuery;
pub use entity::EntityQuery;
