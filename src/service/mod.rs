//! Response handlers: query operations wrapped into envelopes, cascade delete and image handling.

mod association;
mod event;
mod handler;
pub mod messages;
pub mod validation;

pub use association::AssociationHandler;
pub use handler::{cascade_steps, ResponseHandler};
pub use validation::Validate;
