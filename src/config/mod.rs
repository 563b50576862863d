pub mod catalog;
pub mod loader;
pub mod types;
pub mod validator;

pub use loader::*;
pub use types::*;
pub use validator::*;
