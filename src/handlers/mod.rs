//! HTTP handlers per entity family. Every handler answers with an envelope; role checks
//! happen here before the response handler is called.

pub mod category;
pub mod common;
pub mod event;
pub mod tag;
pub mod tour;
pub mod university;
pub mod user;
