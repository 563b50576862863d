//! Typed errors for each layer and the HTTP mapping for startup/extractor failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::config::EntityKind;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing reference: {kind} '{id}'")]
    MissingReference { kind: &'static str, id: String },
    #[error("table {table} has no column '{column}'")]
    UnknownColumn { table: &'static str, column: &'static str },
    #[error("{parent} registry does not list {association}.{column}")]
    MissingDependency {
        parent: EntityKind,
        association: &'static str,
        column: &'static str,
    },
    #[error("config load: {0}")]
    Load(String),
}

/// Failures reported by a store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// FK, uniqueness or not-null rejection.
    #[error("constraint violation: {0}")]
    Constraint(String),
    #[error("unknown column {table}.{column}")]
    UnknownColumn { table: &'static str, column: String },
    #[error("invalid value for {column}: {reason}")]
    InvalidValue { column: String, reason: String },
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn is_constraint(&self) -> bool {
        matches!(self, StoreError::Constraint(_))
    }
}

/// Failures of the per-entity query layer.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("cannot decode {table} row: {source}")]
    Decode {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot encode payload for {table}: {source}")]
    Encode {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{table} has no {role} side")]
    UnsupportedFilter { table: &'static str, role: EntityKind },
    #[error("{table} has no image column")]
    NoImageColumn { table: &'static str },
}

impl QueryError {
    pub fn is_constraint(&self) -> bool {
        matches!(self, QueryError::Store(e) if e.is_constraint())
    }
}

/// Failures of the external image storage.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("image storage is not configured")]
    NotConfigured,
    #[error("upload failed: {0}")]
    Upload(String),
    #[error("delete failed: {0}")]
    Delete(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("validation: {0}")]
    Validation(String),
    #[error("bad request: {0}")]
    BadRequest(String),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Config(_) | AppError::Store(_) | AppError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };
        let body = ErrorBody {
            status: "error",
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
