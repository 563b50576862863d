//! Tour platform: REST backend for tours, events, categories, tags, universities and users
//! with cascading deletes over association tables, role-gated mutations and image storage.

pub mod access;
pub mod config;
pub mod dates;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod images;
pub mod migration;
pub mod models;
pub mod query;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

#[cfg(test)]
mod testing;

pub use config::{validate_catalog, Settings};
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use response::Envelope;
pub use routes::app;
pub use state::AppState;
pub use store::{ensure_database_exists, MemoryStore, PgStore, Store};

use std::sync::Arc;

use config::catalog::TABLES;
use images::{DisabledImageStorage, ImageStorage, S3ImageStorage};

/// Validates the catalogue, opens the store (creating database and tables for PostgreSQL)
/// and picks the image storage.
pub async fn build_state(settings: Settings) -> Result<AppState, AppError> {
    validate_catalog()?;

    let store: Arc<dyn Store> = if settings.uses_memory_store() {
        tracing::info!("using in-process store");
        Arc::new(MemoryStore::new(&TABLES))
    } else {
        ensure_database_exists(&settings.database_url).await?;
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect(&settings.database_url)
            .await?;
        apply_migrations(&pool, &TABLES).await?;
        Arc::new(PgStore::new(pool))
    };

    let images: Arc<dyn ImageStorage> = match (&settings.s3_bucket, &settings.s3_public_url) {
        (Some(bucket), Some(public_url)) => {
            tracing::info!(bucket = %bucket, "image storage on S3");
            Arc::new(S3ImageStorage::from_env(bucket.clone(), public_url.clone()).await)
        }
        _ => {
            tracing::warn!("S3_BUCKET is not set; image uploads are disabled");
            Arc::new(DisabledImageStorage)
        }
    };

    Ok(AppState::new(store, images, settings))
}
