//! Shared application state for all routes. Entity state lives in the store only.

use std::sync::Arc;

use crate::config::Settings;
use crate::images::ImageStorage;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub images: Arc<dyn ImageStorage>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, images: Arc<dyn ImageStorage>, settings: Settings) -> Self {
        AppState {
            store,
            images,
            settings: Arc::new(settings),
        }
    }
}
