//! Test doubles: in-memory state, a recording image storage and a store that fails
//! deletes on one table.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::config::catalog::TABLES;
use crate::config::{Settings, TableDef, MEMORY_DATABASE_URL};
use crate::error::{StorageError, StoreError};
use crate::images::{Directory, ImageStorage, ImageUpload};
use crate::state::AppState;
use crate::store::{DeleteStep, Filter, MemoryStore, Row, Store};

pub(crate) fn settings(atomic_cascade: bool) -> Settings {
    Settings {
        database_url: MEMORY_DATABASE_URL.into(),
        atomic_cascade,
        ..Settings::default()
    }
}

pub(crate) fn memory_state(atomic_cascade: bool) -> (AppState, Arc<FakeImages>) {
    let images = Arc::new(FakeImages::default());
    let state = AppState::new(Arc::new(MemoryStore::new(&TABLES)), images.clone(), settings(atomic_cascade));
    (state, images)
}

/// Records uploads and deletes; links are `https://img.test/{directory}/{n}.png`.
#[derive(Default)]
pub(crate) struct FakeImages {
    pub uploads: Mutex<Vec<String>>,
    pub deletes: Mutex<Vec<String>>,
    pub fail_deletes: bool,
    pub fail_uploads: bool,
}

impl FakeImages {
    pub fn failing_deletes() -> Self {
        FakeImages {
            fail_deletes: true,
            ..FakeImages::default()
        }
    }

    pub fn failing_uploads() -> Self {
        FakeImages {
            fail_uploads: true,
            ..FakeImages::default()
        }
    }
}

#[async_trait]
impl ImageStorage for FakeImages {
    async fn upload(&self, _image: ImageUpload, directory: Directory) -> Result<String, StorageError> {
        if self.fail_uploads {
            return Err(StorageError::Upload("bucket unreachable".into()));
        }
        let mut uploads = self.uploads.lock().unwrap();
        let link = format!("https://img.test/{}/{}.png", directory.as_str(), uploads.len() + 1);
        uploads.push(link.clone());
        Ok(link)
    }

    async fn delete_by_id(&self, image_id: &str, _directory: Directory) -> Result<(), StorageError> {
        self.deletes.lock().unwrap().push(image_id.to_string());
        if self.fail_deletes {
            return Err(StorageError::Delete("bucket unreachable".into()));
        }
        Ok(())
    }

    fn image_id(&self, link: &str, directory: Directory) -> Option<String> {
        let prefix = format!("https://img.test/{}/", directory.as_str());
        link.strip_prefix(&prefix).map(str::to_string)
    }
}

/// Delegates to a memory store but refuses any delete touching `fail_table`, either as a
/// lost connection or as a constraint violation.
pub(crate) struct FailingStore {
    pub inner: MemoryStore,
    pub fail_table: &'static str,
    pub as_constraint: bool,
}

impl FailingStore {
    pub fn new(fail_table: &'static str, as_constraint: bool) -> Self {
        FailingStore {
            inner: MemoryStore::new(&TABLES),
            fail_table,
            as_constraint,
        }
    }

    fn refuse(&self, table: &TableDef) -> Result<(), StoreError> {
        if table.name != self.fail_table {
            return Ok(());
        }
        if self.as_constraint {
            return Err(StoreError::Constraint(format!("rows of {} are still referenced", table.name)));
        }
        Err(StoreError::Unavailable(format!("connection lost while deleting from {}", table.name)))
    }
}

#[async_trait]
impl Store for FailingStore {
    async fn select_all(&self, table: &'static TableDef) -> Result<Vec<Row>, StoreError> {
        self.inner.select_all(table).await
    }

    async fn select_by_id(&self, table: &'static TableDef, id: i64) -> Result<Option<Row>, StoreError> {
        self.inner.select_by_id(table, id).await
    }

    async fn select_where(&self, table: &'static TableDef, filters: &[Filter]) -> Result<Vec<Row>, StoreError> {
        self.inner.select_where(table, filters).await
    }

    async fn insert(&self, table: &'static TableDef, values: &Row) -> Result<i64, StoreError> {
        self.inner.insert(table, values).await
    }

    async fn update(&self, table: &'static TableDef, id: i64, values: &Row) -> Result<u64, StoreError> {
        self.inner.update(table, id, values).await
    }

    async fn delete(&self, table: &'static TableDef, id: i64) -> Result<u64, StoreError> {
        self.refuse(table)?;
        self.inner.delete(table, id).await
    }

    async fn delete_where(&self, table: &'static TableDef, filters: &[Filter]) -> Result<u64, StoreError> {
        self.refuse(table)?;
        self.inner.delete_where(table, filters).await
    }

    async fn delete_atomically(&self, steps: &[DeleteStep]) -> Result<(), StoreError> {
        for step in steps {
            self.refuse(step.table)?;
        }
        self.inner.delete_atomically(steps).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.ping().await
    }
}

pub(crate) fn failing_state(fail_table: &'static str, atomic_cascade: bool) -> AppState {
    store_state(FailingStore::new(fail_table, false), atomic_cascade)
}

pub(crate) fn constraint_failing_state(fail_table: &'static str) -> AppState {
    store_state(FailingStore::new(fail_table, true), false)
}

fn store_state(store: FailingStore, atomic_cascade: bool) -> AppState {
    AppState::new(
        Arc::new(store),
        Arc::new(FakeImages::default()),
        settings(atomic_cascade),
    )
}
