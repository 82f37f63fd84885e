//! In-memory catalog store for testing.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::catalog::{CatalogError, CatalogItem, CatalogStore, ContentKind};

/// A recorded catalog write for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogOp {
    Insert(ContentKind, String),
    Update(ContentKind, String),
}

/// In-memory implementation of the [`CatalogStore`] trait.
///
/// Records every write so tests can assert on the exact sequence of
/// inserts and updates a run produced.
#[derive(Debug, Default)]
pub struct MockCatalog {
    items: Mutex<HashMap<(ContentKind, String), CatalogItem>>,
    ops: Mutex<Vec<CatalogOp>>,
    /// If set, the next insert or update fails with this error.
    next_write_error: Mutex<Option<CatalogError>>,
}

impl MockCatalog {
    /// Create a new empty mock catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Place an item in the store without recording an operation.
    pub fn seed(&self, item: CatalogItem) {
        self.items
            .lock()
            .unwrap()
            .insert((item.kind, item.key.clone()), item);
    }

    /// Recorded writes in call order.
    pub fn recorded_ops(&self) -> Vec<CatalogOp> {
        self.ops.lock().unwrap().clone()
    }

    /// Number of recorded writes.
    pub fn write_count(&self) -> usize {
        self.ops.lock().unwrap().len()
    }

    /// Configure the next insert or update to fail with the given error.
    pub fn set_next_write_error(&self, error: CatalogError) {
        *self.next_write_error.lock().unwrap() = Some(error);
    }

    fn take_write_error(&self) -> Option<CatalogError> {
        self.next_write_error.lock().unwrap().take()
    }
}

impl CatalogStore for MockCatalog {
    fn exists(&self, kind: ContentKind, key: &str) -> Result<bool, CatalogError> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .contains_key(&(kind, key.to_string())))
    }

    fn find(&self, kind: ContentKind, key: &str) -> Result<CatalogItem, CatalogError> {
        self.items
            .lock()
            .unwrap()
            .get(&(kind, key.to_string()))
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("{}/{}", kind, key)))
    }

    fn insert(&self, item: &CatalogItem) -> Result<(), CatalogError> {
        if let Some(err) = self.take_write_error() {
            return Err(err);
        }

        let mut items = self.items.lock().unwrap();
        let id = (item.kind, item.key.clone());
        if items.contains_key(&id) {
            return Err(CatalogError::Duplicate(format!(
                "{}/{}",
                item.kind, item.key
            )));
        }

        items.insert(id, item.clone());
        self.ops
            .lock()
            .unwrap()
            .push(CatalogOp::Insert(item.kind, item.key.clone()));
        Ok(())
    }

    fn update(&self, item: &CatalogItem) -> Result<(), CatalogError> {
        if let Some(err) = self.take_write_error() {
            return Err(err);
        }

        let mut items = self.items.lock().unwrap();
        let id = (item.kind, item.key.clone());
        if !items.contains_key(&id) {
            return Err(CatalogError::NotFound(format!(
                "{}/{}",
                item.kind, item.key
            )));
        }

        items.insert(id, item.clone());
        self.ops
            .lock()
            .unwrap()
            .push(CatalogOp::Update(item.kind, item.key.clone()));
        Ok(())
    }

    fn count(&self, kind: ContentKind) -> Result<u64, CatalogError> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .keys()
            .filter(|(k, _)| *k == kind)
            .count() as u64)
    }
}
