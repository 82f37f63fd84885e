//! Catalog storage - persisted catalog items partitioned by content kind.
//!
//! Each item is stored as one JSON document so the whole resolved release
//! structure travels with the record. Writes are split into insert and
//! update so callers state which side of the item lifecycle they are on.

mod sqlite;
mod types;

pub use sqlite::SqliteCatalog;
pub use types::*;

/// Trait for catalog item storage.
pub trait CatalogStore: Send + Sync {
    /// Check whether an item is stored under (kind, key).
    fn exists(&self, kind: ContentKind, key: &str) -> Result<bool, CatalogError>;

    /// Fetch the item stored under (kind, key).
    ///
    /// Returns `CatalogError::NotFound` when absent.
    fn find(&self, kind: ContentKind, key: &str) -> Result<CatalogItem, CatalogError>;

    /// Insert a new item.
    ///
    /// Fails with `CatalogError::Duplicate` when an item already exists
    /// under the same (kind, key).
    fn insert(&self, item: &CatalogItem) -> Result<(), CatalogError>;

    /// Replace an existing item.
    ///
    /// Fails with `CatalogError::NotFound` when nothing is stored under the
    /// item's (kind, key).
    fn update(&self, item: &CatalogItem) -> Result<(), CatalogError>;

    /// Number of stored items of one kind.
    fn count(&self, kind: ContentKind) -> Result<u64, CatalogError>;
}
