//! SQLite-backed catalog implementation.

use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, Connection};

use super::{CatalogError, CatalogItem, CatalogStore, ContentKind};

/// SQLite-backed catalog store.
///
/// Items are stored as JSON documents in a single table keyed by
/// (kind, key). Title and source timestamp are mirrored into their own
/// columns for indexing and ad-hoc inspection; the document column is the
/// source of truth.
pub struct SqliteCatalog {
    conn: Mutex<Connection>,
}

impl SqliteCatalog {
    /// Create a new SQLite catalog, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, CatalogError> {
        let conn = Connection::open(path).map_err(|e| CatalogError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite catalog (useful for testing).
    pub fn in_memory() -> Result<Self, CatalogError> {
        let conn =
            Connection::open_in_memory().map_err(|e| CatalogError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), CatalogError> {
        conn.execute_batch(
            r#"
            -- One row per catalog item, document column is authoritative
            CREATE TABLE IF NOT EXISTS catalog_items (
                kind TEXT NOT NULL,
                key TEXT NOT NULL,
                title TEXT NOT NULL,
                source_updated_at TEXT,
                document TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (kind, key)
            );

            CREATE INDEX IF NOT EXISTS idx_catalog_items_title ON catalog_items(title);
            CREATE INDEX IF NOT EXISTS idx_catalog_items_updated ON catalog_items(updated_at);
            "#,
        )
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        Ok(())
    }

    fn encode(item: &CatalogItem) -> Result<String, CatalogError> {
        serde_json::to_string(item).map_err(|e| CatalogError::Serialization(e.to_string()))
    }

    fn decode(document: &str) -> Result<CatalogItem, CatalogError> {
        serde_json::from_str(document).map_err(|e| CatalogError::Serialization(e.to_string()))
    }

    fn item_id(kind: ContentKind, key: &str) -> String {
        format!("{}/{}", kind, key)
    }
}

impl CatalogStore for SqliteCatalog {
    fn exists(&self, kind: ContentKind, key: &str) -> Result<bool, CatalogError> {
        let conn = self.conn.lock().unwrap();

        let exists: bool = conn
            .query_row(
                "SELECT 1 FROM catalog_items WHERE kind = ? AND key = ?",
                params![kind.as_str(), key],
                |_| Ok(true),
            )
            .unwrap_or(false);

        Ok(exists)
    }

    fn find(&self, kind: ContentKind, key: &str) -> Result<CatalogItem, CatalogError> {
        let conn = self.conn.lock().unwrap();

        let document: String = conn
            .query_row(
                "SELECT document FROM catalog_items WHERE kind = ? AND key = ?",
                params![kind.as_str(), key],
                |row| row.get(0),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    CatalogError::NotFound(Self::item_id(kind, key))
                }
                _ => CatalogError::Database(e.to_string()),
            })?;

        Self::decode(&document)
    }

    fn insert(&self, item: &CatalogItem) -> Result<(), CatalogError> {
        let conn = self.conn.lock().unwrap();

        let exists: bool = conn
            .query_row(
                "SELECT 1 FROM catalog_items WHERE kind = ? AND key = ?",
                params![item.kind.as_str(), &item.key],
                |_| Ok(true),
            )
            .unwrap_or(false);

        if exists {
            return Err(CatalogError::Duplicate(Self::item_id(item.kind, &item.key)));
        }

        let document = Self::encode(item)?;
        let now_str = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO catalog_items (kind, key, title, source_updated_at, document, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                item.kind.as_str(),
                &item.key,
                &item.title,
                item.source_updated_at.map(|dt| dt.to_rfc3339()),
                &document,
                &now_str,
                &now_str,
            ],
        )
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        Ok(())
    }

    fn update(&self, item: &CatalogItem) -> Result<(), CatalogError> {
        let conn = self.conn.lock().unwrap();

        let document = Self::encode(item)?;
        let now_str = Utc::now().to_rfc3339();

        let rows_affected = conn
            .execute(
                "UPDATE catalog_items
                 SET title = ?, source_updated_at = ?, document = ?, updated_at = ?
                 WHERE kind = ? AND key = ?",
                params![
                    &item.title,
                    item.source_updated_at.map(|dt| dt.to_rfc3339()),
                    &document,
                    &now_str,
                    item.kind.as_str(),
                    &item.key,
                ],
            )
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        if rows_affected == 0 {
            return Err(CatalogError::NotFound(Self::item_id(item.kind, &item.key)));
        }

        Ok(())
    }

    fn count(&self, kind: ContentKind) -> Result<u64, CatalogError> {
        let conn = self.conn.lock().unwrap();

        let count: u64 = conn
            .query_row(
                "SELECT COUNT(*) FROM catalog_items WHERE kind = ?",
                params![kind.as_str()],
                |row| row.get(0),
            )
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        Ok(count)
    }
}
