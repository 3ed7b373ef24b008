//! File catalog store: durable records of uploaded files.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use shared::CatalogRecord;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog database error: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("catalog lock poisoned")]
    Poisoned,
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Fields supplied by the upload service for a new record
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub name: String,
    pub url: String,
    pub size: u64,
}

/// Record store. Inserts are atomic; listing returns insertion order.
pub trait CatalogStore: Send + Sync {
    fn insert(&self, record: NewRecord) -> Result<CatalogRecord, CatalogError>;
    fn list_all(&self) -> Result<Vec<CatalogRecord>, CatalogError>;
}

fn materialize(record: NewRecord) -> CatalogRecord {
    CatalogRecord {
        id: uuid::Uuid::new_v4().to_string(),
        name: record.name,
        url: record.url,
        size: record.size,
        created_at: Utc::now(),
    }
}

// ============================================================================
// SQLite
// ============================================================================

/// SQLite-backed catalog. `Connection` is not `Sync`, so it sits behind a mutex.
pub struct SqliteCatalog {
    conn: Mutex<Connection>,
}

impl SqliteCatalog {
    /// Open (or create) the catalog database at `path`.
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| CatalogError::Unavailable(e.to_string()))?;
            }
        }
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Catalog in a private in-memory database.
    pub fn open_in_memory() -> Result<Self, CatalogError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, CatalogError> {
        // `seq` keeps insertion order independent of the random id
        conn.execute(
            "CREATE TABLE IF NOT EXISTS files (
                seq         INTEGER PRIMARY KEY AUTOINCREMENT,
                id          TEXT NOT NULL UNIQUE,
                name        TEXT NOT NULL,
                url         TEXT NOT NULL,
                size        INTEGER NOT NULL,
                created_at  TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl CatalogStore for SqliteCatalog {
    fn insert(&self, record: NewRecord) -> Result<CatalogRecord, CatalogError> {
        let record = materialize(record);
        let conn = self.conn.lock().map_err(|_| CatalogError::Poisoned)?;
        conn.execute(
            "INSERT INTO files (id, name, url, size, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.id,
                record.name,
                record.url,
                record.size as i64,
                record.created_at.to_rfc3339(),
            ],
        )?;
        Ok(record)
    }

    fn list_all(&self) -> Result<Vec<CatalogRecord>, CatalogError> {
        let conn = self.conn.lock().map_err(|_| CatalogError::Poisoned)?;
        let mut stmt =
            conn.prepare("SELECT id, name, url, size, created_at FROM files ORDER BY seq")?;
        let rows = stmt.query_map([], |row| {
            let size: i64 = row.get(3)?;
            let created_at: String = row.get(4)?;
            let created_at = DateTime::parse_from_rfc3339(&created_at)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        4,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;
            Ok(CatalogRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                url: row.get(2)?,
                size: size.max(0) as u64,
                created_at,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}

// ============================================================================
// In-memory
// ============================================================================

/// Vector-backed catalog, used by tests and `STLVIEW_DATABASE=:memory:` runs
/// that want no SQLite file.
#[derive(Default)]
pub struct MemoryCatalog {
    records: Mutex<Vec<CatalogRecord>>,
}

impl CatalogStore for MemoryCatalog {
    fn insert(&self, record: NewRecord) -> Result<CatalogRecord, CatalogError> {
        let record = materialize(record);
        self.records
            .lock()
            .map_err(|_| CatalogError::Poisoned)?
            .push(record.clone());
        Ok(record)
    }

    fn list_all(&self) -> Result<Vec<CatalogRecord>, CatalogError> {
        Ok(self
            .records
            .lock()
            .map_err(|_| CatalogError::Poisoned)?
            .clone())
    }
}
