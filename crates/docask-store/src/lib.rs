//! # DocAsk Store
//!
//! Single-table SQLite persistence for uploaded documents. A document's
//! content is fixed at creation: there is no update operation, only create,
//! read, list and hard delete. Metadata reads exclude the content blob; the
//! answering path fetches content separately.

use rusqlite::{Connection, params};
use std::path::Path;
use std::sync::Mutex;

use docask_core::error::{DocaskError, Result};

/// Document metadata as returned by read and list operations.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DocumentMeta {
    pub id: i64,
    pub filename: String,
    pub upload_date: String,
}

/// Document store, the only shared mutable resource in the system.
/// Every operation runs to completion under the connection lock.
pub struct DocumentStore {
    conn: Mutex<Connection>,
}

impl DocumentStore {
    /// Open or create the document database.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)
            .map_err(|e| DocaskError::Storage(format!("open: {e}")))?;

        // WAL mode for better concurrent read performance
        conn.execute_batch("PRAGMA journal_mode=WAL;").ok();

        let store = Self { conn: Mutex::new(conn) };
        store.migrate()?;
        Ok(store)
    }

    /// Run schema migrations.
    fn migrate(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS documents (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                filename TEXT NOT NULL,
                content TEXT NOT NULL,
                upload_date TEXT NOT NULL
            );",
        )
        .map_err(|e| DocaskError::Storage(format!("migration: {e}")))?;
        Ok(())
    }

    /// Persist a new document and return its metadata.
    pub fn insert(&self, filename: &str, content: &str) -> Result<DocumentMeta> {
        let upload_date = chrono::Utc::now().to_rfc3339();
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO documents (filename, content, upload_date) VALUES (?1, ?2, ?3)",
            params![filename, content, upload_date],
        )
        .map_err(|e| DocaskError::Storage(format!("insert: {e}")))?;
        let id = conn.last_insert_rowid();
        tracing::info!("Stored document {id} ({filename}, {} bytes of text)", content.len());
        Ok(DocumentMeta { id, filename: filename.to_string(), upload_date })
    }

    /// Read a document's metadata by id.
    pub fn get(&self, id: i64) -> Result<DocumentMeta> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT id, filename, upload_date FROM documents WHERE id = ?1",
            params![id],
            |row| {
                Ok(DocumentMeta {
                    id: row.get(0)?,
                    filename: row.get(1)?,
                    upload_date: row.get(2)?,
                })
            },
        )
        .map_err(Self::map_row_err)
    }

    /// Read a document's full content by id (used only for answering).
    pub fn content(&self, id: i64) -> Result<String> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT content FROM documents WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .map_err(Self::map_row_err)
    }

    /// List all documents' metadata in insertion order.
    pub fn list(&self) -> Result<Vec<DocumentMeta>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT id, filename, upload_date FROM documents ORDER BY id")
            .map_err(|e| DocaskError::Storage(format!("list: {e}")))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(DocumentMeta {
                    id: row.get(0)?,
                    filename: row.get(1)?,
                    upload_date: row.get(2)?,
                })
            })
            .map_err(|e| DocaskError::Storage(format!("list: {e}")))?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| DocaskError::Storage(format!("list: {e}")))
    }

    /// Hard-delete a document by id.
    pub fn delete(&self, id: i64) -> Result<()> {
        let conn = self.lock()?;
        let affected = conn
            .execute("DELETE FROM documents WHERE id = ?1", params![id])
            .map_err(|e| DocaskError::Storage(format!("delete: {e}")))?;
        if affected == 0 {
            return Err(DocaskError::NotFound);
        }
        tracing::info!("Deleted document {id}");
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DocaskError::Storage(format!("lock: {e}")))
    }

    fn map_row_err(e: rusqlite::Error) -> DocaskError {
        match e {
            rusqlite::Error::QueryReturnedNoRows => DocaskError::NotFound,
            other => DocaskError::Storage(other.to_string()),
        }
    }
}
