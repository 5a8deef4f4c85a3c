use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Key under which the admin's copy of the collection is kept
pub const RECIPES_KEY: &str = "recipes";

/// Initialize the local key-value store
pub fn init_database(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create store directory {:?}", parent))?;
        }
    }

    let conn = Connection::open(db_path).context("Failed to open local store")?;

    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    create_schema(&conn)?;

    log::info!("Local store initialized at {:?}", db_path);
    Ok(())
}

fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS local_storage (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL
        )",
        [],
    )?;

    Ok(())
}

/// Get a store connection
pub fn get_connection(db_path: &Path) -> Result<Connection> {
    Connection::open(db_path).context("Failed to open local store connection")
}

/// Read a value, `None` when the key was never written
pub fn get_item(db_path: &Path, key: &str) -> Result<Option<String>> {
    let conn = get_connection(db_path)?;

    let value = conn
        .query_row(
            "SELECT value FROM local_storage WHERE key = ?",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .with_context(|| format!("Failed to read key '{}'", key))?;

    Ok(value)
}

/// Write a value, replacing whatever was stored under the key
pub fn set_item(db_path: &Path, key: &str, value: &str) -> Result<()> {
    let conn = get_connection(db_path)?;
    let now = chrono::Utc::now().timestamp();

    conn.execute(
        "INSERT INTO local_storage (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value, now],
    )
    .with_context(|| format!("Failed to write key '{}'", key))?;

    log::debug!("Stored {} bytes under '{}'", value.len(), key);
    Ok(())
}
