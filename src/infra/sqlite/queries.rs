use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use crate::infra::sqlite::schema::open_connection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRow {
    pub record_id: String,
    pub body: String,
}

/// All rows of a resource in insertion order.
pub fn load_rows(db_path: &Path, resource: &str) -> Result<Vec<StoredRow>> {
    let conn = open_connection(db_path)?;
    let mut stmt = conn
        .prepare(
            "SELECT record_id, body
             FROM record
             WHERE resource = ?1
             ORDER BY position ASC",
        )
        .context("failed to prepare record query")?;

    let rows = stmt
        .query_map([resource], |row| {
            Ok(StoredRow {
                record_id: row.get(0)?,
                body: row.get(1)?,
            })
        })
        .with_context(|| format!("failed to query {resource} records"))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("failed to collect {resource} records"))?;

    Ok(rows)
}

pub fn load_row(db_path: &Path, resource: &str, record_id: &str) -> Result<Option<StoredRow>> {
    let conn = open_connection(db_path)?;
    conn.query_row(
        "SELECT record_id, body FROM record WHERE resource = ?1 AND record_id = ?2",
        params![resource, record_id],
        |row| {
            Ok(StoredRow {
                record_id: row.get(0)?,
                body: row.get(1)?,
            })
        },
    )
    .optional()
    .with_context(|| format!("failed to load {resource} {record_id}"))
}

pub fn count_rows(db_path: &Path, resource: &str) -> Result<i64> {
    let conn = open_connection(db_path)?;
    conn.query_row(
        "SELECT COUNT(*) FROM record WHERE resource = ?1",
        [resource],
        |row| row.get(0),
    )
    .with_context(|| format!("failed to count {resource} records"))
}

/// Appends rows after the current last position, in one transaction.
pub fn insert_rows(db_path: &Path, resource: &str, rows: &[StoredRow]) -> Result<()> {
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start insert transaction")?;

    let last_position: i64 = tx
        .query_row(
            "SELECT COALESCE(MAX(position), 0) FROM record WHERE resource = ?1",
            [resource],
            |row| row.get(0),
        )
        .context("failed to read last position")?;

    let mut insert_stmt = tx
        .prepare(
            "INSERT INTO record(resource, record_id, position, body)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .context("failed to prepare record insert")?;

    for (offset, row) in rows.iter().enumerate() {
        insert_stmt
            .execute(params![
                resource,
                row.record_id,
                last_position + 1 + offset as i64,
                row.body
            ])
            .with_context(|| format!("failed to insert {resource} {}", row.record_id))?;
    }

    drop(insert_stmt);
    tx.commit().context("failed to commit record insert")?;
    Ok(())
}

/// Returns the number of rows replaced (0 when the id does not exist).
pub fn update_row(db_path: &Path, resource: &str, row: &StoredRow) -> Result<usize> {
    let conn = open_connection(db_path)?;
    conn.execute(
        "UPDATE record
         SET body = ?1, updated_at = CURRENT_TIMESTAMP
         WHERE resource = ?2 AND record_id = ?3",
        params![row.body, resource, row.record_id],
    )
    .with_context(|| format!("failed to update {resource} {}", row.record_id))
}

/// Returns the number of rows removed (0 when the id does not exist).
pub fn delete_row(db_path: &Path, resource: &str, record_id: &str) -> Result<usize> {
    let conn = open_connection(db_path)?;
    conn.execute(
        "DELETE FROM record WHERE resource = ?1 AND record_id = ?2",
        params![resource, record_id],
    )
    .with_context(|| format!("failed to delete {resource} {record_id}"))
}
