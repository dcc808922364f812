//! Record sources
//!
//! A record source reads the rows of one table in stable batches. Column
//! order is preserved so generated statements list columns as the table does.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::{Column, Row, TypeInfo, ValueRef};
use std::collections::HashMap;

use super::format::quote_ident;

/// A single column value as stored
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeedValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

/// One row: (column, value) pairs in table column order
pub type Record = Vec<(String, SeedValue)>;

/// Read access to table rows
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn table_exists(&self, table: &str) -> Result<bool>;

    /// Fetch up to `limit` rows starting at `offset`, in a stable order
    async fn fetch_batch(&self, table: &str, offset: usize, limit: usize) -> Result<Vec<Record>>;
}

/// Rows read from a SQLite database
#[derive(Debug, Clone)]
pub struct SqliteRecordSource {
    pool: SqlitePool,
}

impl SqliteRecordSource {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a database URL such as `sqlite://db/development.sqlite3`
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(url)
            .await
            .with_context(|| format!("Failed to connect to database: {}", url))?;
        log::debug!("Connected to {}", url);
        Ok(Self::new(pool))
    }

    /// Sort key for stable paging: primary key columns, or `rowid` without one
    async fn order_by(&self, table: &str) -> Result<String> {
        let pk_columns: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM pragma_table_info(?) WHERE pk > 0 ORDER BY pk",
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Failed to read primary key of {}", table))?;

        if pk_columns.is_empty() {
            return Ok("rowid".to_string());
        }
        Ok(pk_columns
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", "))
    }
}

#[async_trait]
impl RecordSource for SqliteRecordSource {
    async fn table_exists(&self, table: &str) -> Result<bool> {
        let row = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(table)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to check for table {}", table))?;
        Ok(row.is_some())
    }

    async fn fetch_batch(&self, table: &str, offset: usize, limit: usize) -> Result<Vec<Record>> {
        let limit = i64::try_from(limit)
            .with_context(|| format!("Batch size {} is too large", limit))?;
        let offset = i64::try_from(offset)
            .with_context(|| format!("Row offset {} is too large", offset))?;

        let sql = format!(
            "SELECT * FROM {} ORDER BY {} LIMIT ? OFFSET ?",
            quote_ident(table),
            self.order_by(table).await?
        );

        let rows = sqlx::query(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Failed to read rows from {}", table))?;

        rows.iter().map(decode_row).collect()
    }
}

fn decode_row(row: &SqliteRow) -> Result<Record> {
    let mut record = Vec::with_capacity(row.columns().len());

    for column in row.columns() {
        let idx = column.ordinal();
        let raw = row.try_get_raw(idx)?;

        let value = if raw.is_null() {
            SeedValue::Null
        } else {
            // Storage class of the value itself, not the declared column type
            let type_name = raw.type_info().name().to_string();
            match type_name.as_str() {
                "INTEGER" => SeedValue::Integer(row.try_get(idx)?),
                "REAL" => SeedValue::Real(row.try_get(idx)?),
                "BLOB" => SeedValue::Blob(row.try_get(idx)?),
                _ => SeedValue::Text(row.try_get(idx)?),
            }
        };

        record.push((column.name().to_string(), value));
    }

    Ok(record)
}

/// Rows held in memory, keyed by table
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordSource {
    tables: HashMap<String, Vec<Record>>,
}

impl MemoryRecordSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: impl Into<String>, records: Vec<Record>) -> Self {
        self.tables.insert(table.into(), records);
        self
    }
}

#[async_trait]
impl RecordSource for MemoryRecordSource {
    async fn table_exists(&self, table: &str) -> Result<bool> {
        Ok(self.tables.contains_key(table))
    }

    async fn fetch_batch(&self, table: &str, offset: usize, limit: usize) -> Result<Vec<Record>> {
        let Some(records) = self.tables.get(table) else {
            anyhow::bail!("Table does not exist: {}", table);
        };
        Ok(records.iter().skip(offset).take(limit).cloned().collect())
    }
}
