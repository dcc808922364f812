//! Seed export
//!
//! This module provides:
//! - Record sources that read table rows (SQLite, in-memory)
//! - Seed formats (SQL insert statements, JSON lines)
//! - The export sink that writes one model's rows to the destination

pub mod format;
pub mod source;
pub mod writer;

pub use format::SeedFormat;
pub use source::{MemoryRecordSource, Record, RecordSource, SeedValue, SqliteRecordSource};
pub use writer::SeedWriter;

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;

use crate::schema::Model;

/// Where seed output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    /// Parse a destination; `-` means stdout
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "-" => Destination::Stdout,
            path => Destination::File(PathBuf::from(path)),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Stdout => f.write_str("stdout"),
            Destination::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Options for exporting a single model
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Maximum rows per model (None = all rows)
    pub limit: Option<usize>,
    /// Rows fetched per query
    pub batch_size: usize,
    /// Append to the destination instead of truncating it
    pub append: bool,
    /// One multi-row statement per batch instead of one per row
    pub import: bool,
    /// Attributes left out of the output
    pub exclude: Vec<String>,
    pub destination: Destination,
    pub format: SeedFormat,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            limit: None,
            batch_size: 1000,
            append: false,
            import: false,
            exclude: vec![
                "id".to_string(),
                "created_at".to_string(),
                "updated_at".to_string(),
            ],
            destination: Destination::File(PathBuf::from("db/seeds.sql")),
            format: SeedFormat::Sql,
        }
    }
}

/// Writes the rows of one model per call
#[async_trait]
pub trait ExportSink: Send {
    /// Export `model`, returning the number of rows written
    async fn export(&mut self, model: &Model, options: &ExportOptions) -> Result<usize>;
}
