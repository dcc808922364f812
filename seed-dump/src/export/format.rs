//! Seed output formats

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::source::{Record, SeedValue};

/// Output format for seed files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedFormat {
    /// `INSERT INTO` statements
    #[default]
    Sql,
    /// One JSON object per line: `{"model": ..., "table": ..., "fields": {...}}`
    Json,
}

impl SeedFormat {
    pub fn label(&self) -> &'static str {
        match self {
            SeedFormat::Sql => "sql",
            SeedFormat::Json => "json",
        }
    }
}

impl fmt::Display for SeedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SeedFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sql" => Ok(SeedFormat::Sql),
            "json" | "jsonl" => Ok(SeedFormat::Json),
            other => anyhow::bail!("Unknown seed format '{}' (expected sql or json)", other),
        }
    }
}

/// Quote an SQL identifier
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Render a value as an SQL literal
pub fn sql_literal(value: &SeedValue) -> String {
    match value {
        SeedValue::Null => "NULL".to_string(),
        SeedValue::Integer(i) => i.to_string(),
        SeedValue::Real(f) if f.is_finite() => {
            let s = f.to_string();
            // Reals always carry a fractional part
            if s.contains('.') || s.contains('e') { s } else { format!("{}.0", s) }
        }
        SeedValue::Real(_) => "NULL".to_string(),
        SeedValue::Text(s) => format!("'{}'", s.replace('\'', "''")),
        SeedValue::Blob(bytes) => {
            let hex: String = bytes.iter().map(|b| format!("{:02X}", b)).collect();
            format!("X'{}'", hex)
        }
    }
}

/// Header comment written at the top of a fresh SQL seed file
pub fn sql_header(generated_at: chrono::DateTime<chrono::Utc>) -> String {
    format!(
        "-- Seed data generated by seed-dump at {}\n-- Statements are ordered so referenced rows load first\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

/// Build one INSERT statement covering `records`
///
/// Column names come from the first record; all records of a table share them.
pub fn insert_statement(table: &str, records: &[Record]) -> Option<String> {
    let first = records.first()?;
    let columns: Vec<String> = first.iter().map(|(name, _)| quote_ident(name)).collect();

    let rows: Vec<String> = records
        .iter()
        .map(|record| {
            let values: Vec<String> = record.iter().map(|(_, v)| sql_literal(v)).collect();
            format!("({})", values.join(", "))
        })
        .collect();

    let statement = if rows.len() == 1 {
        format!(
            "INSERT INTO {} ({}) VALUES {};\n",
            quote_ident(table),
            columns.join(", "),
            rows[0]
        )
    } else {
        format!(
            "INSERT INTO {} ({}) VALUES\n  {};\n",
            quote_ident(table),
            columns.join(", "),
            rows.join(",\n  ")
        )
    };

    Some(statement)
}

#[derive(Serialize)]
struct JsonSeed<'a> {
    model: &'a str,
    table: &'a str,
    fields: serde_json::Map<String, serde_json::Value>,
}

/// Render one record as a JSON line
pub fn json_line(model: &str, table: &str, record: &Record) -> Result<String> {
    let mut fields = serde_json::Map::new();
    for (name, value) in record {
        let value = serde_json::to_value(value)
            .with_context(|| format!("Failed to serialize column {}", name))?;
        fields.insert(name.clone(), value);
    }

    let line = serde_json::to_string(&JsonSeed { model, table, fields })
        .context("Failed to format JSON seed")?;
    Ok(format!("{}\n", line))
}
