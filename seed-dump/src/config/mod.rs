//! Dump configuration
//!
//! Options come from environment variables (a `.env` file is loaded by the
//! binary before parsing) and can be overridden by command-line flags.

pub mod selection;

pub use selection::{excluded_models, models_without_tables, select_models};

use anyhow::{Context, Result};

use crate::export::{Destination, ExportOptions, SeedFormat};

/// Environment variable names
pub mod vars {
    pub const MODEL: &str = "MODEL";
    pub const MODELS: &str = "MODELS";
    pub const MODELS_EXCLUDE: &str = "MODELS_EXCLUDE";
    pub const LIMIT: &str = "LIMIT";
    pub const BATCH_SIZE: &str = "BATCH_SIZE";
    pub const APPEND: &str = "APPEND";
    pub const IMPORT: &str = "IMPORT";
    pub const FILE: &str = "FILE";
    pub const EXCLUDE: &str = "EXCLUDE";
    pub const FORMAT: &str = "FORMAT";
}

/// Everything needed to select models and export them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DumpConfig {
    /// Models to dump (empty = every model)
    pub models: Vec<String>,
    /// Models never dumped
    pub models_exclude: Vec<String>,
    pub export: ExportOptions,
}

impl DumpConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = DumpConfig::default();

        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(models) = get(vars::MODEL).or_else(|| get(vars::MODELS)) {
            config.models = split_list(&models);
        }
        if let Some(excluded) = get(vars::MODELS_EXCLUDE) {
            config.models_exclude = split_list(&excluded);
        }
        if let Some(limit) = get(vars::LIMIT) {
            config.export.limit = Some(parse_number(vars::LIMIT, &limit)?);
        }
        if let Some(batch_size) = get(vars::BATCH_SIZE) {
            let batch_size = parse_number(vars::BATCH_SIZE, &batch_size)?;
            if batch_size == 0 {
                anyhow::bail!("{} must be greater than zero", vars::BATCH_SIZE);
            }
            config.export.batch_size = batch_size;
        }
        if let Some(append) = get(vars::APPEND) {
            config.export.append = parse_flag(&append);
        }
        if let Some(import) = get(vars::IMPORT) {
            config.export.import = parse_flag(&import);
        }
        if let Some(file) = get(vars::FILE) {
            config.export.destination = Destination::parse(&file);
        }
        if let Some(exclude) = get(vars::EXCLUDE) {
            config.export.exclude = split_list(&exclude);
        }
        if let Some(format) = get(vars::FORMAT) {
            config.export.format = format.parse::<SeedFormat>()?;
        }

        Ok(config)
    }
}

/// Split a comma-separated list, trimming entries and dropping empty ones
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// `true`, `1`, `yes` and `on` (any case) are true; everything else is false
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

fn parse_number(key: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse::<usize>()
        .with_context(|| format!("{} must be a non-negative integer, got '{}'", key, value))
}
