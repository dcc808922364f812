//! `dump` command

pub mod handler;

use anyhow::Result;
use clap::Args;

use super::SelectionArgs;
use crate::config::{split_list, DumpConfig};
use crate::export::{Destination, SeedFormat};

pub use handler::handle_dump_command;

#[derive(Debug, Clone, Args)]
pub struct DumpArgs {
    /// Database URL (defaults to DATABASE_URL)
    #[arg(short, long)]
    pub database: Option<String>,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Maximum rows per model (overrides LIMIT)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Rows fetched per query (overrides BATCH_SIZE)
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Append to the output instead of overwriting it
    #[arg(long)]
    pub append: bool,

    /// Emit one multi-row statement per batch
    #[arg(long)]
    pub import: bool,

    /// Output file, `-` for stdout (overrides FILE)
    #[arg(short, long)]
    pub file: Option<String>,

    /// Comma-separated attributes to leave out (overrides EXCLUDE)
    #[arg(short, long)]
    pub exclude: Option<String>,

    /// Output format: sql or json (overrides FORMAT)
    #[arg(long)]
    pub format: Option<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl DumpArgs {
    /// Layer command-line flags over the environment configuration
    pub fn apply(&self, config: &mut DumpConfig) -> Result<()> {
        self.selection.apply(config);

        if let Some(limit) = self.limit {
            config.export.limit = Some(limit);
        }
        if let Some(batch_size) = self.batch_size {
            if batch_size == 0 {
                anyhow::bail!("--batch-size must be greater than zero");
            }
            config.export.batch_size = batch_size;
        }
        if self.append {
            config.export.append = true;
        }
        if self.import {
            config.export.import = true;
        }
        if let Some(file) = &self.file {
            config.export.destination = Destination::parse(file);
        }
        if let Some(exclude) = &self.exclude {
            config.export.exclude = split_list(exclude);
        }
        if let Some(format) = &self.format {
            config.export.format = format.parse::<SeedFormat>()?;
        }

        Ok(())
    }
}
