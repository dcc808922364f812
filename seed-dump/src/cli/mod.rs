//! Command-line interface

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::dump::DumpArgs;
pub use commands::order::OrderArgs;
pub use commands::SelectionArgs;

#[derive(Debug, Parser)]
#[command(name = "seed-dump")]
#[command(about = "Dump database rows as seed files in foreign-key safe model order")]
#[command(version)]
pub struct Cli {
    /// Schema registry file describing models and associations
    #[arg(short, long, global = true, default_value = "db/schema.toml")]
    pub schema: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the order in which models would be exported
    Order(OrderArgs),
    /// Export rows of the selected models as seeds
    Dump(DumpArgs),
}
