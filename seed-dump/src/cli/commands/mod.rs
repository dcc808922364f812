//! Command definitions and handlers

pub mod dump;
pub mod order;

use clap::Args;

use crate::config::{split_list, DumpConfig};

/// Model selection flags shared by every command
#[derive(Debug, Clone, Default, Args)]
pub struct SelectionArgs {
    /// Comma-separated models to include (overrides MODELS)
    #[arg(short, long)]
    pub models: Option<String>,

    /// Comma-separated models to leave out (overrides MODELS_EXCLUDE)
    #[arg(long)]
    pub exclude_models: Option<String>,
}

impl SelectionArgs {
    pub fn apply(&self, config: &mut DumpConfig) {
        if let Some(models) = &self.models {
            config.models = split_list(models);
        }
        if let Some(excluded) = &self.exclude_models {
            config.models_exclude = split_list(excluded);
        }
    }
}
