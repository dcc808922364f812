//! `order` command

pub mod handler;

use clap::Args;

use super::SelectionArgs;

pub use handler::handle_order_command;

#[derive(Debug, Clone, Args)]
pub struct OrderArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Print the order as a JSON array of model names
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
