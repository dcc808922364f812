use anyhow::Result;
use clap::Parser;

use seed_dump::cli::commands::{dump::handle_dump_command, order::handle_order_command};
use seed_dump::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Order(args) => handle_order_command(&cli.schema, args),
        Commands::Dump(args) => handle_dump_command(&cli.schema, args).await,
    }
}
