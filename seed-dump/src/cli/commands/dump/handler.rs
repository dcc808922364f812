//! Dump command handler

use anyhow::{Context, Result};
use colored::*;
use std::path::Path;
use std::time::Instant;

use super::DumpArgs;
use crate::config::{excluded_models, models_without_tables, select_models, DumpConfig};
use crate::dump::run_dump;
use crate::export::{SeedWriter, SqliteRecordSource};
use crate::schema::{MetadataProvider, Model, SchemaRegistry};

/// Export the selected models from the database as seeds
pub async fn handle_dump_command(schema: &Path, args: DumpArgs) -> Result<()> {
    if args.no_color {
        colored::control::set_override(false);
    }

    let registry = SchemaRegistry::load(schema)?;

    let mut config = DumpConfig::from_env()?;
    args.apply(&mut config)?;

    let database_url = match args.database.clone() {
        Some(url) => url,
        None => std::env::var("DATABASE_URL").map_err(|_| {
            anyhow::anyhow!("No database given. Use --database or set DATABASE_URL.")
        })?,
    };

    let start = Instant::now();
    let source = SqliteRecordSource::connect(&database_url).await?;

    // Referents are pulled in during ordering, so every candidate is checked
    let mut excluded = excluded_models(&registry, &config);
    excluded.extend(models_without_tables(&source, &registry.candidate_models()).await?);

    let models: Vec<Model> = select_models(&registry, &config)
        .into_iter()
        .filter(|m| !excluded.contains(m))
        .collect();
    if models.is_empty() {
        anyhow::bail!("No models selected. Check MODELS/MODELS_EXCLUDE and the schema file.");
    }

    let mut writer = SeedWriter::new(source);
    let summary = run_dump(&registry, &models, &excluded, &config.export, &mut writer)
        .await
        .context("Dump aborted")?;

    // stdout may be the dump destination, so the report goes to stderr
    for (model, rows) in &summary.exported {
        eprintln!("  {} {}", model.name.bold(), format!("{} rows", rows).dimmed());
    }
    eprintln!(
        "{} {} rows from {} models to {} in {:.2}s",
        "Dumped".bright_green().bold(),
        summary.total_rows(),
        summary.model_count(),
        config.export.destination.to_string().cyan(),
        start.elapsed().as_secs_f64()
    );

    Ok(())
}
