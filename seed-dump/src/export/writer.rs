//! Seed file writer

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};

use super::format::{insert_statement, json_line, sql_header, SeedFormat};
use super::source::{Record, RecordSource};
use super::{Destination, ExportOptions, ExportSink};
use crate::schema::Model;

/// Export sink reading rows from a [`RecordSource`] and writing seed output
#[derive(Debug)]
pub struct SeedWriter<S> {
    source: S,
}

impl<S: RecordSource> SeedWriter<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

/// Rows to ask for next, or 0 once `limit` is reached
fn next_request(options: &ExportOptions, written: usize) -> usize {
    match options.limit {
        Some(limit) => limit.saturating_sub(written).min(options.batch_size),
        None => options.batch_size,
    }
}

fn open_destination(options: &ExportOptions) -> Result<Box<dyn Write + Send>> {
    match &options.destination {
        Destination::Stdout => Ok(Box::new(io::stdout())),
        Destination::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }

            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .append(options.append)
                .truncate(!options.append)
                .open(path)
                .with_context(|| format!("Failed to open output file: {}", path.display()))?;

            Ok(Box::new(BufWriter::new(file)))
        }
    }
}

fn strip_excluded(mut record: Record, exclude: &[String]) -> Record {
    if !exclude.is_empty() {
        record.retain(|(name, _)| !exclude.iter().any(|e| e == name));
    }
    record
}

fn write_batch(
    out: &mut dyn Write,
    model: &Model,
    records: &[Record],
    options: &ExportOptions,
) -> Result<()> {
    match options.format {
        SeedFormat::Sql if options.import => {
            if let Some(statement) = insert_statement(&model.table_name, records) {
                out.write_all(statement.as_bytes())?;
            }
        }
        SeedFormat::Sql => {
            for record in records {
                if let Some(statement) =
                    insert_statement(&model.table_name, std::slice::from_ref(record))
                {
                    out.write_all(statement.as_bytes())?;
                }
            }
        }
        SeedFormat::Json => {
            for record in records {
                out.write_all(json_line(&model.name, &model.table_name, record)?.as_bytes())?;
            }
        }
    }
    Ok(())
}

#[async_trait]
impl<S: RecordSource> ExportSink for SeedWriter<S> {
    async fn export(&mut self, model: &Model, options: &ExportOptions) -> Result<usize> {
        if options.batch_size == 0 {
            anyhow::bail!("Batch size must be greater than zero");
        }

        let mut requested = next_request(options, 0);
        let mut batch = if requested > 0 {
            self.source.fetch_batch(&model.table_name, 0, requested).await?
        } else {
            Vec::new()
        };

        // The destination is only opened (and possibly truncated) once the source has answered
        let mut out = open_destination(options)?;
        if !options.append && options.format == SeedFormat::Sql {
            out.write_all(sql_header(chrono::Utc::now()).as_bytes())?;
        }

        let mut written = 0usize;
        while !batch.is_empty() {
            let fetched = batch.len();
            let records: Vec<Record> = batch
                .into_iter()
                .map(|r| strip_excluded(r, &options.exclude))
                .collect();
            write_batch(out.as_mut(), model, &records, options)
                .with_context(|| format!("Failed to write seeds for {}", model.name))?;

            written += fetched;
            log::debug!("{}: wrote {} rows so far", model.name, written);

            if fetched < requested {
                break;
            }
            requested = next_request(options, written);
            if requested == 0 {
                break;
            }
            batch = self
                .source
                .fetch_batch(&model.table_name, written, requested)
                .await?;
        }

        out.flush()
            .with_context(|| format!("Failed to flush output to {}", options.destination))?;

        log::info!("Exported {} {} rows to {}", written, model.name, options.destination);
        Ok(written)
    }
}
