//! Extraction orchestrator.
//!
//! Drives the whole run: for each configured table, emit the verbatim
//! CREATE TABLE definition followed by one INSERT per selected row.
//! Tables are processed strictly sequentially and any failure aborts the
//! run; the sink is flushed on every exit path so whatever was produced
//! before the failure stays inspectable.

mod config;

pub use config::{ExtractConfig, TableSpec};

use crate::db::DbClient;
use crate::error::Result;
use crate::{query, render, schema};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::Instant;

/// Flush the sink after this many statements.
const FLUSH_INTERVAL: u64 = 100;

/// Runtime options for an extraction run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Show a progress bar on stderr
    pub progress: bool,
}

/// Statistics from an extraction run.
#[derive(Debug, Default, serde::Serialize)]
pub struct ExtractStats {
    /// Number of tables fully extracted
    pub tables_extracted: usize,
    /// Total INSERT rows written
    pub rows_written: u64,
    /// Total statements written (CREATE TABLE + INSERT)
    pub statements_written: u64,
    /// Total bytes written to the sink
    pub bytes_written: u64,
    /// Run duration in seconds
    pub elapsed_secs: f64,
}

impl std::fmt::Display for ExtractStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} tables, {} rows, {} bytes written in {:.2}s",
            self.tables_extracted, self.rows_written, self.bytes_written, self.elapsed_secs
        )
    }
}

/// Run a full extraction against the given client, writing SQL to `sink`.
///
/// The sink is flushed before this returns, on success and on failure
/// alike, so completed tables always survive a mid-run abort.
pub fn run<W: Write>(
    client: &dyn DbClient,
    config: &ExtractConfig,
    options: ExtractOptions,
    sink: &mut W,
) -> Result<ExtractStats> {
    let start = Instant::now();

    let result = extract_tables(client, config, options, sink);
    let flushed = sink.flush();

    let mut stats = result?;
    flushed?;

    stats.elapsed_secs = start.elapsed().as_secs_f64();
    Ok(stats)
}

fn extract_tables<W: Write>(
    client: &dyn DbClient,
    config: &ExtractConfig,
    options: ExtractOptions,
    sink: &mut W,
) -> Result<ExtractStats> {
    let progress_bar = if options.progress {
        let pb = ProgressBar::new(config.tables.len() as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} tables {msg}",
            )
            .unwrap()
            .progress_chars("█▓▒░  "),
        );
        Some(pb)
    } else {
        None
    };

    let mut stats = ExtractStats::default();
    for spec in &config.tables {
        if let Some(ref pb) = progress_bar {
            pb.set_message(spec.name.clone());
        }

        extract_table(client, spec, sink, &mut stats)?;
        stats.tables_extracted += 1;

        if let Some(ref pb) = progress_bar {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    Ok(stats)
}

/// Extract one table: schema dump first, then one INSERT per row.
fn extract_table<W: Write>(
    client: &dyn DbClient,
    spec: &TableSpec,
    sink: &mut W,
    stats: &mut ExtractStats,
) -> Result<()> {
    let ddl = client.create_table_ddl(&spec.name)?;
    write_statement(sink, &format!("{};\n", ddl), stats)?;

    let columns = schema::inspect(client, &spec.name, spec.columns.as_deref())?;
    let sql = query::build_select(&spec.name, &columns, spec.ids.as_deref());
    let output = client.query(&sql)?;

    for row in output.iter() {
        let insert = render::format_insert(&spec.name, &columns, row)?;
        write_statement(sink, &insert, stats)?;
        stats.rows_written += 1;
    }

    Ok(())
}

fn write_statement<W: Write>(sink: &mut W, stmt: &str, stats: &mut ExtractStats) -> Result<()> {
    sink.write_all(stmt.as_bytes())?;
    stats.statements_written += 1;
    stats.bytes_written += stmt.len() as u64;

    if stats.statements_written % FLUSH_INTERVAL == 0 {
        sink.flush()?;
    }

    Ok(())
}
