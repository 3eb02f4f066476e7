//! Extract command CLI handler.

use crate::db::DuckDbClient;
use crate::extract::{self, ExtractConfig, ExtractOptions};
use anyhow::Context;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

/// Buffer size for the output writer (256 KB)
const OUTPUT_BUFFER_SIZE: usize = 256 * 1024;

pub fn run(
    database: PathBuf,
    config: PathBuf,
    output: PathBuf,
    progress: bool,
    dry_run: bool,
    json: bool,
) -> anyhow::Result<()> {
    let config = ExtractConfig::load(&config)?;

    let client = DuckDbClient::open(&database)
        .with_context(|| format!("Failed to open database: {}", database.display()))?;

    let options = ExtractOptions { progress };

    let stats = if dry_run {
        let mut sink = io::sink();
        extract::run(&client, &config, options, &mut sink)?
    } else {
        let file = File::create(&output)
            .with_context(|| format!("Failed to create output file: {}", output.display()))?;
        let mut writer = BufWriter::with_capacity(OUTPUT_BUFFER_SIZE, file);
        extract::run(&client, &config, options, &mut writer)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        eprintln!("Extracted {}", stats);
        if dry_run {
            eprintln!("Dry run: no output written");
        } else {
            eprintln!("Output written to {}", output.display());
        }
    }

    Ok(())
}
