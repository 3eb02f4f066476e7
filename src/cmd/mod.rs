mod extract;
mod tables;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dbslice")]
#[command(version)]
#[command(
    about = "Extract a configurable subset of a database as replayable SQL",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract configured tables as CREATE TABLE + INSERT statements
    Extract {
        /// Database file to extract from
        database: PathBuf,

        /// JSON config describing the tables, columns, and ids to extract
        #[arg(short, long, default_value = "db_config.json")]
        config: PathBuf,

        /// Output SQL file
        #[arg(short, long, default_value = "dbslice_output.sql")]
        output: PathBuf,

        /// Show progress during extraction
        #[arg(short, long)]
        progress: bool,

        /// Run the full extraction without writing the output file
        #[arg(long)]
        dry_run: bool,

        /// Output statistics as JSON instead of human-readable text
        #[arg(long)]
        json: bool,
    },

    /// List tables in a database, optionally with their column types
    Tables {
        /// Database file to inspect
        database: PathBuf,

        /// Show each table's columns and logical types
        #[arg(short, long)]
        columns: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Extract {
            database,
            config,
            output,
            progress,
            dry_run,
            json,
        } => extract::run(database, config, output, progress, dry_run, json),
        Commands::Tables { database, columns } => tables::run(database, columns),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "dbslice", &mut io::stdout());
            Ok(())
        }
    }
}
