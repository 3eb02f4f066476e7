//! Tables command CLI handler.

use crate::db::{DbClient, DuckDbClient};
use crate::schema;
use anyhow::Context;
use std::path::PathBuf;

pub fn run(database: PathBuf, columns: bool) -> anyhow::Result<()> {
    let client = DuckDbClient::open(&database)
        .with_context(|| format!("Failed to open database: {}", database.display()))?;

    let tables = client.list_tables()?;
    if tables.is_empty() {
        eprintln!("No tables found");
        return Ok(());
    }

    for table in &tables {
        println!("{}", table);
        if columns {
            for (meta, resolved) in schema::describe_table(&client, table)? {
                match resolved {
                    Some(col_type) => println!("  {} {}", meta.name, col_type),
                    None => println!("  {} {} (unsupported)", meta.name, meta.raw_type),
                }
            }
        }
    }

    Ok(())
}
