//! File input and output for the synthdata binary.
//!
//! Tables are read from JSON in either layout (array of records or object
//! of columns) and written back as pretty-printed records.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use synthdata_core::{QualityConfig, Table};

/// Loads a table from a JSON file.
pub fn load_table(path: &Path) -> Result<Table> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file {}", path.display()))?;
    let table = Table::from_json_str(&raw)
        .with_context(|| format!("Input file {} is not a JSON table", path.display()))?;

    tracing::info!(
        rows = table.row_count(),
        columns = table.column_count(),
        "Loaded {}",
        path.display()
    );
    Ok(table)
}

/// Loads a quality configuration from a JSON file.
///
/// Missing fields take their defaults.
pub fn load_quality_config(path: &Path) -> Result<QualityConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: QualityConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Config file {} is not a valid quality config", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Config file {} failed validation", path.display()))?;
    Ok(config)
}

/// Writes a value as pretty JSON to a file, or to stdout when no path is
/// given.
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("JSON serialization failed")?;

    match path {
        Some(path) => {
            fs::write(path, json + "\n")
                .with_context(|| format!("Failed to write to {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
