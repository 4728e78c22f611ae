//! CSV output artifact.

use crate::error::Result;
use chrono::{DateTime, TimeZone};
use scout_core::{OutputConfig, ResultRecord};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

/// Column header of the exported file.
pub const HEADER: [&str; 6] = ["Action", "State", "Name", "Farm", "Phone", "Website"];

/// File the run's dataset is written to.
///
/// `{directory}/{file_stem}_{YYYYMMDD_HHMMSS}.csv` when timestamped,
/// `{directory}/{file_stem}.csv` otherwise.
#[must_use]
pub fn output_path<Tz>(config: &OutputConfig, now: &DateTime<Tz>) -> PathBuf
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let file_name = if config.timestamped {
        format!("{}_{}.csv", config.file_stem, now.format("%Y%m%d_%H%M%S"))
    } else {
        format!("{}.csv", config.file_stem)
    };
    config.directory.join(file_name)
}

/// Write records to `path`, header first, creating parent directories.
pub fn write_csv(path: &Path, records: &[ResultRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    tracing::info!("Wrote {} record(s) to {}", records.len(), path.display());
    Ok(())
}
