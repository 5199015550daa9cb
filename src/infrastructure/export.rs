//! CSV export of scrape results.

use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::product::ScrapeResult;

/// Write one row per retained record. The header is the union of all
/// records' field names in first-seen order (which is the filter order when
/// a filter was given); fields absent from a record are written as empty
/// cells. An empty result writes an empty file.
pub fn write_csv(result: &ScrapeResult, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create output file {}", path.display()))?;

    // Unfiltered records can carry differing feature sets, so a feature
    // first appearing on a later page still needs its column.
    let mut headers: Vec<&str> = Vec::new();
    for record in &result.records {
        for name in record.field_names() {
            if !headers.contains(&name) {
                headers.push(name);
            }
        }
    }

    if !headers.is_empty() {
        writer.write_record(&headers)?;

        for record in &result.records {
            let row: Vec<&str> = headers
                .iter()
                .map(|field| record.get(field).unwrap_or(""))
                .collect();
            writer.write_record(&row)?;
        }
    }

    writer
        .flush()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
