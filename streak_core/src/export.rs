//! CSV export for exercise weight histories.

use crate::progression::history_deltas;
use crate::types::Exercise;
use crate::Result;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    date: String,
    weight: f64,
    change: Option<f64>,
}

/// Write one exercise's full weight history to a CSV file
///
/// Columns are the entry timestamp (RFC 3339), the logged weight, and the
/// change from the previous entry (empty on the first row). Returns the
/// number of rows written; an empty history still produces a headers-only
/// file.
pub fn write_history_csv(exercise: &Exercise, csv_path: &Path) -> Result<usize> {
    // Ensure parent directory exists
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(csv_path)?;
    let rows = history_deltas(exercise);
    if rows.is_empty() {
        // serialize only emits headers alongside the first row
        writer.write_record(["date", "weight", "change"])?;
    }
    for (entry, change) in &rows {
        writer.serialize(CsvRow {
            date: entry.date.to_rfc3339(),
            weight: entry.weight,
            change: *change,
        })?;
    }
    writer.flush()?;

    tracing::info!(
        "Wrote {} history rows for '{}' to {:?}",
        rows.len(),
        exercise.name,
        csv_path
    );
    Ok(rows.len())
}
