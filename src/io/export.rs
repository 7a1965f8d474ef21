//! Export the normalized series to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::Series;
use crate::error::AppError;

/// Write `date,value` rows, one per day of the series.
pub fn write_series_csv(path: &Path, series: &Series) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_series_rows(&mut file, series)
}

fn write_series_rows(out: &mut impl Write, series: &Series) -> Result<(), AppError> {
    writeln!(out, "date,value")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for p in series.points() {
        writeln!(out, "{},{}", p.date, p.value)
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}
