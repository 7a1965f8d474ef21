//! Read/write series JSON files.
//!
//! Series JSON is the "portable" representation of one load cycle:
//! - the requested range
//! - the provider's summary figures
//! - the dense daily series
//!
//! The schema is defined by `domain::SeriesFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{AggregateFigures, DateRange, Series, SeriesFile};
use crate::error::AppError;

/// Write a series JSON file.
pub fn write_series_json(
    path: &Path,
    range: &DateRange,
    series: &Series,
    figures: &AggregateFigures,
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create series JSON '{}': {e}", path.display())))?;

    let doc = SeriesFile {
        tool: "sales".to_string(),
        start: range.start(),
        end: range.end(),
        figures: figures.clone(),
        series: series.clone(),
    };

    serde_json::to_writer_pretty(file, &doc)
        .map_err(|e| AppError::new(2, format!("Failed to write series JSON: {e}")))?;

    Ok(())
}

/// Read a series JSON file.
pub fn read_series_json(path: &Path) -> Result<SeriesFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open series JSON '{}': {e}", path.display())))?;
    let doc: SeriesFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid series JSON: {e}")))?;

    let expected = DateRange::new(doc.start, doc.end)
        .map(|r| r.day_count())
        .ok_or_else(|| AppError::new(2, "Invalid series JSON: start is after end."))?;
    if doc.series.len() != expected {
        return Err(AppError::new(
            2,
            format!(
                "Invalid series JSON: {} points for a {expected}-day range.",
                doc.series.len()
            ),
        ));
    }

    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DailyPoint;
    use chrono::NaiveDate;

    #[test]
    fn written_file_reads_back() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 9, 2).unwrap(),
        )
        .unwrap();
        let series = Series::from_points(vec![
            DailyPoint { date: "2025-09-01".to_string(), value: 10.0 },
            DailyPoint { date: "2025-09-02".to_string(), value: 0.0 },
        ]);
        let figures = AggregateFigures {
            total_orders: Some("2".to_string()),
            total_sales: Some(10.0),
        };

        let path = std::env::temp_dir().join(format!("sales_series_{}.json", std::process::id()));
        write_series_json(&path, &range, &series, &figures).unwrap();
        let doc = read_series_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(doc.tool, "sales");
        assert_eq!(doc.series, series);
        assert_eq!(doc.figures, figures);
    }

    #[test]
    fn rejects_series_not_matching_range() {
        let json = r#"{"tool":"sales","start":"2025-09-01","end":"2025-09-03",
            "figures":{"total_orders":null,"total_sales":null},
            "series":[{"date":"2025-09-01","value":1.0}]}"#;
        let path = std::env::temp_dir().join(format!("sales_series_bad_{}.json", std::process::id()));
        std::fs::write(&path, json).unwrap();
        let err = read_series_json(&path).unwrap_err();
        let _ = std::fs::remove_file(&path);
        assert!(err.to_string().contains("3-day range"));
    }
}
