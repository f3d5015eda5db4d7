//! CSV export of the daily progress rollup.

use crate::{DailyStat, Result};
use std::fs::File;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    date: String,
    reviewed: u32,
    correct: u32,
    streak: u32,
}

impl From<&DailyStat> for CsvRow {
    fn from(stat: &DailyStat) -> Self {
        CsvRow {
            date: stat.date.to_string(),
            reviewed: stat.reviewed_count,
            correct: stat.correct_count,
            streak: stat.streak,
        }
    }
}

/// Write the daily rollup to a CSV file, newest day first.
///
/// The file is replaced wholesale (an export is a report, not an
/// archive), synced to disk before returning. Returns the number of
/// rows written.
pub fn write_daily_csv(daily: &[DailyStat], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);

    for stat in daily {
        writer.serialize(CsvRow::from(stat))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Wrote {} daily rows to {:?}", daily.len(), path);
    Ok(daily.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stat(date: (i32, u32, u32), reviewed: u32, correct: u32, streak: u32) -> DailyStat {
        DailyStat {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            reviewed_count: reviewed,
            correct_count: correct,
            streak,
        }
    }

    #[test]
    fn test_export_writes_headers_and_rows() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("progress.csv");

        let daily = vec![
            stat((2026, 8, 6), 10, 8, 2),
            stat((2026, 8, 5), 4, 3, 1),
        ];

        let count = write_daily_csv(&daily, &csv_path).unwrap();
        assert_eq!(count, 2);

        let contents = std::fs::read_to_string(&csv_path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("date,reviewed,correct,streak"));
        assert_eq!(lines.next(), Some("2026-08-06,10,8,2"));
        assert_eq!(lines.next(), Some("2026-08-05,4,3,1"));
    }

    #[test]
    fn test_export_replaces_previous_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("progress.csv");

        write_daily_csv(&[stat((2026, 8, 1), 2, 2, 1)], &csv_path).unwrap();
        write_daily_csv(&[stat((2026, 8, 2), 5, 4, 1)], &csv_path).unwrap();

        let reader = csv::Reader::from_path(&csv_path).unwrap();
        assert_eq!(reader.into_records().count(), 1);
    }

    #[test]
    fn test_export_empty_rollup() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("progress.csv");

        let count = write_daily_csv(&[], &csv_path).unwrap();
        assert_eq!(count, 0);
        assert!(csv_path.exists());
    }
}
