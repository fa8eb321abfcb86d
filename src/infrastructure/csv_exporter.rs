//! CSV export of collected product records
//!
//! The header is always the full fixed column set, so every row has the same
//! shape no matter which fields were found. Missing values become empty cells.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

use crate::domain::product::{ProductRecord, FIELD_NAMES};

/// Write `records` to `path` as UTF-8 CSV, replacing any existing file.
///
/// An empty slice writes nothing and leaves an existing file untouched.
pub fn export(records: &[ProductRecord], path: &Path) -> Result<()> {
    if records.is_empty() {
        warn!("No products to save");
        return Ok(());
    }

    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Failed to create output file {:?}", path))?;

    writer
        .write_record(FIELD_NAMES)
        .context("Failed to write CSV header")?;

    for (index, record) in records.iter().enumerate() {
        writer
            .write_record(record.to_csv_row())
            .with_context(|| format!("Failed to write CSV row {}", index + 1))?;
    }

    writer.flush().context("Failed to flush CSV output")?;

    info!("Saved {} products to {:?}", records.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(name: &str) -> ProductRecord {
        ProductRecord {
            product_name: Some(name.to_string()),
            product_price: Some("₹120".to_string()),
            product_unit: Some("/Piece".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_input_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        export(&[], &path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_empty_input_keeps_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "previous run").unwrap();

        export(&[], &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous run");
    }

    #[test]
    fn test_header_and_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        export(&[record("LED Bulb, 9W"), record("Panel \"Slim\"")], &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(headers, FIELD_NAMES);

        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.len() == FIELD_NAMES.len()));
        assert_eq!(&rows[0][0], "LED Bulb, 9W");
        assert_eq!(&rows[1][0], "Panel \"Slim\"");
        assert_eq!(&rows[0][2], "₹120");
        assert_eq!(&rows[0][1], "");
    }

    #[test]
    fn test_overwrites_previous_output() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        export(&[record("a"), record("b"), record("c")], &path).unwrap();
        export(&[record("d")], &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.records().count(), 1);
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("out.csv");
        assert!(export(&[record("a")], &path).is_err());
    }
}
