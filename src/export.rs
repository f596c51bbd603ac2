//! Writing exports to disk.

use crate::error::TrackerError;
use crate::models::{Backup, Property, RentHistory, BACKUP_VERSION};
use chrono::{DateTime, NaiveDate, Utc};
use std::fs;
use std::path::{Path, PathBuf};

pub fn backup_file_name(date: NaiveDate) -> String {
    format!("rent-tracker-backup-{}.json", date.format("%Y-%m-%d"))
}

pub fn spreadsheet_file_name(date: NaiveDate) -> String {
    format!("property_rent_data_{}.xlsx", date.format("%Y-%m-%d"))
}

pub fn build_backup(properties: &[Property], history: &RentHistory, now: DateTime<Utc>) -> Backup {
    Backup {
        properties: properties.to_vec(),
        rent_history: history.clone(),
        export_date: now,
        version: BACKUP_VERSION.to_string(),
    }
}

/// Writes the pretty-printed backup into `dir`, returning the file path.
pub fn write_backup(dir: &Path, backup: &Backup) -> Result<PathBuf, TrackerError> {
    let json = serde_json::to_string_pretty(backup)?;
    let path = dir.join(backup_file_name(backup.export_date.date_naive()));
    write_file(&path, json.as_bytes())?;
    Ok(path)
}

pub fn write_spreadsheet(dir: &Path, bytes: &[u8], date: NaiveDate) -> Result<PathBuf, TrackerError> {
    let path = dir.join(spreadsheet_file_name(date));
    write_file(&path, bytes)?;
    Ok(path)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), TrackerError> {
    let io_err = |source| TrackerError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, bytes).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MonthKey, PropertyId, RentRecord};
    use chrono::TimeZone;
    use tempfile::tempdir;

    #[test]
    fn test_file_names_carry_the_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(backup_file_name(date), "rent-tracker-backup-2024-03-09.json");
        assert_eq!(spreadsheet_file_name(date), "property_rent_data_2024-03-09.xlsx");
    }

    #[test]
    fn test_backup_document_shape() {
        let dir = tempdir().unwrap();
        let mut history = RentHistory::new();
        history.upsert(
            MonthKey::new(2024, 2).unwrap(),
            PropertyId::new("1"),
            RentRecord {
                received: true,
                ..Default::default()
            },
        );
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 10, 0, 0).unwrap();
        let backup = build_backup(&[], &history, now);

        let path = write_backup(&dir.path().join("nested"), &backup).unwrap();
        assert!(path.ends_with("rent-tracker-backup-2024-03-09.json"));

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["version"], "1.0");
        assert!(value["properties"].as_array().unwrap().is_empty());
        assert_eq!(value["rentHistory"]["2024-2"]["1"]["received"], true);
        assert!(value["exportDate"].as_str().unwrap().starts_with("2024-03-09T10:00:00"));
    }

    #[test]
    fn test_spreadsheet_bytes_are_written_verbatim() {
        let dir = tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let path = write_spreadsheet(dir.path(), b"PK\x03\x04", date).unwrap();
        assert_eq!(fs::read(path).unwrap(), b"PK\x03\x04");
    }
}
