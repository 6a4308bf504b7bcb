pub mod columns;

use crate::error::{LoadError, WriteError};
use chrono::{Local, NaiveDateTime, SubsecRound};
use csv::{ReaderBuilder, StringRecord, Writer};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRecord {
    pub timestamp: NaiveDateTime,
    pub activity_type: String,
    pub duration_minutes: f64,
    pub calories_burned: f64,
}

/// Ordered, append-only table of activity records backed by a CSV file.
///
/// Every append rewrites the whole file, header included.
#[derive(Debug)]
pub struct ActivityLog {
    path: PathBuf,
    records: Vec<ActivityRecord>,
}

struct ColumnIndex {
    date: usize,
    activity_type: usize,
    duration: usize,
    calories: usize,
}

impl ColumnIndex {
    fn locate(path: &Path, headers: &StringRecord) -> Result<Self, LoadError> {
        let position = |name: &str| headers.iter().position(|header| header == name);

        let missing = columns::header()
            .into_iter()
            .filter(|name| position(*name).is_none())
            .collect::<Vec<_>>();

        match (
            position(columns::DATE),
            position(columns::ACTIVITY_TYPE),
            position(columns::DURATION),
            position(columns::CALORIES),
        ) {
            (Some(date), Some(activity_type), Some(duration), Some(calories)) => Ok(Self {
                date,
                activity_type,
                duration,
                calories,
            }),
            _ => Err(LoadError::MissingColumns {
                path: path.to_path_buf(),
                missing,
            }),
        }
    }
}

impl ActivityLog {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        if !path.exists() {
            return Err(LoadError::Missing {
                path: path.to_path_buf(),
            });
        }

        let read_error = |source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(read_error)?;
        let headers = reader.headers().map_err(read_error)?.clone();
        let index = ColumnIndex::locate(path, &headers)?;

        let records = reader
            .records()
            .enumerate()
            .map(|(offset, row)| {
                let row = row.map_err(read_error)?;
                let line = row
                    .position()
                    .map(|position| position.line())
                    .unwrap_or(offset as u64 + 2);
                parse_row(&row, &index).map_err(|reason| LoadError::MalformedRow {
                    path: path.to_path_buf(),
                    line,
                    reason,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(path = %path.display(), records = records.len(), "activity log loaded");

        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    /// Writes a header-only store when none exists yet. Returns `true` if a
    /// file was created.
    pub fn create(path: &Path) -> Result<bool, WriteError> {
        if path.exists() {
            return Ok(false);
        }

        let empty = Self {
            path: path.to_path_buf(),
            records: Vec::new(),
        };
        empty.persist()?;
        info!(path = %path.display(), "activity log created");

        Ok(true)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[ActivityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn latest(&self) -> Option<&ActivityRecord> {
        self.records.last()
    }

    /// Appends a record stamped with the current local time, kept to the
    /// microsecond precision the file stores.
    ///
    /// Duration and calories are expected to be validated by the caller.
    pub fn append(
        &mut self,
        activity_type: &str,
        duration_minutes: f64,
        calories_burned: f64,
    ) -> Result<&ActivityRecord, WriteError> {
        self.append_at(
            Local::now().naive_local().trunc_subsecs(6),
            activity_type,
            duration_minutes,
            calories_burned,
        )
    }

    pub fn append_at(
        &mut self,
        timestamp: NaiveDateTime,
        activity_type: &str,
        duration_minutes: f64,
        calories_burned: f64,
    ) -> Result<&ActivityRecord, WriteError> {
        self.records.push(ActivityRecord {
            timestamp,
            activity_type: activity_type.to_string(),
            duration_minutes,
            calories_burned,
        });

        // memory must not run ahead of the file
        if let Err(error) = self.persist() {
            self.records.pop();
            return Err(error);
        }

        info!(
            activity_type,
            duration_minutes,
            calories_burned,
            records = self.records.len(),
            "activity appended"
        );

        Ok(&self.records[self.records.len() - 1])
    }

    fn persist(&self) -> Result<(), WriteError> {
        let write_error = |source| WriteError {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|error| write_error(csv::Error::from(error)))?;
        }

        let staging_path = staging_path(&self.path);
        if let Err(error) = self.write_staged(&staging_path) {
            let _ = fs::remove_file(&staging_path);
            return Err(write_error(error));
        }

        debug!(path = %self.path.display(), records = self.records.len(), "activity log rewritten");

        Ok(())
    }

    /// Writes the full table to `staging_path`, then renames it over the store.
    fn write_staged(&self, staging_path: &Path) -> Result<(), csv::Error> {
        let mut writer = Writer::from_path(staging_path)?;

        writer.write_record(columns::header())?;
        self.records.iter().try_for_each(|record| {
            writer.write_record([
                columns::format_timestamp(&record.timestamp),
                record.activity_type.clone(),
                record.duration_minutes.to_string(),
                record.calories_burned.to_string(),
            ])
        })?;
        writer.flush()?;
        drop(writer);

        fs::rename(staging_path, &self.path)?;
        Ok(())
    }
}

fn parse_row(row: &StringRecord, index: &ColumnIndex) -> Result<ActivityRecord, String> {
    let field = |position: usize, name: &str| {
        row.get(position)
            .ok_or_else(|| format!("missing value for {name}"))
    };

    let raw_date = field(index.date, columns::DATE)?;
    let timestamp = columns::parse_timestamp(raw_date)
        .ok_or_else(|| format!("invalid {} value: {raw_date}", columns::DATE))?;

    Ok(ActivityRecord {
        timestamp,
        activity_type: field(index.activity_type, columns::ACTIVITY_TYPE)?.to_string(),
        duration_minutes: parse_number(field(index.duration, columns::DURATION)?, columns::DURATION)?,
        calories_burned: parse_number(field(index.calories, columns::CALORIES)?, columns::CALORIES)?,
    })
}

fn parse_number(raw: &str, name: &str) -> Result<f64, String> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid {name} value: {raw}"))
}

fn staging_path(path: &Path) -> PathBuf {
    let mut file_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    file_name.push(".tmp");
    path.with_file_name(file_name)
}

#[cfg(test)]
mod tests {
    use super::ActivityLog;
    use crate::error::LoadError;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    const HEADER: &str = "Date,Activity Type,Duration (Minutes),Calories Burned\n";

    fn fresh_log(dir: &TempDir) -> ActivityLog {
        let path = dir.path().join("fitness_activities.csv");
        assert!(ActivityLog::create(&path).expect("create store"));
        ActivityLog::load(&path).expect("load empty store")
    }

    #[test]
    fn appended_records_survive_reload_in_order() {
        let dir = TempDir::new().expect("temp dir");
        let mut log = fresh_log(&dir);

        let base = NaiveDate::from_ymd_opt(2024, 1, 15)
            .and_then(|date| date.and_hms_micro_opt(8, 0, 0, 250_000))
            .expect("timestamp");
        log.append_at(base, "Run", 30.0, 300.0).expect("append");
        log.append_at(base, "Swim", 45.5, 400.25).expect("append");
        log.append("Run, easy", 20.0, 150.0).expect("append");

        let reloaded = ActivityLog::load(log.path()).expect("reload");
        assert_eq!(reloaded.records(), log.records());
        assert_eq!(reloaded.records()[2].activity_type, "Run, easy");
    }

    #[test]
    fn every_append_rewrites_header_and_rows() {
        let dir = TempDir::new().expect("temp dir");
        let mut log = fresh_log(&dir);
        log.append("Yoga", 60.0, 180.0).expect("append");

        let content = fs::read_to_string(log.path()).expect("read store");
        assert!(content.starts_with(HEADER));
        assert_eq!(content.lines().count(), 2);
        assert!(!dir.path().join("fitness_activities.csv.tmp").exists());
    }

    #[test]
    fn failed_rewrite_removes_staging_file_and_record() {
        let dir = TempDir::new().expect("temp dir");
        let store_path = dir.path().join("store");
        fs::create_dir(&store_path).expect("directory in place of store");

        let mut log = ActivityLog {
            path: store_path,
            records: Vec::new(),
        };
        assert!(log.append("Run", 30.0, 300.0).is_err());

        assert!(log.is_empty());
        assert!(!dir.path().join("store.tmp").exists());
    }

    #[test]
    fn free_text_activity_type_may_be_empty() {
        let dir = TempDir::new().expect("temp dir");
        let mut log = fresh_log(&dir);
        log.append("", 10.0, 50.0).expect("append");

        let reloaded = ActivityLog::load(log.path()).expect("reload");
        assert_eq!(reloaded.records()[0].activity_type, "");
    }

    #[test]
    fn create_leaves_existing_store_alone() {
        let dir = TempDir::new().expect("temp dir");
        let mut log = fresh_log(&dir);
        log.append("Row", 15.0, 120.0).expect("append");

        assert!(!ActivityLog::create(log.path()).expect("create"));
        assert_eq!(ActivityLog::load(log.path()).expect("load").len(), 1);
    }

    #[test]
    fn load_reads_columns_by_name_and_ignores_extras() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("log.csv");
        fs::write(
            &path,
            "Calories Burned,Notes,Activity Type,Date,Duration (Minutes)\n\
             300.0,felt good,Run,2024-01-15 07:30:00.000000,30.0\n",
        )
        .expect("write store");

        let log = ActivityLog::load(&path).expect("load");
        let record = &log.records()[0];
        assert_eq!(record.activity_type, "Run");
        assert_eq!(record.duration_minutes, 30.0);
        assert_eq!(record.calories_burned, 300.0);
    }

    #[test]
    fn load_fails_for_missing_file() {
        let dir = TempDir::new().expect("temp dir");
        let error = ActivityLog::load(&dir.path().join("absent.csv")).expect_err("missing");
        assert!(matches!(error, LoadError::Missing { .. }));
    }

    #[test]
    fn load_fails_for_missing_columns() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("log.csv");
        fs::write(&path, "Date,Activity Type\n2024-01-15,Run\n").expect("write store");

        match ActivityLog::load(&path).expect_err("missing columns") {
            LoadError::MissingColumns { missing, .. } => {
                assert_eq!(missing, vec!["Duration (Minutes)", "Calories Burned"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_fails_for_zero_byte_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("log.csv");
        fs::write(&path, "").expect("write store");

        assert!(matches!(
            ActivityLog::load(&path),
            Err(LoadError::MissingColumns { .. })
        ));
    }

    #[test]
    fn load_reports_line_of_malformed_row() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("log.csv");
        fs::write(
            &path,
            format!("{HEADER}2024-01-15,Run,30,300\n2024-01-16,Swim,lots,400\n"),
        )
        .expect("write store");

        match ActivityLog::load(&path).expect_err("malformed") {
            LoadError::MalformedRow { line, reason, .. } => {
                assert_eq!(line, 3);
                assert!(reason.contains("Duration (Minutes)"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_rejects_unparseable_timestamp() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("log.csv");
        fs::write(&path, format!("{HEADER}last tuesday,Run,30,300\n")).expect("write store");

        assert!(matches!(
            ActivityLog::load(&path),
            Err(LoadError::MalformedRow { line: 2, .. })
        ));
    }
}
