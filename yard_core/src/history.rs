//! Workout history persistence.
//!
//! Completed workouts append to a JSONL (JSON Lines) log with file
//! locking; older entries are archived into CSV (see `csv_rollup`).
//! Loading merges both sources and deduplicates by record id.

use crate::types::{ExerciseType, FlipMode, SupersetMode, WorkoutRecord};
use crate::Result;
use chrono::{DateTime, Duration, Utc};
use csv::ReaderBuilder;
use fs2::FileExt;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Record sink trait for persisting completed workouts
pub trait RecordSink {
    fn append(&mut self, record: &WorkoutRecord) -> Result<()>;
}

/// JSONL-based record sink with file locking
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    /// Create a new JSONL sink for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl RecordSink for JsonlSink {
    fn append(&mut self, record: &WorkoutRecord) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(record)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        file.unlock()?;

        tracing::debug!("Appended workout {} to history log", record.id);
        Ok(())
    }
}

/// Read all records from a JSONL history log
///
/// Corrupt lines are skipped with a warning rather than failing the read.
pub fn read_records(path: &Path) -> Result<Vec<WorkoutRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<WorkoutRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Failed to parse workout at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} workouts from history log", records.len());
    Ok(records)
}

/// CSV row format for reading archived workouts
#[derive(Debug, Deserialize)]
struct CsvRow {
    id: String,
    performed_at: String,
    duration_seconds: u32,
    rule_set_id: String,
    rule_set_name: String,
    flip_mode: String,
    exercise_type: String,
    superset_mode: Option<String>,
    total_pushups: u32,
    total_squats: u32,
    cards_completed: u32,
    official: bool,
}

fn enum_from_snake<T: serde::de::DeserializeOwned>(value: &str) -> Result<T> {
    Ok(serde_json::from_value(serde_json::Value::String(
        value.to_string(),
    ))?)
}

impl TryFrom<CsvRow> for WorkoutRecord {
    type Error = crate::Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| crate::Error::Other(format!("Invalid UUID: {}", e)))?;

        let performed_at = DateTime::parse_from_rfc3339(&row.performed_at)
            .map_err(|e| crate::Error::Other(format!("Invalid date: {}", e)))?
            .with_timezone(&Utc);

        let flip_mode: FlipMode = enum_from_snake(&row.flip_mode)?;
        let exercise_type: ExerciseType = enum_from_snake(&row.exercise_type)?;
        let superset_mode: Option<SupersetMode> = match row.superset_mode.as_deref() {
            None | Some("") => None,
            Some(s) => Some(enum_from_snake(s)?),
        };

        Ok(WorkoutRecord {
            id,
            performed_at,
            duration_seconds: row.duration_seconds,
            rule_set_id: row.rule_set_id,
            rule_set_name: row.rule_set_name,
            flip_mode,
            exercise_type,
            superset_mode,
            total_pushups: row.total_pushups,
            total_squats: row.total_squats,
            cards_completed: row.cards_completed,
            official: row.official,
        })
    }
}

/// Load workouts from the last N days from both the JSONL log and the
/// CSV archive
///
/// Returns records sorted by performed_at (newest first), deduplicated
/// by id across the two sources.
pub fn load_recent_records(
    log_path: &Path,
    csv_path: &Path,
    days: i64,
) -> Result<Vec<WorkoutRecord>> {
    let cutoff = Utc::now() - Duration::days(days);
    let mut records = load_records(log_path, csv_path)?;
    records.retain(|r| r.performed_at >= cutoff);
    Ok(records)
}

/// Load all workouts from both the JSONL log and the CSV archive
pub fn load_records(log_path: &Path, csv_path: &Path) -> Result<Vec<WorkoutRecord>> {
    let mut records = Vec::new();
    let mut seen_ids = HashSet::new();

    if log_path.exists() {
        for record in read_records(log_path)? {
            seen_ids.insert(record.id);
            records.push(record);
        }
        tracing::debug!("Loaded {} workouts from history log", records.len());
    }

    if csv_path.exists() {
        let mut csv_count = 0;
        for record in load_records_from_csv(csv_path)? {
            if seen_ids.insert(record.id) {
                records.push(record);
                csv_count += 1;
            }
        }
        tracing::debug!("Loaded {} workouts from CSV archive", csv_count);
    }

    records.sort_by(|a, b| b.performed_at.cmp(&a.performed_at));
    Ok(records)
}

fn load_records_from_csv(path: &Path) -> Result<Vec<WorkoutRecord>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut records = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        match result {
            Ok(row) => match WorkoutRecord::try_from(row) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!("Failed to parse CSV row: {}", e);
                }
            },
            Err(e) => {
                tracing::warn!("Failed to deserialize CSV row: {}", e);
            }
        }
    }

    Ok(records)
}

/// Fastest completed duration for a rule set, if any.
///
/// A later session only counts as a new personal best when its duration
/// is strictly smaller; ties keep the old record.
pub fn best_duration(records: &[WorkoutRecord], rule_set_id: &str) -> Option<u32> {
    records
        .iter()
        .filter(|r| r.rule_set_id == rule_set_id)
        .map(|r| r.duration_seconds)
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_record(rule_set_id: &str, duration: u32, days_ago: i64) -> WorkoutRecord {
        WorkoutRecord {
            id: Uuid::new_v4(),
            performed_at: Utc::now() - Duration::days(days_ago),
            duration_seconds: duration,
            rule_set_id: rule_set_id.into(),
            rule_set_name: "Standard".into(),
            flip_mode: FlipMode::FreshFish,
            exercise_type: ExerciseType::SuitSplit,
            superset_mode: None,
            total_pushups: 104,
            total_squats: 98,
            cards_completed: 52,
            official: false,
        }
    }

    #[test]
    fn test_append_and_read_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("workouts.jsonl");

        let record = test_record("standard", 600, 0);
        let record_id = record.id;

        let mut sink = JsonlSink::new(&log_path);
        sink.append(&record).unwrap();

        let records = read_records(&log_path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, record_id);
        assert_eq!(records[0].duration_seconds, 600);
    }

    #[test]
    fn test_corrupt_lines_are_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("workouts.jsonl");

        let mut sink = JsonlSink::new(&log_path);
        sink.append(&test_record("standard", 600, 0)).unwrap();

        // Inject a corrupt line between two valid ones
        {
            let mut file = OpenOptions::new().append(true).open(&log_path).unwrap();
            writeln!(file, "{{ not json").unwrap();
        }
        let mut sink = JsonlSink::new(&log_path);
        sink.append(&test_record("standard", 550, 0)).unwrap();

        let records = read_records(&log_path).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_load_merges_and_deduplicates() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("workouts.jsonl");
        let csv_path = temp_dir.path().join("workouts.csv");

        let record = test_record("standard", 480, 1);
        let record_id = record.id;
        let mut sink = JsonlSink::new(&log_path);
        sink.append(&record).unwrap();

        // Archive it to CSV, then write it to a fresh log again so it
        // exists in both sources
        crate::csv_rollup::records_to_csv_and_archive(&log_path, &csv_path).unwrap();
        let mut sink = JsonlSink::new(&log_path);
        sink.append(&record).unwrap();

        let records = load_records(&log_path, &csv_path).unwrap();
        let count = records.iter().filter(|r| r.id == record_id).count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_records_sorted_newest_first() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("workouts.jsonl");
        let csv_path = temp_dir.path().join("workouts.csv");

        let mut sink = JsonlSink::new(&log_path);
        sink.append(&test_record("old", 600, 5)).unwrap();
        sink.append(&test_record("new", 600, 1)).unwrap();

        let records = load_records(&log_path, &csv_path).unwrap();
        assert_eq!(records[0].rule_set_id, "new");
        assert_eq!(records[1].rule_set_id, "old");
    }

    #[test]
    fn test_recent_window_filters_old_records() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("workouts.jsonl");
        let csv_path = temp_dir.path().join("workouts.csv");

        let mut sink = JsonlSink::new(&log_path);
        sink.append(&test_record("standard", 600, 1)).unwrap();
        sink.append(&test_record("standard", 600, 3)).unwrap();
        sink.append(&test_record("standard", 600, 10)).unwrap();

        let records = load_recent_records(&log_path, &csv_path, 7).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_best_duration_per_rule_set() {
        let records = vec![
            test_record("standard", 700, 3),
            test_record("standard", 650, 2),
            test_record("hard_time", 400, 1),
        ];

        assert_eq!(best_duration(&records, "standard"), Some(650));
        assert_eq!(best_duration(&records, "hard_time"), Some(400));
        assert_eq!(best_duration(&records, "short_stint"), None);
    }

    #[test]
    fn test_read_missing_log_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let records = read_records(&temp_dir.path().join("nope.jsonl")).unwrap();
        assert!(records.is_empty());
    }
}
