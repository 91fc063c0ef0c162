//! CSV rollup for archiving the workout history log.
//!
//! The JSONL log stays small: a rollup drains it into an append-only CSV
//! archive atomically, so a crash between the two steps can only leave a
//! duplicate (deduplicated on load), never a lost workout.

use crate::types::WorkoutRecord;
use crate::Result;
use std::fs::OpenOptions;
use std::path::Path;

/// A row in the CSV archive
#[derive(Debug, serde::Serialize)]
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

fn enum_to_snake<T: serde::Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        _ => String::new(),
    }
}

impl From<&WorkoutRecord> for CsvRow {
    fn from(record: &WorkoutRecord) -> Self {
        CsvRow {
            id: record.id.to_string(),
            performed_at: record.performed_at.to_rfc3339(),
            duration_seconds: record.duration_seconds,
            rule_set_id: record.rule_set_id.clone(),
            rule_set_name: record.rule_set_name.clone(),
            flip_mode: enum_to_snake(&record.flip_mode),
            exercise_type: enum_to_snake(&record.exercise_type),
            superset_mode: record.superset_mode.as_ref().map(enum_to_snake),
            total_pushups: record.total_pushups,
            total_squats: record.total_squats,
            cards_completed: record.cards_completed,
            official: record.official,
        }
    }
}

/// Roll the JSONL history log into the CSV archive
///
/// 1. Reads all workouts from the log
/// 2. Appends them to the CSV (headers written only for a fresh file)
/// 3. Syncs the CSV to disk
/// 4. Renames the log to `.processed`
/// 5. Returns the number of workouts archived
///
/// The CSV is fsynced before the log is renamed, and the log is renamed
/// rather than deleted so it stays recoverable by hand.
pub fn records_to_csv_and_archive(log_path: &Path, csv_path: &Path) -> Result<usize> {
    let records = crate::history::read_records(log_path)?;

    if records.is_empty() {
        tracing::info!("No workouts in history log to roll up");
        return Ok(0);
    }

    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    for record in &records {
        writer.serialize(CsvRow::from(record))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Archived {} workouts to CSV", records.len());

    let processed_path = log_path.with_extension("jsonl.processed");
    std::fs::rename(log_path, &processed_path)?;

    tracing::info!("Archived history log to {:?}", processed_path);

    Ok(records.len())
}

/// Remove `.processed` history logs left behind by previous rollups
pub fn cleanup_processed_logs(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if let Some(extension) = path.extension() {
            if extension == "processed" {
                std::fs::remove_file(&path)?;
                tracing::debug!("Removed processed log: {:?}", path);
                count += 1;
            }
        }
    }

    if count > 0 {
        tracing::info!("Cleaned up {} processed history logs", count);
    }

    Ok(count)
}
