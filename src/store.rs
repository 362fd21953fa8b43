//! Submission Store - per-submission JSON files plus an aggregate log
//!
//! Layout under the logs directory:
//!
//! - `form_submission_{user_id}_{YYYYMMDD_HHMMSS}.json`: one object per file
//! - `all_submissions.json`: array of every submission, in arrival order
//!
//! Both are pretty-printed UTF-8 with non-ASCII left unescaped. Two
//! submissions from the same user in the same second share a file name and
//! the later one wins. The aggregate log is a plain read-modify-write with
//! no locking, so concurrent appends can lose an entry.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::error::StoreError;
use crate::types::Submission;

/// File name of the aggregate log inside the logs directory
pub const AGGREGATE_LOG_FILE: &str = "all_submissions.json";

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Persists form submissions to local disk
#[derive(Debug, Clone)]
pub struct SubmissionStore {
    logs_dir: PathBuf,
}

impl SubmissionStore {
    /// Open a store rooted at `logs_dir`, creating the directory if needed
    pub fn open(logs_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let logs_dir = logs_dir.into();
        fs::create_dir_all(&logs_dir).map_err(|source| StoreError::Io {
            path: logs_dir.clone(),
            source,
        })?;
        Ok(Self { logs_dir })
    }

    pub fn logs_dir(&self) -> &Path {
        &self.logs_dir
    }

    pub fn aggregate_path(&self) -> PathBuf {
        self.logs_dir.join(AGGREGATE_LOG_FILE)
    }

    /// Path of the per-submission file for `user_id` at instant `at`
    pub fn submission_path(&self, user_id: &str, at: &DateTime<Local>) -> PathBuf {
        self.logs_dir.join(format!(
            "form_submission_{}_{}.json",
            user_id,
            at.format(TIMESTAMP_FORMAT)
        ))
    }

    /// Persist a submission stamped with the current local time
    pub fn persist(&self, submission: &Submission) -> Result<PathBuf, StoreError> {
        self.persist_at(submission, Local::now())
    }

    /// Persist a submission stamped with `at`.
    ///
    /// The per-submission write decides the outcome. A failure to update the
    /// aggregate log is logged and otherwise ignored.
    pub fn persist_at(
        &self,
        submission: &Submission,
        at: DateTime<Local>,
    ) -> Result<PathBuf, StoreError> {
        let user_id = submission.user_id();
        validate_user_id(&user_id)?;

        let path = self.submission_path(&user_id, &at);
        write_pretty(&path, submission)?;
        info!(
            "Saved form submission to {} (submitted at {})",
            path.display(),
            submission.submission_time().unwrap_or("-")
        );

        if let Err(e) = self.append_to_aggregate(submission) {
            error!("Error appending to log file: {}", e);
        }

        Ok(path)
    }

    /// Append one submission to the aggregate log.
    ///
    /// An unparseable existing log is treated as empty and replaced. Valid
    /// JSON that is not an array is left untouched and reported as an error.
    pub fn append_to_aggregate(&self, submission: &Submission) -> Result<(), StoreError> {
        let path = self.aggregate_path();

        let existing = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!("Aggregate log {} is not valid JSON ({}), starting over", path.display(), e);
                Value::Array(Vec::new())
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Value::Array(Vec::new()),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let mut logs = match existing {
            Value::Array(logs) => logs,
            _ => return Err(StoreError::NotAnArray { path }),
        };

        logs.push(submission.clone().into_value());
        write_pretty(&path, &logs)?;
        debug!("Aggregate log now holds {} submissions", logs.len());
        Ok(())
    }

    /// Read the whole aggregate log.
    ///
    /// A missing file (or directory) yields an empty list; unlike the append
    /// path, corrupt contents are an error.
    pub fn read_all(&self) -> Result<Vec<Value>, StoreError> {
        let path = self.aggregate_path();

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt { path, source })
    }
}

/// Reject ids that would place the file outside the logs directory
fn validate_user_id(user_id: &str) -> Result<(), StoreError> {
    if user_id.contains(['/', '\\', '\0']) {
        return Err(StoreError::InvalidUserId(user_id.to_string()));
    }
    Ok(())
}

fn write_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let contents = serde_json::to_string_pretty(value)?;
    fs::write(path, contents).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use tempfile::TempDir;

    fn submission(value: Value) -> Submission {
        serde_json::from_value(value).unwrap()
    }

    fn instant() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, 15, 12, 30, 45).unwrap()
    }

    fn setup() -> (TempDir, SubmissionStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = SubmissionStore::open(temp_dir.path().join("logs")).unwrap();
        (temp_dir, store)
    }

    #[test]
    fn test_persist_writes_file_and_aggregate() {
        let (_temp_dir, store) = setup();
        let sub = submission(json!({"user": {"id": "42"}, "title1": "Concert"}));

        let path = store.persist_at(&sub, instant()).unwrap();
        assert_eq!(path, store.logs_dir().join("form_submission_42_20250615_123045.json"));

        let saved: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved, json!({"user": {"id": "42"}, "title1": "Concert"}));

        let logs = store.read_all().unwrap();
        assert_eq!(logs.last(), Some(&saved));
    }

    #[test]
    fn test_default_logs_dir_filename() {
        let store = SubmissionStore { logs_dir: PathBuf::from("logs") };
        let path = store.submission_path("42", &instant());
        assert_eq!(path.display().to_string(), "logs/form_submission_42_20250615_123045.json");
    }

    #[test]
    fn test_unknown_user() {
        let (_temp_dir, store) = setup();
        let path = store.persist_at(&submission(json!({"title1": "x"})), instant()).unwrap();
        assert!(path.ends_with("form_submission_unknown_20250615_123045.json"));
    }

    #[test]
    fn test_pretty_unescaped_output() {
        let (_temp_dir, store) = setup();
        let sub = submission(json!({"user": {"id": "7"}, "title1": "Концерт"}));
        let path = store.persist_at(&sub, instant()).unwrap();

        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains("Концерт"));
        assert!(contents.starts_with("{\n  \"user\""));

        let aggregate = fs::read_to_string(store.aggregate_path()).unwrap();
        assert!(aggregate.starts_with("[\n  {"));
        assert!(aggregate.contains("Концерт"));
    }

    #[test]
    fn test_aggregate_keeps_arrival_order() {
        let (_temp_dir, store) = setup();
        let later = Local.with_ymd_and_hms(2025, 6, 15, 13, 0, 0).unwrap();

        store.persist_at(&submission(json!({"n": 1})), later).unwrap();
        store.persist_at(&submission(json!({"n": 2})), instant()).unwrap();

        let logs = store.read_all().unwrap();
        assert_eq!(logs, vec![json!({"n": 1}), json!({"n": 2})]);
    }

    #[test]
    fn test_same_user_same_second_overwrites() {
        let (_temp_dir, store) = setup();
        let first = submission(json!({"user": {"id": "42"}, "title1": "first"}));
        let second = submission(json!({"user": {"id": "42"}, "title1": "second"}));

        let p1 = store.persist_at(&first, instant()).unwrap();
        let p2 = store.persist_at(&second, instant()).unwrap();
        assert_eq!(p1, p2);

        let files = fs::read_dir(store.logs_dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("form_submission_"))
            .count();
        assert_eq!(files, 1);

        let saved: Value = serde_json::from_str(&fs::read_to_string(&p2).unwrap()).unwrap();
        assert_eq!(saved["title1"], "second");
        assert_eq!(store.read_all().unwrap().len(), 2);
    }

    #[test]
    fn test_corrupt_aggregate_is_replaced() {
        let (_temp_dir, store) = setup();
        fs::write(store.aggregate_path(), "{not json").unwrap();

        let sub = submission(json!({"user": {"id": "1"}}));
        store.persist_at(&sub, instant()).unwrap();

        assert_eq!(store.read_all().unwrap(), vec![json!({"user": {"id": "1"}})]);
    }

    #[test]
    fn test_non_array_aggregate_is_left_untouched() {
        let (_temp_dir, store) = setup();
        let original = "{\"precious\": \"data\"}";
        fs::write(store.aggregate_path(), original).unwrap();

        let err = store.append_to_aggregate(&submission(json!({"a": 1}))).unwrap_err();
        assert!(matches!(err, StoreError::NotAnArray { .. }));

        let path = store.persist_at(&submission(json!({"user": {"id": "1"}})), instant()).unwrap();
        assert!(path.exists());
        assert_eq!(fs::read_to_string(store.aggregate_path()).unwrap(), original);
    }

    #[test]
    fn test_large_integers_kept_verbatim() {
        let (_temp_dir, store) = setup();
        let sub: Submission =
            serde_json::from_str(r#"{"n": 123456789012345678901234567890, "x": 0.1}"#).unwrap();
        let path = store.persist_at(&sub, instant()).unwrap();

        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains("123456789012345678901234567890"));
        assert!(contents.contains("0.1"));
        let aggregate = fs::read_to_string(store.aggregate_path()).unwrap();
        assert!(aggregate.contains("123456789012345678901234567890"));
    }

    #[test]
    fn test_dot_user_ids_stay_in_logs_dir() {
        let (_temp_dir, store) = setup();
        for id in [".", ".."] {
            let path = store
                .persist_at(&submission(json!({"user": {"id": id}})), instant())
                .unwrap();
            assert_eq!(path.parent().unwrap(), store.logs_dir());
            assert!(path.exists());
        }
    }

    #[test]
    fn test_aggregate_failure_does_not_fail_persist() {
        let (_temp_dir, store) = setup();
        fs::create_dir(store.aggregate_path()).unwrap();

        let path = store.persist_at(&submission(json!({"a": 1})), instant()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_submission_write_failure_propagates() {
        let (_temp_dir, store) = setup();
        fs::remove_dir_all(store.logs_dir()).unwrap();

        let err = store.persist_at(&submission(json!({"a": 1})), instant()).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn test_path_escaping_user_id_rejected() {
        let (_temp_dir, store) = setup();
        for id in ["../../etc", "a/b", "a\\b"] {
            let err = store
                .persist_at(&submission(json!({"user": {"id": id}})), instant())
                .unwrap_err();
            assert!(matches!(err, StoreError::InvalidUserId(_)), "accepted {id}");
        }
    }

    #[test]
    fn test_read_all_missing() {
        let (_temp_dir, store) = setup();
        assert!(store.read_all().unwrap().is_empty());

        fs::remove_dir_all(store.logs_dir()).unwrap();
        assert!(store.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_read_all_corrupt_is_error() {
        let (_temp_dir, store) = setup();
        fs::write(store.aggregate_path(), "[{").unwrap();
        assert!(matches!(store.read_all(), Err(StoreError::Corrupt { .. })));
    }
}
