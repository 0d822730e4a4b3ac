//! Append-only JSON-lines file implementation of RecordStore
//!
//! Each record is written as one JSON object per line:
//!
//! ```text
//! {"id":"5f0c…","driver_name":"JOÃO","plate":"ABC1234","order":"ORD55","carrier":"ACME","direction":"entry","timestamp":"2024-03-10 12:04:05","odometer":1000}
//! ```
//!
//! Lines are flushed to disk before `append` returns.

use crate::core::error::StoreError;
use crate::core::registration::RegistrationRecord;
use crate::core::store::{RecordId, RecordStore, StoredRecord};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use uuid::Uuid;

const BACKEND: &str = "json_lines";

/// Durable record store backed by a JSON-lines file
pub struct JsonLinesRecordStore {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonLinesRecordStore {
    /// Open (or create) the file at `path` for appending
    ///
    /// Missing parent directories are created.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(io_error)?;

        tracing::info!(path = %path.display(), "opened registration log");

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn io_error(source: std::io::Error) -> StoreError {
    StoreError::Io {
        backend: BACKEND,
        source,
    }
}

async fn write_line(file: &mut File, line: &[u8]) -> std::io::Result<()> {
    file.write_all(line).await?;
    file.flush().await?;
    file.sync_data().await
}

/// Cut the file back to `len` bytes after a failed write
async fn rollback(file: &mut File, len: u64) {
    if let Err(e) = file.set_len(len).await {
        tracing::warn!(error = %e, len, "could not roll back partial registration line");
    }
}

#[async_trait]
impl RecordStore for JsonLinesRecordStore {
    /// Append one line and flush it to disk
    ///
    /// On a write or sync failure the file is truncated back to its previous
    /// length before the error is returned, so a partial line never merges
    /// with the next one. If that truncation itself fails, the line may have
    /// reached the disk anyway and a re-submission stores the record twice.
    async fn append(&self, record: &RegistrationRecord) -> Result<RecordId, StoreError> {
        let stored = StoredRecord {
            id: Uuid::new_v4(),
            record: record.clone(),
        };

        let mut line = serde_json::to_vec(&stored).map_err(|e| StoreError::Serialization {
            backend: BACKEND,
            message: e.to_string(),
        })?;
        line.push(b'\n');

        let mut file = self.file.lock().await;
        let start = file.metadata().await.map_err(io_error)?.len();
        if let Err(e) = write_line(&mut file, &line).await {
            rollback(&mut file, start).await;
            return Err(io_error(e));
        }

        Ok(stored.id)
    }

    fn backend_name(&self) -> &'static str {
        BACKEND
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registration::{
        Direction, RegistrationInput, RegistrationValidator, ValidationOutcome,
    };

    fn record(plate: &str) -> RegistrationRecord {
        let input = RegistrationInput {
            driver_name: "driver".to_string(),
            plate: plate.to_string(),
            order: "oc1".to_string(),
            carrier: "acme".to_string(),
            direction: Direction::Exit,
            odometer: None,
        };
        match RegistrationValidator::new(chrono_tz::UTC).validate(input) {
            ValidationOutcome::Accepted(record) => record,
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rollback_drops_partial_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registrations.jsonl");
        let store = JsonLinesRecordStore::open(&path).await.unwrap();
        store.append(&record("aaa1")).await.unwrap();

        {
            let mut file = store.file.lock().await;
            let len = file.metadata().await.unwrap().len();
            write_line(&mut file, b"{\"id\":\"torn").await.unwrap();
            rollback(&mut file, len).await;
        }
        store.append(&record("bbb2")).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let plates: Vec<String> = content
            .lines()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).unwrap();
                value["plate"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(plates, vec!["AAA1", "BBB2"]);
    }
}
