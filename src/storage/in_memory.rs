//! In-memory implementation of RecordStore for testing and development

use crate::core::error::StoreError;
use crate::core::registration::RegistrationRecord;
use crate::core::store::{RecordId, RecordStore, StoredRecord};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

const BACKEND: &str = "in_memory";

/// In-memory record store implementation
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
/// Records are lost when the process exits.
#[derive(Clone)]
pub struct InMemoryRecordStore {
    records: Arc<RwLock<Vec<StoredRecord>>>,
}

impl InMemoryRecordStore {
    /// Create a new in-memory record store
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Snapshot of every appended record, in append order
    pub fn records(&self) -> Result<Vec<StoredRecord>, StoreError> {
        let records = self.records.read().map_err(|e| StoreError::Unavailable {
            backend: BACKEND,
            message: format!("Failed to acquire read lock: {}", e),
        })?;

        Ok(records.clone())
    }

    /// Number of appended records
    pub fn len(&self) -> Result<usize, StoreError> {
        let records = self.records.read().map_err(|e| StoreError::Unavailable {
            backend: BACKEND,
            message: format!("Failed to acquire read lock: {}", e),
        })?;

        Ok(records.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn append(&self, record: &RegistrationRecord) -> Result<RecordId, StoreError> {
        let mut records = self.records.write().map_err(|e| StoreError::Unavailable {
            backend: BACKEND,
            message: format!("Failed to acquire write lock: {}", e),
        })?;

        let id = Uuid::new_v4();
        records.push(StoredRecord {
            id,
            record: record.clone(),
        });

        Ok(id)
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
            direction: Direction::Entry,
            odometer: None,
        };
        match RegistrationValidator::new(chrono_tz::UTC).validate(input) {
            ValidationOutcome::Accepted(record) => record,
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_append_assigns_distinct_ids() {
        let store = InMemoryRecordStore::new();
        let a = store.append(&record("aaa1")).await.unwrap();
        let b = store.append(&record("bbb2")).await.unwrap();

        assert_ne!(a, b);
        assert_eq!(store.len().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_records_preserve_append_order() {
        let store = InMemoryRecordStore::new();
        store.append(&record("aaa1")).await.unwrap();
        store.append(&record("bbb2")).await.unwrap();

        let plates: Vec<String> = store
            .records()
            .unwrap()
            .into_iter()
            .map(|r| r.record.plate().to_string())
            .collect();
        assert_eq!(plates, vec!["AAA1", "BBB2"]);
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let store = InMemoryRecordStore::new();
        let clone = store.clone();
        clone.append(&record("aaa1")).await.unwrap();
        assert!(!store.is_empty().unwrap());
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let store = InMemoryRecordStore::new();
        let shared = store.records.clone();
        let _ = std::thread::spawn(move || {
            let _guard = shared.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(matches!(store.len(), Err(StoreError::Unavailable { .. })));
        assert!(store.is_empty().is_err());
        assert!(store.records().is_err());
    }
}
