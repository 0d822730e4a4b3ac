//! Record store trait

use crate::core::error::StoreError;
use crate::core::registration::RegistrationRecord;
use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

/// Identifier assigned to a record by the store
pub type RecordId = Uuid;

/// A record together with the id the store assigned to it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredRecord {
    pub id: RecordId,
    #[serde(flatten)]
    pub record: RegistrationRecord,
}

/// Durable, append-only destination for validated registrations
///
/// Implementations must accept concurrent appends from independent requests.
/// No ordering is required between appends.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a record and return its id
    async fn append(&self, record: &RegistrationRecord) -> Result<RecordId, StoreError>;

    /// Short backend name used in logs and errors
    fn backend_name(&self) -> &'static str;
}
