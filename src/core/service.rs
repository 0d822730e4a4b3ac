//! Registration service: validation followed by persistence

use crate::core::error::{STORE_FAILURE_MESSAGE, StoreError, ValidationError};
use crate::core::registration::{
    RegistrationInput, RegistrationRecord, RegistrationValidator, ValidationOutcome,
};
use crate::core::store::{RecordId, RecordStore};
use std::sync::Arc;

/// Outcome of one form submission
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// Validated and appended to the store
    Saved {
        id: RecordId,
        record: RegistrationRecord,
    },

    /// Rejected by validation; nothing was stored
    Invalid {
        error: ValidationError,
        echo: RegistrationInput,
    },

    /// Validated, but the store refused the append
    StoreFailed {
        error: StoreError,
        record: RegistrationRecord,
        echo: RegistrationInput,
    },
}

impl SubmissionOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SubmissionOutcome::Saved { .. })
    }

    /// Message to show next to the re-displayed form, if any
    pub fn user_message(&self) -> Option<String> {
        match self {
            SubmissionOutcome::Saved { .. } => None,
            SubmissionOutcome::Invalid { error, .. } => Some(error.to_string()),
            SubmissionOutcome::StoreFailed { .. } => Some(STORE_FAILURE_MESSAGE.to_string()),
        }
    }

    /// Raw input to echo back into the form, if the submission failed
    pub fn echo(&self) -> Option<&RegistrationInput> {
        match self {
            SubmissionOutcome::Saved { .. } => None,
            SubmissionOutcome::Invalid { echo, .. } | SubmissionOutcome::StoreFailed { echo, .. } => {
                Some(echo)
            }
        }
    }
}

/// Validates submissions and appends accepted records to the injected store
#[derive(Clone)]
pub struct RegistrationService {
    validator: RegistrationValidator,
    store: Arc<dyn RecordStore>,
}

impl RegistrationService {
    pub fn new(validator: RegistrationValidator, store: Arc<dyn RecordStore>) -> Self {
        Self { validator, store }
    }

    pub fn validator(&self) -> &RegistrationValidator {
        &self.validator
    }

    /// Validate one submission and persist it when it passes
    ///
    /// Store failures are not retried; the user re-submits the form.
    pub async fn submit(&self, input: RegistrationInput) -> SubmissionOutcome {
        let echo = input.clone();

        let record = match self.validator.validate(input) {
            ValidationOutcome::Accepted(record) => record,
            ValidationOutcome::Rejected { error, echo } => {
                tracing::debug!(field = error.field(), %error, "registration rejected");
                return SubmissionOutcome::Invalid { error, echo };
            }
        };

        match self.store.append(&record).await {
            Ok(id) => {
                tracing::info!(
                    record_id = %id,
                    direction = %record.direction(),
                    plate = record.plate(),
                    backend = self.store.backend_name(),
                    "registration saved"
                );
                SubmissionOutcome::Saved { id, record }
            }
            Err(error) => {
                tracing::error!(
                    backend = error.backend(),
                    error = %error,
                    plate = record.plate(),
                    "failed to append registration"
                );
                SubmissionOutcome::StoreFailed {
                    error,
                    record,
                    echo,
                }
            }
        }
    }
}
