//! # gatelog
//!
//! Geofenced driver check-in/check-out kiosk.
//!
//! A driver at the facility gate confirms they are within a configured radius
//! of the reference point, picks entry or exit, and submits a short form
//! (driver name, plate, collection order, carrier, optional odometer). The
//! submission is normalized, validated, stamped with local civil time and
//! appended to a record store.
//!
//! ## Features
//!
//! - **Geofence**: Haversine distance against a configurable reference point
//! - **Normalization**: plates and order numbers stored in canonical form
//! - **Ordered validation**: one clear message per failed submission, with the
//!   raw input echoed back for correction
//! - **Pluggable storage**: in-memory or durable JSON-lines file
//! - **Kiosk pages + JSON API**: served with axum
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gatelog::prelude::*;
//!
//! let validator = RegistrationValidator::new(chrono_tz::America::Sao_Paulo);
//! let input = RegistrationInput {
//!     driver_name: " joão ".into(),
//!     plate: "abc-1234".into(),
//!     order: " ord 55 ".into(),
//!     carrier: " acme ".into(),
//!     direction: Direction::Entry,
//!     odometer: Some("1000".into()),
//! };
//!
//! match validator.validate(input) {
//!     ValidationOutcome::Accepted(record) => assert_eq!(record.plate(), "ABC1234"),
//!     ValidationOutcome::Rejected { error, .. } => eprintln!("{}", error),
//! }
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Geofence ===
    pub use crate::core::geo::{
        Coordinate, EARTH_RADIUS_METERS, GeofenceChecker, GeofenceVerdict, ReferencePoint,
        distance_meters, is_within_radius,
    };

    // === Registration ===
    pub use crate::core::registration::{
        Direction, RegistrationInput, RegistrationRecord, RegistrationValidator,
        ValidationOutcome,
    };
    pub use crate::core::service::{RegistrationService, SubmissionOutcome};
    pub use crate::core::validation::{
        normalize_carrier, normalize_name, normalize_order, normalize_plate,
    };

    // === Errors ===
    pub use crate::core::error::{
        ConfigError, InvalidCoordinate, KioskError, KioskResult, RequestError, StoreError,
        ValidationError,
    };

    // === Storage ===
    pub use crate::core::store::{RecordId, RecordStore, StoredRecord};
    pub use crate::storage::{InMemoryRecordStore, JsonLinesRecordStore};

    // === Config ===
    pub use crate::config::{KioskConfig, StorageBackend};

    // === Server ===
    pub use crate::server::{KioskHost, ServerBuilder};

    // === External dependencies ===
    pub use async_trait::async_trait;
}
