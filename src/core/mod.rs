//! Core module containing the geofence, registration and store types

pub mod error;
pub mod geo;
pub mod registration;
pub mod service;
pub mod store;
pub mod validation;

pub use error::{
    ConfigError, InvalidCoordinate, KioskError, KioskResult, RequestError, StoreError,
    ValidationError,
};
pub use geo::{
    Coordinate, GeofenceChecker, GeofenceVerdict, ReferencePoint, distance_meters,
    is_within_radius,
};
pub use registration::{
    Direction, RegistrationInput, RegistrationRecord, RegistrationValidator, ValidationOutcome,
};
pub use service::{RegistrationService, SubmissionOutcome};
pub use store::{RecordId, RecordStore, StoredRecord};
