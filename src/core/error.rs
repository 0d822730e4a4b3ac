//! Typed error handling for the kiosk
//!
//! Every failure a request can hit is one of the categories below. Each
//! category knows its HTTP status, a stable error code for clients, and the
//! message that is safe to show to the person standing at the kiosk.
//!
//! # Error Categories
//!
//! - [`InvalidCoordinate`]: unusable geolocation handed to the geofence
//! - [`ValidationError`]: a registration form field failed validation
//! - [`StoreError`]: the record store could not append a record
//! - [`ConfigError`]: configuration parsing and validation
//! - [`RequestError`]: malformed requests from the surrounding HTTP layer
//!
//! # Example
//!
//! ```rust,ignore
//! match host.geofence().check(lat, lon) {
//!     Ok(verdict) => Json(verdict).into_response(),
//!     Err(e) => KioskError::from(e).into_response(),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Message shown when a geolocation cannot be used
pub const LOCATION_UNAVAILABLE_MESSAGE: &str = "could not determine your location";

/// Message shown when the record store rejected an append
pub const STORE_FAILURE_MESSAGE: &str = "could not save the record, please try again";

/// The main error type for the kiosk
#[derive(Debug, Error)]
pub enum KioskError {
    /// Geolocation errors
    #[error(transparent)]
    Geofence(#[from] InvalidCoordinate),

    /// Registration form validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Record store errors
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// HTTP/Request errors
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Internal errors (template rendering and the like)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Attach details to the response
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl KioskError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            KioskError::Geofence(_) => StatusCode::BAD_REQUEST,
            KioskError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            KioskError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            KioskError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            KioskError::Request(e) => e.status_code(),
            KioskError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            KioskError::Geofence(_) => "INVALID_COORDINATE",
            KioskError::Validation(e) => e.error_code(),
            KioskError::Store(_) => "STORE_ERROR",
            KioskError::Config(_) => "CONFIG_ERROR",
            KioskError::Request(e) => e.error_code(),
            KioskError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show to the end user
    ///
    /// Store and internal failures never leak their cause here; it goes to
    /// the log instead.
    pub fn public_message(&self) -> String {
        match self {
            KioskError::Geofence(_) => LOCATION_UNAVAILABLE_MESSAGE.to_string(),
            KioskError::Store(_) => STORE_FAILURE_MESSAGE.to_string(),
            KioskError::Internal(_) => "internal error".to_string(),
            other => other.to_string(),
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.public_message(),
            details: None,
        }
    }
}

impl IntoResponse for KioskError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

impl From<tera::Error> for KioskError {
    fn from(err: tera::Error) -> Self {
        KioskError::Internal(format!("template rendering failed: {}", err))
    }
}

// =============================================================================
// Geofence Errors
// =============================================================================

/// A latitude/longitude pair that cannot be used for distance computation
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidCoordinate {
    /// NaN or infinite component
    #[error("{axis} is not a finite number")]
    NotFinite { axis: Axis },

    /// Component outside its valid range
    #[error("{axis} {value} is outside [{min}, {max}]")]
    OutOfRange {
        axis: Axis,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Request body did not carry two numeric components
    #[error("location could not be read from the request")]
    Unreadable,

    /// Radius that is not a positive finite number of meters
    #[error("radius {radius_meters} must be a positive finite number of meters")]
    InvalidRadius { radius_meters: f64 },
}

/// Coordinate component named in an [`InvalidCoordinate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Latitude => f.write_str("latitude"),
            Axis::Longitude => f.write_str("longitude"),
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Registration form validation failures, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name required")]
    NameRequired,

    #[error("plate required")]
    PlateRequired,

    #[error("order required")]
    OrderRequired,

    #[error("carrier required")]
    CarrierRequired,

    #[error("odometer must be a valid integer")]
    OdometerNotInteger,

    #[error("odometer must be non-negative")]
    OdometerNegative,
}

impl ValidationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::NameRequired => "NAME_REQUIRED",
            ValidationError::PlateRequired => "PLATE_REQUIRED",
            ValidationError::OrderRequired => "ORDER_REQUIRED",
            ValidationError::CarrierRequired => "CARRIER_REQUIRED",
            ValidationError::OdometerNotInteger => "ODOMETER_NOT_INTEGER",
            ValidationError::OdometerNegative => "ODOMETER_NEGATIVE",
        }
    }

    /// Form field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::NameRequired => "driver_name",
            ValidationError::PlateRequired => "plate",
            ValidationError::OrderRequired => "order",
            ValidationError::CarrierRequired => "carrier",
            ValidationError::OdometerNotInteger | ValidationError::OdometerNegative => "odometer",
        }
    }
}

// =============================================================================
// Store Errors
// =============================================================================

/// Errors raised by a [`RecordStore`](crate::core::store::RecordStore)
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend refused or could not be reached
    #[error("{backend} store unavailable: {message}")]
    Unavailable {
        backend: &'static str,
        message: String,
    },

    /// I/O failure while writing
    #[error("{backend} store I/O error: {source}")]
    Io {
        backend: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Record could not be encoded for the backend
    #[error("failed to serialize record for {backend}: {message}")]
    Serialization {
        backend: &'static str,
        message: String,
    },
}

impl StoreError {
    pub fn backend(&self) -> &'static str {
        match self {
            StoreError::Unavailable { backend, .. }
            | StoreError::Io { backend, .. }
            | StoreError::Serialization { backend, .. } => backend,
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration{}: {message}", .file.as_deref().map(|f| format!(" '{}'", f)).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// A configuration value is out of bounds or unusable
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors caused by malformed requests
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Direction selector carried an unknown value
    #[error("Unknown direction '{value}', expected 'entry' or 'exit'")]
    InvalidDirection { value: String },

    /// Body could not be decoded into the expected shape
    #[error("Invalid request body: {message}")]
    InvalidBody { message: String },
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::InvalidDirection { .. } | RequestError::InvalidBody { .. } => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidDirection { .. } => "INVALID_DIRECTION",
            RequestError::InvalidBody { .. } => "INVALID_BODY",
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for kiosk operations
pub type KioskResult<T> = Result<T, KioskError>;

// =============================================================================
// Tests
// =============================================================================
