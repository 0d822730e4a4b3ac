//! Tests for the typed error handling system
//!
//! These tests verify that:
//! - Errors return correct HTTP status codes
//! - Error responses carry stable codes and safe messages
//! - Error conversions work correctly
//! - Error matching allows clients to handle specific cases

use axum::http::StatusCode;
use axum::response::IntoResponse;
use gatelog::prelude::*;

fn store_error() -> KioskError {
    KioskError::Store(StoreError::Unavailable {
        backend: "json_lines",
        message: "disk full on /var/lib/gatelog".to_string(),
    })
}

// =============================================================================
// HTTP Status Code Tests
// =============================================================================

mod status_code_tests {
    use super::*;

    #[test]
    fn test_invalid_coordinate_returns_400() {
        let err = KioskError::from(Coordinate::try_new(f64::NAN, 0.0).unwrap_err());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_validation_error_returns_422() {
        let err = KioskError::Validation(ValidationError::PlateRequired);
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_store_error_returns_503() {
        assert_eq!(store_error().status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_config_error_returns_500() {
        let err = KioskError::Config(ConfigError::InvalidValue {
            key: "timezone".to_string(),
            message: "unknown".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_direction_returns_400() {
        let err = KioskError::Request(RequestError::InvalidDirection {
            value: "sideways".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}

// =============================================================================
// Error Code Tests
// =============================================================================

mod error_code_tests {
    use super::*;

    #[test]
    fn test_validation_error_codes() {
        let cases = [
            (ValidationError::NameRequired, "NAME_REQUIRED"),
            (ValidationError::PlateRequired, "PLATE_REQUIRED"),
            (ValidationError::OrderRequired, "ORDER_REQUIRED"),
            (ValidationError::CarrierRequired, "CARRIER_REQUIRED"),
            (ValidationError::OdometerNotInteger, "ODOMETER_NOT_INTEGER"),
            (ValidationError::OdometerNegative, "ODOMETER_NEGATIVE"),
        ];
        for (error, code) in cases {
            assert_eq!(KioskError::from(error).error_code(), code);
        }
    }

    #[test]
    fn test_other_error_codes() {
        assert_eq!(store_error().error_code(), "STORE_ERROR");
        assert_eq!(
            KioskError::Internal("x".to_string()).error_code(),
            "INTERNAL_ERROR"
        );
        let err = KioskError::from("up".parse::<Direction>().unwrap_err());
        assert_eq!(err.error_code(), "INVALID_DIRECTION");

        let err = KioskError::Request(RequestError::InvalidBody {
            message: "expected an object".to_string(),
        });
        assert_eq!(err.error_code(), "INVALID_BODY");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unreadable_location_is_coordinate_error() {
        let err = KioskError::from(InvalidCoordinate::Unreadable);
        assert_eq!(err.error_code(), "INVALID_COORDINATE");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_response().message, "could not determine your location");
    }
}

// =============================================================================
// Error Response Tests
// =============================================================================

mod error_response_tests {
    use super::*;

    #[test]
    fn test_validation_response_uses_field_message() {
        let response = KioskError::from(ValidationError::OdometerNegative).to_response();
        assert_eq!(response.code, "ODOMETER_NEGATIVE");
        assert_eq!(response.message, "odometer must be non-negative");
        assert!(response.details.is_none());
    }

    #[test]
    fn test_store_response_hides_cause() {
        let response = store_error().to_response();
        assert_eq!(response.message, "could not save the record, please try again");
        assert!(!response.message.contains("disk"));
    }

    #[test]
    fn test_coordinate_response_is_generic() {
        let err = KioskError::from(Coordinate::try_new(0.0, 500.0).unwrap_err());
        assert_eq!(err.to_response().message, "could not determine your location");
        // The log still sees the detail
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_details_are_serialized() {
        let response = KioskError::from(ValidationError::NameRequired)
            .to_response()
            .with_details(serde_json::json!({ "echo": { "plate": "abc" } }));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["details"]["echo"]["plate"], "abc");
    }
}

// =============================================================================
// Error Matching Tests
// =============================================================================

mod error_matching_tests {
    use super::*;

    #[test]
    fn test_can_match_validation_field() {
        let err = KioskError::from(ValidationError::CarrierRequired);
        match err {
            KioskError::Validation(e) => assert_eq!(e.field(), "carrier"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_can_match_store_backend() {
        match store_error() {
            KioskError::Store(e) => assert_eq!(e.backend(), "json_lines"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}

// =============================================================================
// IntoResponse Tests
// =============================================================================

mod into_response_tests {
    use super::*;

    #[test]
    fn test_kiosk_error_into_response_status() {
        let response = KioskError::from(ValidationError::OrderRequired).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_store_error_into_response_status() {
        let response = store_error().into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
