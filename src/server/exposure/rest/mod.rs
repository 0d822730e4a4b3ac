//! REST API exposure
//!
//! JSON endpoints for the geofence check and record submission, plus health
//! checks. The browser pages call `/api/geofence/check`; other clients (a
//! native kiosk app, scripts) can drive the whole flow through this API.

use crate::core::error::{InvalidCoordinate, KioskError, KioskResult, RequestError};
use crate::core::geo::GeofenceVerdict;
use crate::core::registration::{Direction, RegistrationInput};
use crate::core::service::SubmissionOutcome;
use crate::server::host::KioskHost;
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// Raw device location as sent by the browser
#[derive(Debug, Deserialize)]
pub struct GeofenceCheckRequest {
    pub latitude: f64,
    pub longitude: f64,
}

/// Registration body as sent by API clients
///
/// The direction stays a string until the handler parses it, so an unknown
/// value is reported as a request error rather than a body decoding failure.
#[derive(Debug, Deserialize)]
pub struct RegistrationRequest {
    #[serde(default)]
    pub driver_name: String,
    #[serde(default)]
    pub plate: String,
    #[serde(default)]
    pub order: String,
    #[serde(default)]
    pub carrier: String,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub odometer: Option<String>,
}

impl RegistrationRequest {
    fn into_input(self) -> KioskResult<RegistrationInput> {
        let direction: Direction = self.direction.as_deref().unwrap_or_default().parse()?;
        Ok(RegistrationInput {
            driver_name: self.driver_name,
            plate: self.plate,
            order: self.order,
            carrier: self.carrier,
            direction,
            odometer: self.odometer,
        })
    }
}

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST routes
    ///
    /// - `GET /health`, `GET /healthz`
    /// - `GET /api/geofence` - configured reference point and radius
    /// - `POST /api/geofence/check` - classify a device location
    /// - `POST /api/registrations` - validate and store a registration
    pub fn routes() -> Router<Arc<KioskHost>> {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
            .route("/api/geofence", get(geofence_reference))
            .route("/api/geofence/check", post(check_location))
            .route("/api/registrations", post(create_registration))
    }

    /// Health check endpoint handler
    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "gatelog"
        }))
    }
}

async fn geofence_reference(State(host): State<Arc<KioskHost>>) -> Json<Value> {
    let reference = host.geofence.reference();
    Json(json!({
        "latitude": reference.point.latitude(),
        "longitude": reference.point.longitude(),
        "radius_meters": reference.radius_meters,
    }))
}

async fn check_location(
    State(host): State<Arc<KioskHost>>,
    body: Result<Json<GeofenceCheckRequest>, JsonRejection>,
) -> Result<Json<GeofenceVerdict>, KioskError> {
    let Json(request) = body.map_err(|e| {
        tracing::debug!(error = %e, "unreadable device location");
        InvalidCoordinate::Unreadable
    })?;

    let verdict = host
        .geofence
        .check(request.latitude, request.longitude)
        .inspect_err(|e| tracing::debug!(error = %e, "unusable device location"))?;
    Ok(Json(verdict))
}

async fn create_registration(
    State(host): State<Arc<KioskHost>>,
    body: Result<Json<RegistrationRequest>, JsonRejection>,
) -> Result<Response, KioskError> {
    let Json(request) = body.map_err(|e| RequestError::InvalidBody {
        message: e.body_text(),
    })?;
    let input = request.into_input()?;

    let response = match host.registrations.submit(input).await {
        SubmissionOutcome::Saved { id, record } => (
            StatusCode::CREATED,
            Json(json!({
                "id": id,
                "record": record,
            })),
        )
            .into_response(),
        SubmissionOutcome::Invalid { error, echo } => {
            rejection(KioskError::from(error), json!({ "echo": echo }))
        }
        SubmissionOutcome::StoreFailed { error, echo, .. } => {
            rejection(KioskError::from(error), json!({ "echo": echo }))
        }
    };
    Ok(response)
}

fn rejection(error: KioskError, details: Value) -> Response {
    let status = error.status_code();
    let body = error.to_response().with_details(details);
    (status, Json(body)).into_response()
}
