//! HTML pages for the kiosk browser
//!
//! Flow: `/` checks the device location, `/direction` picks entry or exit,
//! `/register` shows and accepts the registration form. A failed submission
//! re-renders the form with the message and exactly what the user typed.

use crate::core::error::{KioskError, KioskResult, RequestError};
use crate::core::registration::{Direction, RegistrationInput};
use crate::core::service::SubmissionOutcome;
use crate::server::host::KioskHost;
use axum::{
    Form, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tera::{Context, Tera};

const TEMPLATES: [(&str, &str); 5] = [
    ("layout.html", include_str!("templates/layout.html")),
    ("index.html", include_str!("templates/index.html")),
    ("direction.html", include_str!("templates/direction.html")),
    ("register.html", include_str!("templates/register.html")),
    ("saved.html", include_str!("templates/saved.html")),
];

/// Renders the kiosk pages from the embedded templates
pub struct PageRenderer {
    tera: Tera,
}

/// Raw form values bound back into the registration form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormValues {
    pub driver_name: String,
    pub plate: String,
    pub order: String,
    pub carrier: String,
    pub odometer: String,
}

impl From<&RegistrationInput> for FormValues {
    fn from(input: &RegistrationInput) -> Self {
        Self {
            driver_name: input.driver_name.clone(),
            plate: input.plate.clone(),
            order: input.order.clone(),
            carrier: input.carrier.clone(),
            odometer: input.odometer.clone().unwrap_or_default(),
        }
    }
}

#[derive(Serialize)]
struct FormView<'a> {
    direction: &'a str,
    direction_label: &'a str,
    values: &'a FormValues,
    error: Option<&'a str>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)?;
        Ok(Self { tera })
    }

    pub fn index(&self, radius_meters: f64) -> KioskResult<String> {
        let mut context = Context::new();
        context.insert("radius_meters", &radius_meters);
        Ok(self.tera.render("index.html", &context)?)
    }

    pub fn direction(&self) -> KioskResult<String> {
        Ok(self.tera.render("direction.html", &Context::new())?)
    }

    /// Registration form, optionally with an error and echoed values
    pub fn registration_form(
        &self,
        direction: Option<Direction>,
        values: &FormValues,
        error: Option<&str>,
    ) -> KioskResult<String> {
        let view = FormView {
            direction: direction.map(|d| d.as_str()).unwrap_or_default(),
            direction_label: direction.map(|d| d.label()).unwrap_or("Gate"),
            values,
            error,
        };
        Ok(self
            .tera
            .render("register.html", &Context::from_serialize(&view)?)?)
    }

    pub fn saved(&self, direction: Direction, plate: &str, timestamp: &str) -> KioskResult<String> {
        let mut context = Context::new();
        context.insert("direction_label", direction.label());
        context.insert("plate", plate);
        context.insert("timestamp", timestamp);
        Ok(self.tera.render("saved.html", &context)?)
    }
}

/// Query string carrying the preselected direction
#[derive(Debug, Default, Deserialize)]
pub struct DirectionQuery {
    #[serde(default)]
    pub direction: Option<String>,
}

impl DirectionQuery {
    fn parse(&self) -> KioskResult<Option<Direction>> {
        match self.direction.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => Ok(Some(raw.parse()?)),
        }
    }
}

/// Urlencoded registration form body
#[derive(Debug, Default, Deserialize)]
pub struct RegistrationForm {
    #[serde(default)]
    pub driver_name: String,
    #[serde(default)]
    pub plate: String,
    #[serde(default)]
    pub order: String,
    #[serde(default)]
    pub carrier: String,
    #[serde(default)]
    pub odometer: String,
    #[serde(default)]
    pub direction: String,
}

impl RegistrationForm {
    fn into_input(self, direction: Direction) -> RegistrationInput {
        RegistrationInput {
            driver_name: self.driver_name,
            plate: self.plate,
            order: self.order,
            carrier: self.carrier,
            direction,
            odometer: Some(self.odometer),
        }
    }
}

/// HTML exposure
pub struct HtmlExposure;

impl HtmlExposure {
    /// Kiosk page routes
    pub fn routes() -> Router<Arc<KioskHost>> {
        Router::new()
            .route("/", get(index))
            .route("/direction", get(direction))
            .route("/register", get(registration_form).post(submit_registration))
    }
}

async fn index(State(host): State<Arc<KioskHost>>) -> KioskResult<Html<String>> {
    let radius = host.geofence.reference().radius_meters;
    Ok(Html(host.pages.index(radius)?))
}

async fn direction(State(host): State<Arc<KioskHost>>) -> KioskResult<Html<String>> {
    Ok(Html(host.pages.direction()?))
}

async fn registration_form(
    State(host): State<Arc<KioskHost>>,
    Query(query): Query<DirectionQuery>,
) -> KioskResult<Html<String>> {
    let direction = query.parse()?;
    Ok(Html(host.pages.registration_form(
        direction,
        &FormValues::default(),
        None,
    )?))
}

async fn submit_registration(
    State(host): State<Arc<KioskHost>>,
    Query(query): Query<DirectionQuery>,
    Form(form): Form<RegistrationForm>,
) -> Result<Response, KioskError> {
    // The select in the body wins over the query string it was prefilled from
    let direction = if form.direction.trim().is_empty() {
        query.parse()?
    } else {
        Some(form.direction.parse()?)
    };
    let direction = direction.ok_or_else(|| RequestError::InvalidDirection {
        value: String::new(),
    })?;

    let outcome = host.registrations.submit(form.into_input(direction)).await;

    let (status, body) = match &outcome {
        SubmissionOutcome::Saved { record, .. } => (
            StatusCode::OK,
            host.pages
                .saved(record.direction(), record.plate(), record.timestamp())?,
        ),
        SubmissionOutcome::Invalid { echo, .. } | SubmissionOutcome::StoreFailed { echo, .. } => {
            let status = if matches!(outcome, SubmissionOutcome::Invalid { .. }) {
                StatusCode::UNPROCESSABLE_ENTITY
            } else {
                StatusCode::SERVICE_UNAVAILABLE
            };
            let message = outcome.user_message();
            (
                status,
                host.pages.registration_form(
                    Some(echo.direction),
                    &FormValues::from(echo),
                    message.as_deref(),
                )?,
            )
        }
    };

    Ok((status, Html(body)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_compile() {
        assert!(PageRenderer::new().is_ok());
    }

    #[test]
    fn test_form_echoes_raw_values_escaped() {
        let pages = PageRenderer::new().unwrap();
        let values = FormValues {
            driver_name: " joão ".to_string(),
            plate: "abc-1234".to_string(),
            order: "<b>x</b>".to_string(),
            ..FormValues::default()
        };

        let html = pages
            .registration_form(Some(Direction::Exit), &values, Some("carrier required"))
            .unwrap();

        assert!(html.contains("value=\" joão \""));
        assert!(html.contains("value=\"abc-1234\""));
        assert!(html.contains("&lt;b&gt;x&lt;&#x2F;b&gt;"));
        assert!(html.contains("carrier required"));
        assert!(html.contains("<option value=\"exit\" selected>"));
    }

    #[test]
    fn test_form_without_direction_selects_nothing() {
        let pages = PageRenderer::new().unwrap();
        let html = pages
            .registration_form(None, &FormValues::default(), None)
            .unwrap();
        assert!(!html.contains("selected"));
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn test_direction_query_parse() {
        let q = DirectionQuery {
            direction: Some("Saída".to_string()),
        };
        assert_eq!(q.parse().unwrap(), Some(Direction::Exit));

        let q = DirectionQuery { direction: None };
        assert_eq!(q.parse().unwrap(), None);

        let q = DirectionQuery {
            direction: Some("up".to_string()),
        };
        assert!(q.parse().is_err());
    }
}
