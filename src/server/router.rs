//! Router assembly

use crate::server::exposure::{HtmlExposure, RestExposure};
use crate::server::host::KioskHost;
use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Build the full kiosk router from a host
///
/// Merges the HTML pages, the REST API and any custom routes, then attaches
/// request tracing.
pub fn build_routes(host: Arc<KioskHost>, custom_routes: Vec<Router>) -> Router {
    let mut app = RestExposure::routes()
        .merge(HtmlExposure::routes())
        .with_state(host);

    for custom_router in custom_routes {
        app = app.merge(custom_router);
    }

    app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
