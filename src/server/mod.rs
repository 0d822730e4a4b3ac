//! Server module for building the kiosk HTTP server
//!
//! This module provides a `ServerBuilder` that wires:
//! - the kiosk pages (location check, direction selector, registration form)
//! - the JSON API (geofence check, registrations)
//! - health check routes

pub mod builder;
pub mod exposure;
pub mod host;
pub mod router;

pub use builder::ServerBuilder;
pub use host::KioskHost;
