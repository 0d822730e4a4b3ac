//! API exposure layers
//!
//! Both exposures consume the same `KioskHost`:
//! - `rest`: JSON API and health checks
//! - `html`: kiosk pages rendered with tera

pub mod html;
pub mod rest;

pub use html::{HtmlExposure, PageRenderer};
pub use rest::RestExposure;
