//! Normalization and validation primitives
//!
//! Filters turn raw form strings into their canonical form; validators check
//! canonical values. The registration validator composes both in a fixed
//! order.

pub mod filters;
pub mod validators;

pub use filters::{normalize_carrier, normalize_name, normalize_order, normalize_plate};
