//! Geofence verification
//!
//! Great-circle distance (Haversine) between a device location and the
//! facility reference point, and the inside/outside classification that gates
//! the registration workflow.

use crate::core::error::{Axis, InvalidCoordinate};
use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A validated latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = InvalidCoordinate;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::try_new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    /// Build a coordinate, rejecting non-finite or out-of-range components
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        check_component(Axis::Latitude, latitude, 90.0)?;
        check_component(Axis::Longitude, longitude, 180.0)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

fn check_component(axis: Axis, value: f64, bound: f64) -> Result<(), InvalidCoordinate> {
    if !value.is_finite() {
        return Err(InvalidCoordinate::NotFinite { axis });
    }
    if !(-bound..=bound).contains(&value) {
        return Err(InvalidCoordinate::OutOfRange {
            axis,
            value,
            min: -bound,
            max: bound,
        });
    }
    Ok(())
}

/// The facility location and the radius a device must be within
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferencePoint {
    pub point: Coordinate,
    pub radius_meters: f64,
}

impl ReferencePoint {
    pub fn try_new(point: Coordinate, radius_meters: f64) -> Result<Self, InvalidCoordinate> {
        if !radius_meters.is_finite() || radius_meters <= 0.0 {
            return Err(InvalidCoordinate::InvalidRadius { radius_meters });
        }
        Ok(Self {
            point,
            radius_meters,
        })
    }
}

/// Great-circle distance in meters between two coordinates
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let delta_phi = (b.latitude - a.latitude).to_radians();
    let delta_lambda = (b.longitude - a.longitude).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Whether `user` lies within the reference radius (boundary inclusive)
pub fn is_within_radius(user: Coordinate, reference: &ReferencePoint) -> bool {
    distance_meters(user, reference.point) <= reference.radius_meters
}

/// Result of checking one device location against the reference point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeofenceVerdict {
    pub inside: bool,
    pub distance_meters: f64,
    pub radius_meters: f64,
}

/// Classifies device locations against a fixed [`ReferencePoint`]
#[derive(Debug, Clone, Copy)]
pub struct GeofenceChecker {
    reference: ReferencePoint,
}

impl GeofenceChecker {
    pub fn new(reference: ReferencePoint) -> Self {
        Self { reference }
    }

    pub fn reference(&self) -> &ReferencePoint {
        &self.reference
    }

    /// Check raw degrees from a client device
    pub fn check(&self, latitude: f64, longitude: f64) -> Result<GeofenceVerdict, InvalidCoordinate> {
        let user = Coordinate::try_new(latitude, longitude)?;
        Ok(self.classify(user))
    }

    pub fn classify(&self, user: Coordinate) -> GeofenceVerdict {
        let distance = distance_meters(user, self.reference.point);
        let verdict = GeofenceVerdict {
            inside: distance <= self.reference.radius_meters,
            distance_meters: distance,
            radius_meters: self.reference.radius_meters,
        };

        tracing::debug!(
            distance_meters = distance,
            inside = verdict.inside,
            "geofence check"
        );

        verdict
    }
}
