use std::time::Duration;

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::PositionError;

/// Convenience alias for UTC DT
pub type UtcDT = DateTime<Utc>;

/// A "part" of a location
pub type LocationComponent = f64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
/// A single fix as gotten from a positioning capability
pub struct Location {
    /// Latitude
    pub lat: LocationComponent,
    /// Longitude
    pub long: LocationComponent,
    /// Radius of uncertainty in meters
    pub accuracy: f64,
    /// When the fix was taken
    pub timestamp: UtcDT,
}

impl Location {
    pub fn new(lat: LocationComponent, long: LocationComponent, accuracy: f64) -> Self {
        Self {
            lat,
            long,
            accuracy,
            timestamp: Utc::now(),
        }
    }

    /// Check the reading is somewhere on Earth with a sane accuracy
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.long)
            && self.accuracy.is_finite()
            && self.accuracy >= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// What we ask of the positioning capability
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached fix the capability may hand back
    pub maximum_age: Duration,
}

impl PositionOptions {
    /// Best accuracy, 10 second limit, never a cached fix
    pub const SINGLE_SHOT: Self = Self {
        enable_high_accuracy: true,
        timeout: Duration::from_millis(10_000),
        maximum_age: Duration::ZERO,
    };
}

pub trait LocationService: Send + Sync {
    /// Whether the host has a positioning capability at all, checked before every request
    fn is_available(&self) -> bool {
        true
    }
    /// Get a single fix honoring `options` as closely as the platform allows
    fn current_position(
        &self,
        options: PositionOptions,
    ) -> impl Future<Output = Result<Location, PositionError>> + Send;
}

/// Get one fresh fix from `service`.
///
/// The timeout from [PositionOptions::SINGLE_SHOT] is enforced here whether or not the service
/// honors it. Readings older than the request or outside valid ranges are rejected.
pub async fn acquire_position<L: LocationService>(service: &L) -> Result<Location, PositionError> {
    if !service.is_available() {
        return Err(PositionError::capability_unavailable());
    }

    let options = PositionOptions::SINGLE_SHOT;
    let requested_at = Utc::now();

    let location = tokio::time::timeout(options.timeout, service.current_position(options))
        .await
        .map_err(|_| PositionError::timed_out())??;

    let oldest = requested_at
        - chrono::Duration::from_std(options.maximum_age).unwrap_or(chrono::TimeDelta::zero());
    if location.timestamp < oldest {
        debug!(
            "Rejecting cached fix from {} (requested at {requested_at})",
            location.timestamp
        );
        return Err(PositionError::PositionUnavailable(
            "Only a cached location was available.".to_string(),
        ));
    }

    if !location.is_valid() {
        return Err(PositionError::PositionUnavailable(format!(
            "Received an invalid location ({}, {}).",
            location.lat, location.long
        )));
    }

    Ok(location)
}
