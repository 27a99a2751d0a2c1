use std::str::FromStr;

use anyhow::{Context, bail};
use whereami_logic::{Location, LocationService, PositionError, PositionOptions};

use crate::{Result, gpsd::GpsdLocation};

#[derive(Debug, Clone, Copy, PartialEq)]
/// A position given by hand
pub struct FixedLocation {
    lat: f64,
    long: f64,
    accuracy: f64,
}

impl FromStr for FixedLocation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .context("Coordinates must be numbers")?;

        let (lat, long, accuracy) = match parts.as_slice() {
            [lat, long] => (*lat, *long, 0.0),
            [lat, long, accuracy] => (*lat, *long, *accuracy),
            _ => bail!("Expected LAT,LNG or LAT,LNG,ACCURACY"),
        };

        if !Location::new(lat, long, accuracy).is_valid() {
            bail!("{s} is not a position on Earth");
        }

        Ok(Self {
            lat,
            long,
            accuracy,
        })
    }
}

impl LocationService for FixedLocation {
    async fn current_position(
        &self,
        _options: PositionOptions,
    ) -> Result<Location, PositionError> {
        Ok(Location::new(self.lat, self.long, self.accuracy))
    }
}

/// Whichever positioning capability the user configured, gpsd unless a position was given
pub enum HostLocation {
    Fixed(FixedLocation),
    Gpsd(GpsdLocation),
}

impl LocationService for HostLocation {
    async fn current_position(
        &self,
        options: PositionOptions,
    ) -> Result<Location, PositionError> {
        match self {
            Self::Fixed(fixed) => fixed.current_position(options).await,
            Self::Gpsd(gpsd) => gpsd.current_position(options).await,
        }
    }
}
