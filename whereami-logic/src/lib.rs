mod address;
mod error;
mod geocode;
mod location;
mod locator;
#[cfg(test)]
mod tests;

pub use address::Address;
pub use error::{ErrorKind, GeocodeError, LocateError, PositionError};
pub use geocode::{AddressComponent, Candidate, GeocodeResponse, Geocoder, resolve_address};
pub use location::{
    Location, LocationComponent, LocationService, PositionOptions, UtcDT, acquire_position,
};
pub use locator::{Locator, LocatorState, LocatorStep, RunId, StateUpdateSender};

pub mod prelude {
    use anyhow::Error as AnyhowError;
    use std::result::Result as StdResult;
    pub type Result<T = (), E = AnyhowError> = StdResult<T, E>;
    pub use anyhow::Context;
}
