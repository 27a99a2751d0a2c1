mod config;
mod google;
mod map;

pub use config::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT, GeocoderConfig};
pub use google::GoogleGeocoder;
pub use map::MapView;
