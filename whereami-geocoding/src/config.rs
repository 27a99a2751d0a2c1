use std::time::Duration;

const fn geocode_endpoint() -> &'static str {
    if let Some(endpoint) = option_env!("GEOCODE_ENDPOINT") {
        endpoint
    } else {
        "https://maps.googleapis.com/maps/api/geocode/json"
    }
}

const fn request_timeout_secs() -> u64 {
    if let Some(secs) = option_env!("GEOCODE_TIMEOUT_SECS") {
        const_str::parse!(secs, u64)
    } else {
        15
    }
}

/// Reverse geocoding endpoint, can be overridden at build time with `GEOCODE_ENDPOINT`
pub const DEFAULT_ENDPOINT: &str = geocode_endpoint();

/// Upper bound on a single lookup, the pipeline itself never times out a lookup
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(request_timeout_secs());

#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub endpoint: String,
    pub timeout: Duration,
    /// Route requests through the proxy configured in the environment
    pub system_proxy: bool,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            system_proxy: true,
        }
    }
}
