use log::debug;
use reqwest::{Client, Url};

use whereami_logic::{GeocodeError, GeocodeResponse, Geocoder, Location, prelude::*};

use crate::config::GeocoderConfig;

/// Reverse geocoding over the Google Maps Geocoding HTTP API
pub struct GoogleGeocoder {
    client: Client,
    endpoint: Url,
}

impl GoogleGeocoder {
    pub fn new(config: GeocoderConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint)
            .with_context(|| format!("Invalid geocoding endpoint \"{}\"", config.endpoint))?;

        let mut builder = Client::builder().timeout(config.timeout);
        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { client, endpoint })
    }

    fn request_url(&self, location: &Location, api_key: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("latlng", &format!("{},{}", location.lat, location.long))
            .append_pair("key", api_key);
        url
    }
}

/// The request URL carries the API key, so it's stripped before the error goes anywhere
fn transport_error(err: reqwest::Error) -> GeocodeError {
    let err = err.without_url();
    if err.is_timeout() {
        GeocodeError::Transport("The geocoding service took too long to respond.".to_string())
    } else {
        GeocodeError::Transport(format!("Could not reach the geocoding service: {err}"))
    }
}

impl Geocoder for GoogleGeocoder {
    async fn lookup(
        &self,
        location: &Location,
        api_key: &str,
    ) -> Result<GeocodeResponse, GeocodeError> {
        debug!(
            "Requesting address for {}, {} from {}",
            location.lat, location.long, self.endpoint
        );

        let resp = self
            .client
            .get(self.request_url(location, api_key))
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(GeocodeError::Transport(format!(
                "HTTP error: {}",
                status.as_u16()
            )));
        }

        let body = resp.bytes().await.map_err(transport_error)?;

        serde_json::from_slice(&body).map_err(|why| {
            debug!("Couldn't parse geocoding response: {why}");
            GeocodeError::Unknown(format!("Unexpected geocoding response: {why}"))
        })
    }
}
