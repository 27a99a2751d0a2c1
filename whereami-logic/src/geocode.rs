use log::{debug, warn};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{address::Address, error::GeocodeError, location::Location};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Raw reply to a reverse geocoding request
pub struct GeocodeResponse {
    pub status: String,
    /// Candidates ranked best first
    #[serde(default, deserialize_with = "null_as_empty")]
    pub results: Vec<Candidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Candidate>, D::Error> {
    Option::<Vec<Candidate>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub formatted_address: String,
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
    #[serde(default)]
    pub place_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressComponent {
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub long_name: String,
    #[serde(default)]
    pub short_name: String,
}

impl AddressComponent {
    pub fn has_type(&self, ty: &str) -> bool {
        self.types.iter().any(|t| t == ty)
    }
}

impl GeocodeResponse {
    /// Classify the provider status and normalize the best candidate
    pub fn into_address(self) -> Result<Address, GeocodeError> {
        match self.status.as_str() {
            "REQUEST_DENIED" => Err(self
                .error_message
                .filter(|msg| !msg.trim().is_empty())
                .map(GeocodeError::ConfigurationInvalid)
                .unwrap_or_else(GeocodeError::key_rejected)),
            "ZERO_RESULTS" => Err(GeocodeError::no_match()),
            "OK" => self
                .results
                .first()
                .map(Address::from)
                .ok_or_else(GeocodeError::no_match),
            other => Err(GeocodeError::ProviderError(format!(
                "Geocoding failed: {other}"
            ))),
        }
    }
}

/// A remote reverse geocoding service
pub trait Geocoder: Send + Sync {
    /// Issue exactly one lookup for `location`. Only transport level problems are errors here,
    /// whatever status the provider answers with is classified by [resolve_address].
    fn lookup(
        &self,
        location: &Location,
        api_key: &str,
    ) -> impl Future<Output = Result<GeocodeResponse, GeocodeError>> + Send;
}

/// Turn `location` into an [Address] with a single lookup, no retries.
pub async fn resolve_address<G: Geocoder>(
    geocoder: &G,
    location: &Location,
    api_key: &str,
) -> Result<Address, GeocodeError> {
    if api_key.trim().is_empty() {
        warn!("Refusing to geocode without an API key");
        return Err(GeocodeError::missing_key());
    }

    debug!("Resolving address for {}, {}", location.lat, location.long);

    geocoder.lookup(location, api_key).await?.into_address()
}
