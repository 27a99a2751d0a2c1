use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure while getting a fix from the positioning capability
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum PositionError {
    /// The host offers no positioning capability at all
    #[error("{0}")]
    CapabilityUnavailable(String),
    /// The user or host refused authorization
    #[error("{0}")]
    PermissionDenied(String),
    /// The sensor could not produce a fix
    #[error("{0}")]
    PositionUnavailable(String),
    /// No fix within the configured timeout
    #[error("{0}")]
    TimedOut(String),
    #[error("{0}")]
    Unknown(String),
}

impl PositionError {
    pub fn capability_unavailable() -> Self {
        Self::CapabilityUnavailable("Geolocation is not supported on this device.".to_string())
    }

    pub fn permission_denied() -> Self {
        Self::PermissionDenied(
            "Location access was denied. Please allow it in your system settings.".to_string(),
        )
    }

    pub fn position_unavailable() -> Self {
        Self::PositionUnavailable("Location information is unavailable.".to_string())
    }

    pub fn timed_out() -> Self {
        Self::TimedOut("Location request timed out. Please try again.".to_string())
    }

    pub fn unknown() -> Self {
        Self::Unknown("Failed to get location.".to_string())
    }
}

/// Failure while turning a location into an [crate::Address]
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GeocodeError {
    /// Missing credential, or the provider rejected it
    #[error("{0}")]
    ConfigurationInvalid(String),
    /// The provider has no address for these coordinates
    #[error("{0}")]
    NoMatch(String),
    /// Network failure or a non-2xx HTTP status
    #[error("{0}")]
    Transport(String),
    /// Any other non-success status reported by the provider
    #[error("{0}")]
    ProviderError(String),
    /// The response could not be understood
    #[error("{0}")]
    Unknown(String),
}

impl GeocodeError {
    pub fn missing_key() -> Self {
        Self::ConfigurationInvalid("No API key was provided for address lookup.".to_string())
    }

    pub fn key_rejected() -> Self {
        Self::ConfigurationInvalid(
            "API key is invalid or missing required permissions.".to_string(),
        )
    }

    pub fn no_match() -> Self {
        Self::NoMatch("No address found for your coordinates.".to_string())
    }

    pub fn unknown() -> Self {
        Self::Unknown("Unexpected geocoding error.".to_string())
    }
}

/// Flat classification of everything that can end a run in [crate::LocatorStep::Failed]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    CapabilityUnavailable,
    PermissionDenied,
    PositionUnavailable,
    TimedOut,
    ConfigurationInvalid,
    NoMatch,
    Transport,
    ProviderError,
    Unknown,
}

/// The single error a failed run carries
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum LocateError {
    #[error(transparent)]
    Position(#[from] PositionError),
    #[error(transparent)]
    Geocode(#[from] GeocodeError),
}

impl LocateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Position(err) => match err {
                PositionError::CapabilityUnavailable(_) => ErrorKind::CapabilityUnavailable,
                PositionError::PermissionDenied(_) => ErrorKind::PermissionDenied,
                PositionError::PositionUnavailable(_) => ErrorKind::PositionUnavailable,
                PositionError::TimedOut(_) => ErrorKind::TimedOut,
                PositionError::Unknown(_) => ErrorKind::Unknown,
            },
            Self::Geocode(err) => match err {
                GeocodeError::ConfigurationInvalid(_) => ErrorKind::ConfigurationInvalid,
                GeocodeError::NoMatch(_) => ErrorKind::NoMatch,
                GeocodeError::Transport(_) => ErrorKind::Transport,
                GeocodeError::ProviderError(_) => ErrorKind::ProviderError,
                GeocodeError::Unknown(_) => ErrorKind::Unknown,
            },
        }
    }

    /// The human-readable message, same as the [std::fmt::Display] output
    pub fn message(&self) -> &str {
        match self {
            Self::Position(
                PositionError::CapabilityUnavailable(msg)
                | PositionError::PermissionDenied(msg)
                | PositionError::PositionUnavailable(msg)
                | PositionError::TimedOut(msg)
                | PositionError::Unknown(msg),
            ) => msg,
            Self::Geocode(
                GeocodeError::ConfigurationInvalid(msg)
                | GeocodeError::NoMatch(msg)
                | GeocodeError::Transport(msg)
                | GeocodeError::ProviderError(msg)
                | GeocodeError::Unknown(msg),
            ) => msg,
        }
    }
}
