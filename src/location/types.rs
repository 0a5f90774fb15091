//! Core types for place-name resolution.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A WGS84 coordinate pair. Not validated on construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Latitude in -90..90 and longitude in -180..180.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

/// One tagged fragment of a geocoded address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl AddressComponent {
    pub fn new(long_name: impl Into<String>, types: &[&str]) -> Self {
        Self {
            long_name: long_name.into(),
            types: types.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn has_type(&self, tag: &str) -> bool {
        self.types.iter().any(|t| t == tag)
    }

    pub fn has_any_type(&self, tags: &[&str]) -> bool {
        tags.iter().any(|tag| self.has_type(tag))
    }
}

/// One candidate result for a coordinate, in provider relevance order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocodeCandidate {
    #[serde(default)]
    pub formatted_address: String,
    #[serde(default, rename = "address_components")]
    pub components: Vec<AddressComponent>,
}

impl GeocodeCandidate {
    pub fn new(formatted_address: impl Into<String>, components: Vec<AddressComponent>) -> Self {
        Self {
            formatted_address: formatted_address.into(),
            components,
        }
    }
}

/// How one upstream geocoding call concluded.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderOutcome {
    /// Quota or key rejected by the provider.
    Denied { message: Option<String> },
    /// Any other non-success provider status (e.g. `ZERO_RESULTS`).
    NonOk {
        status: String,
        message: Option<String>,
    },
    Ok(Vec<GeocodeCandidate>),
    /// Network failure, timeout or malformed payload.
    TransportError(String),
}

/// Failures inside the provider client. Never escapes the provider boundary:
/// every variant becomes `ProviderOutcome::TransportError`.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Provider answered HTTP {0}")]
    HttpStatus(u16),
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl From<GeocodeError> for ProviderOutcome {
    fn from(err: GeocodeError) -> Self {
        ProviderOutcome::TransportError(err.to_string())
    }
}

/// Status tag attached to every resolved name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlaceNameStatus {
    Ok,
    Fallback,
    Error,
}

impl fmt::Display for PlaceNameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Fallback => write!(f, "FALLBACK"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Raw provider details kept for logs and debugging, never shown as the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// The resolver's output. `name` is always displayable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceNameResult {
    pub status: PlaceNameStatus,
    #[serde(rename = "location_name")]
    pub name: String,
    #[serde(default, rename = "debug", skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<Diagnostic>,
}

impl PlaceNameResult {
    pub fn ok(name: impl Into<String>) -> Self {
        Self {
            status: PlaceNameStatus::Ok,
            name: name.into(),
            diagnostic: None,
        }
    }

    pub fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.diagnostic = Some(diagnostic);
        self
    }
}
