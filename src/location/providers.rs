//! Geocoding providers: Google reverse geocoding and a fixed-outcome stub.
//!
//! Providers own all network I/O and hand the resolver a `ProviderOutcome`.

use super::types::{Coordinate, GeocodeCandidate, GeocodeError, ProviderOutcome};
use crate::config::Settings;
use serde::Deserialize;
use std::time::Duration;

const USER_AGENT: &str = concat!("CatchLocator/", env!("CARGO_PKG_VERSION"));

/// Provider "success" sentinel.
pub const STATUS_OK: &str = "OK";
/// Provider quota / key rejection status.
pub const STATUS_DENIED: &str = "REQUEST_DENIED";

/// Anything that can turn a coordinate into a provider outcome.
pub trait GeocodeProvider: Send + Sync {
    fn reverse_geocode(&self, coord: Coordinate) -> ProviderOutcome;
}

// ─── Response mapping ───────────────────────────────────────────

/// Raw provider response body.
#[derive(Deserialize, Debug, Clone)]
pub struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<GeocodeCandidate>,
}

/// Map a decoded response onto the outcome union.
pub fn outcome_from_response(response: GeocodeResponse) -> ProviderOutcome {
    match response.status.as_str() {
        STATUS_OK => ProviderOutcome::Ok(response.results),
        STATUS_DENIED => ProviderOutcome::Denied {
            message: response.error_message,
        },
        _ => ProviderOutcome::NonOk {
            status: response.status,
            message: response.error_message,
        },
    }
}

/// Decode a raw response body. Malformed JSON is a transport error.
pub fn outcome_from_json(body: &str) -> ProviderOutcome {
    match serde_json::from_str::<GeocodeResponse>(body) {
        Ok(response) => outcome_from_response(response),
        Err(e) => GeocodeError::InvalidResponse(e.to_string()).into(),
    }
}

// ─── Google Geocoding ───────────────────────────────────────────

pub struct GoogleGeocoder {
    endpoint: String,
    api_key: Option<String>,
    language: String,
    timeout: Duration,
}

impl GoogleGeocoder {
    pub fn new(settings: &Settings) -> Self {
        if settings.api_key.is_none() {
            tracing::warn!("no geocoding API key configured; lookups will fall back to coordinates");
        }
        Self {
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone(),
            language: settings.language.clone(),
            timeout: settings.timeout(),
        }
    }

    /// Query parameters for one reverse lookup.
    fn query_params(&self, coord: Coordinate) -> Vec<(&'static str, String)> {
        let mut params = vec![("latlng", format!("{},{}", coord.lat, coord.lon))];
        if let Some(ref key) = self.api_key {
            params.push(("key", key.clone()));
        }
        params.push(("language", self.language.clone()));
        params
    }

    fn fetch(&self, coord: Coordinate) -> Result<GeocodeResponse, GeocodeError> {
        let mut request = ureq::get(&self.endpoint)
            .set("User-Agent", USER_AGENT)
            .timeout(self.timeout);
        for (name, value) in self.query_params(coord) {
            request = request.query(name, &value);
        }

        let response = request.call().map_err(|e| match e {
            ureq::Error::Status(code, _) => GeocodeError::HttpStatus(code),
            other => GeocodeError::Network(other.to_string()),
        })?;

        response
            .into_json()
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))
    }
}

impl GeocodeProvider for GoogleGeocoder {
    fn reverse_geocode(&self, coord: Coordinate) -> ProviderOutcome {
        tracing::debug!(lat = coord.lat, lon = coord.lon, "fetching reverse geocode");

        match self.fetch(coord) {
            Ok(response) => {
                tracing::debug!(
                    status = %response.status,
                    results = response.results.len(),
                    "geocoding response"
                );
                if let Some(ref msg) = response.error_message {
                    tracing::warn!(status = %response.status, "geocoding provider message: {}", msg);
                }
                outcome_from_response(response)
            }
            Err(e) => {
                tracing::error!(lat = coord.lat, lon = coord.lon, "geocoding request failed: {}", e);
                e.into()
            }
        }
    }
}

// ─── Fixed outcome ──────────────────────────────────────────────

/// Returns the same outcome for every coordinate. Used offline and in tests.
#[derive(Debug, Clone)]
pub struct StaticProvider {
    outcome: ProviderOutcome,
}

impl StaticProvider {
    pub fn new(outcome: ProviderOutcome) -> Self {
        Self { outcome }
    }
}

impl GeocodeProvider for StaticProvider {
    fn reverse_geocode(&self, _coord: Coordinate) -> ProviderOutcome {
        self.outcome.clone()
    }
}
