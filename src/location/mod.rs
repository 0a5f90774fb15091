//! Place-name resolution for logged catches.
//!
//! Turns one reverse-geocoding outcome into a short display name, preferring
//! lakes, rivers and parks over street addresses and degrading to a
//! coordinate string whenever the provider has nothing usable.

pub mod cleanup;
pub mod providers;
pub mod resolver;
pub mod types;

pub use cleanup::clean_formatted_address;
pub use providers::{outcome_from_json, GeocodeProvider, GoogleGeocoder, StaticProvider};
pub use resolver::{coordinate_fallback, resolve};
pub use types::{
    AddressComponent, Coordinate, Diagnostic, GeocodeCandidate, GeocodeError, PlaceNameResult,
    PlaceNameStatus, ProviderOutcome,
};

/// Log a resolved name at a level matching its status.
pub fn log_result(coord: Coordinate, result: &PlaceNameResult) {
    let provider_status = result
        .diagnostic
        .as_ref()
        .and_then(|d| d.provider_status.as_deref())
        .unwrap_or("-");
    match result.status {
        PlaceNameStatus::Ok => {
            tracing::info!(lat = coord.lat, lon = coord.lon, name = %result.name, "resolved place name")
        }
        PlaceNameStatus::Fallback => tracing::warn!(
            lat = coord.lat,
            lon = coord.lon,
            provider_status,
            "no usable geocoding result, using coordinates"
        ),
        PlaceNameStatus::Error => tracing::error!(
            lat = coord.lat,
            lon = coord.lon,
            "geocoding failed, using coordinates"
        ),
    }
}
