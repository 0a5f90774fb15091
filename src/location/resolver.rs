//! Place-name resolver: provider outcome → one display name.
//!
//! Flow:  outcome dispatch → candidate selection (skip Plus Codes)
//!        → component classification → name synthesis → country strip
//!
//! Pure and total. Every degraded path ends in the coordinate string.

use regex::Regex;
use std::sync::LazyLock;

use super::cleanup::clean_formatted_address;
use super::providers::STATUS_DENIED;
use super::types::{
    AddressComponent, Coordinate, Diagnostic, GeocodeCandidate, PlaceNameResult, PlaceNameStatus,
    ProviderOutcome,
};

static PLUS_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{4,}\+[A-Z0-9]{2,}").unwrap());

const NATURAL_FEATURE_TYPES: &[&str] =
    &["natural_feature", "establishment", "park", "point_of_interest"];
const SUBLOCALITY_TYPES: &[&str] = &["sublocality", "neighborhood"];
const STREET_TYPES: &[&str] = &["street_number", "route"];

/// Coordinate string used by every failure path, e.g. `59.3293°N, 18.0686°E`.
pub fn coordinate_fallback(coord: Coordinate) -> String {
    format!("{:.4}°N, {:.4}°E", coord.lat, coord.lon)
}

/// Resolve a provider outcome into a display name.
pub fn resolve(coord: Coordinate, outcome: &ProviderOutcome) -> PlaceNameResult {
    match outcome {
        ProviderOutcome::Denied { message } => {
            fallback(coord, PlaceNameStatus::Fallback).with_diagnostic(Diagnostic {
                provider_status: Some(STATUS_DENIED.into()),
                message: message.clone(),
            })
        }
        ProviderOutcome::NonOk { status, message } => {
            fallback(coord, PlaceNameStatus::Fallback).with_diagnostic(Diagnostic {
                provider_status: Some(status.clone()),
                message: message.clone(),
            })
        }
        ProviderOutcome::TransportError(_) => fallback(coord, PlaceNameStatus::Error),
        ProviderOutcome::Ok(candidates) => match select_candidate(candidates) {
            Some(candidate) => {
                let name = place_name(candidate);
                if name.trim().is_empty() {
                    fallback(coord, PlaceNameStatus::Fallback)
                } else {
                    PlaceNameResult::ok(name)
                }
            }
            None => fallback(coord, PlaceNameStatus::Fallback),
        },
    }
}

fn fallback(coord: Coordinate, status: PlaceNameStatus) -> PlaceNameResult {
    PlaceNameResult {
        status,
        name: coordinate_fallback(coord),
        diagnostic: None,
    }
}

pub fn is_plus_code(formatted_address: &str) -> bool {
    PLUS_CODE_RE.is_match(formatted_address)
}

/// First candidate, unless it is a Plus Code and a later one is not.
pub fn select_candidate(candidates: &[GeocodeCandidate]) -> Option<&GeocodeCandidate> {
    let first = candidates.first()?;
    if !is_plus_code(&first.formatted_address) {
        return Some(first);
    }
    candidates[1..]
        .iter()
        .find(|c| !is_plus_code(&c.formatted_address))
        .or(Some(first))
}

/// The semantic slots of one candidate, first match wins per slot.
#[derive(Debug, Default, Clone, Copy)]
pub struct Classification<'a> {
    pub natural_feature: Option<&'a AddressComponent>,
    pub locality: Option<&'a AddressComponent>,
    pub sublocality: Option<&'a AddressComponent>,
    pub admin_area: Option<&'a AddressComponent>,
    pub country: Option<&'a AddressComponent>,
    pub is_street_address: bool,
}

impl<'a> Classification<'a> {
    pub fn from_components(components: &'a [AddressComponent]) -> Self {
        Self {
            natural_feature: first_with(components, NATURAL_FEATURE_TYPES),
            locality: first_with(components, &["locality"]),
            sublocality: first_with(components, SUBLOCALITY_TYPES),
            admin_area: first_with(components, &["administrative_area_level_2"]),
            country: first_with(components, &["country"]),
            is_street_address: components.iter().any(|c| c.has_any_type(STREET_TYPES)),
        }
    }
}

fn first_with<'a>(components: &'a [AddressComponent], tags: &[&str]) -> Option<&'a AddressComponent> {
    components.iter().find(|c| c.has_any_type(tags))
}

/// Synthesize the name for a chosen candidate (may be empty).
pub fn place_name(candidate: &GeocodeCandidate) -> String {
    let slots = Classification::from_components(&candidate.components);
    let name = synthesize(&slots, &candidate.formatted_address);
    match slots.country {
        Some(country) => strip_country_suffix(&name, &country.long_name),
        None => name,
    }
}

fn synthesize(slots: &Classification<'_>, formatted_address: &str) -> String {
    match (slots.natural_feature, slots.locality, slots.sublocality) {
        (Some(feature), locality, _) if !slots.is_street_address => match locality {
            Some(loc) if loc.long_name != feature.long_name => {
                format!("{}, {}", feature.long_name, loc.long_name)
            }
            _ => feature.long_name.clone(),
        },
        // Street and house number are dropped.
        (_, Some(loc), _) if slots.is_street_address => loc.long_name.clone(),
        (_, Some(loc), Some(sub)) => format!("{}, {}", sub.long_name, loc.long_name),
        (_, Some(loc), None) => loc.long_name.clone(),
        (_, None, _) => match slots.admin_area {
            Some(area) => area.long_name.clone(),
            None => clean_formatted_address(formatted_address),
        },
    }
}

/// Drop a trailing `, <country>` segment (case-insensitive). A name that is
/// only the country becomes empty.
pub fn strip_country_suffix(name: &str, country: &str) -> String {
    let country = country.trim();
    if country.is_empty() {
        return name.trim().to_string();
    }
    if name.trim().to_lowercase() == country.to_lowercase() {
        return String::new();
    }
    match name.rsplit_once(',') {
        Some((head, tail)) if tail.trim().to_lowercase() == country.to_lowercase() => {
            head.trim().to_string()
        }
        _ => name.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn stockholm() -> Coordinate {
        Coordinate::new(59.3293, 18.0686)
    }

    fn comp(name: &str, types: &[&str]) -> AddressComponent {
        AddressComponent::new(name, types)
    }

    fn ok(candidates: Vec<GeocodeCandidate>) -> ProviderOutcome {
        ProviderOutcome::Ok(candidates)
    }

    fn resolve_one(formatted: &str, components: Vec<AddressComponent>) -> PlaceNameResult {
        resolve(stockholm(), &ok(vec![GeocodeCandidate::new(formatted, components)]))
    }

    #[test]
    fn test_coordinate_fallback_format() {
        assert_eq!(coordinate_fallback(stockholm()), "59.3293°N, 18.0686°E");
        assert_eq!(coordinate_fallback(Coordinate::new(-33.86882, 151.2)), "-33.8688°N, 151.2000°E");
    }

    #[test]
    fn test_denied_is_fallback() {
        let r = resolve(stockholm(), &ProviderOutcome::Denied { message: Some("bad key".into()) });
        assert_eq!(r.status, PlaceNameStatus::Fallback);
        assert_eq!(r.name, "59.3293°N, 18.0686°E");
        let diag = r.diagnostic.unwrap();
        assert_eq!(diag.provider_status.as_deref(), Some("REQUEST_DENIED"));
        assert_eq!(diag.message.as_deref(), Some("bad key"));
    }

    #[test]
    fn test_non_ok_keeps_status_out_of_name() {
        let outcome = ProviderOutcome::NonOk { status: "ZERO_RESULTS".into(), message: None };
        let r = resolve(stockholm(), &outcome);
        assert_eq!(r.status, PlaceNameStatus::Fallback);
        assert_eq!(r.name, "59.3293°N, 18.0686°E");
        assert!(!r.name.contains("ZERO"));
        assert_eq!(r.diagnostic.unwrap().provider_status.as_deref(), Some("ZERO_RESULTS"));
    }

    #[test]
    fn test_empty_candidates_is_fallback() {
        let r = resolve(stockholm(), &ok(vec![]));
        assert_eq!(r.status, PlaceNameStatus::Fallback);
        assert_eq!(r.name, "59.3293°N, 18.0686°E");
    }

    #[test]
    fn test_transport_error_same_text_different_tag() {
        let denied = resolve(stockholm(), &ProviderOutcome::Denied { message: None });
        let broken = resolve(stockholm(), &ProviderOutcome::TransportError("timed out".into()));
        assert_eq!(denied.name, broken.name);
        assert_eq!(broken.status, PlaceNameStatus::Error);
        assert_ne!(denied.status, broken.status);
    }

    #[test]
    fn test_plus_code_skipped() {
        let candidates = vec![
            GeocodeCandidate::new("8FVC9G8M+5V, Sweden", vec![comp("8FVC9G8M+5V", &["plus_code"])]),
            GeocodeCandidate::new(
                "Vänern, Lidköping, Sweden",
                vec![
                    comp("Vänern", &["natural_feature"]),
                    comp("Lidköping", &["locality"]),
                    comp("Sweden", &["country"]),
                ],
            ),
        ];
        let r = resolve(stockholm(), &ok(candidates));
        assert_eq!(r.status, PlaceNameStatus::Ok);
        assert_eq!(r.name, "Vänern, Lidköping");
    }

    #[test]
    fn test_only_plus_codes_keeps_first() {
        let candidates = vec![
            GeocodeCandidate::new("8FVC9G8M+5V", vec![comp("Sverige", &["country"])]),
            GeocodeCandidate::new("8FVC9G8M+6W", vec![]),
        ];
        let chosen = select_candidate(&candidates).unwrap();
        assert_eq!(chosen.formatted_address, "8FVC9G8M+5V");
    }

    #[test]
    fn test_plus_code_pattern() {
        assert!(is_plus_code("8FVC9G8M+5V, Sweden"));
        assert!(is_plus_code("9G8M+5V Lidköping"));
        assert!(!is_plus_code("G8M+5V"));
        assert!(!is_plus_code("Vänern, 8FVC9G8M+5V"));
    }

    #[test]
    fn test_street_address_suppressed() {
        let r = resolve_one(
            "Storgatan 14, 652 24 Karlstad, Sweden",
            vec![
                comp("14", &["street_number"]),
                comp("Storgatan", &["route"]),
                comp("Karlstad", &["locality"]),
            ],
        );
        assert_eq!(r.status, PlaceNameStatus::Ok);
        assert_eq!(r.name, "Karlstad");
    }

    #[test]
    fn test_street_address_beats_point_of_interest() {
        let r = resolve_one(
            "Hamngatan 2, Karlstad",
            vec![
                comp("Hamnen", &["point_of_interest", "establishment"]),
                comp("Hamngatan", &["route"]),
                comp("Karlstad", &["locality"]),
            ],
        );
        assert_eq!(r.name, "Karlstad");
    }

    #[test]
    fn test_locality_without_country_suffix() {
        let r = resolve_one(
            "Mörrum, Sweden",
            vec![comp("Mörrum", &["locality"]), comp("Sweden", &["country"])],
        );
        assert_eq!(r.name, "Mörrum");
    }

    #[test]
    fn test_feature_same_name_as_locality() {
        let r = resolve_one(
            "Siljan",
            vec![comp("Siljan", &["natural_feature"]), comp("Siljan", &["locality"])],
        );
        assert_eq!(r.name, "Siljan");
    }

    #[test]
    fn test_feature_without_locality() {
        let r = resolve_one("Klarälven, Sweden", vec![comp("Klarälven", &["natural_feature"])]);
        assert_eq!(r.name, "Klarälven");
    }

    #[test]
    fn test_sublocality_and_locality() {
        let r = resolve_one(
            "Södermalm, Stockholm, Sweden",
            vec![
                comp("Södermalm", &["sublocality", "political"]),
                comp("Stockholm", &["locality"]),
                comp("Sweden", &["country"]),
            ],
        );
        assert_eq!(r.name, "Södermalm, Stockholm");
    }

    #[test]
    fn test_neighborhood_counts_as_sublocality() {
        let r = resolve_one(
            "",
            vec![comp("Haga", &["neighborhood"]), comp("Göteborg", &["locality"])],
        );
        assert_eq!(r.name, "Haga, Göteborg");
    }

    #[test]
    fn test_admin_area_fallback() {
        let r = resolve_one(
            "Torsby kommun, Sweden",
            vec![
                comp("Torsby kommun", &["administrative_area_level_2"]),
                comp("Värmlands län", &["administrative_area_level_1"]),
                comp("Sweden", &["country"]),
            ],
        );
        assert_eq!(r.name, "Torsby kommun");
    }

    #[test]
    fn test_formatted_address_cleanup_path() {
        let r = resolve_one(
            "Unnamed Road, 686 93 Sunne, Sweden",
            vec![comp("Unnamed Road", &["route_placeholder"]), comp("Sweden", &["country"])],
        );
        assert_eq!(r.status, PlaceNameStatus::Ok);
        assert_eq!(r.name, "Sunne");
    }

    #[test]
    fn test_country_only_name_falls_back() {
        let candidates = vec![
            GeocodeCandidate::new("8FVC9G8M+5V", vec![]),
            GeocodeCandidate::new("Sweden", vec![comp("Sweden", &["country", "political"])]),
        ];
        let r = resolve(Coordinate::new(58.9, 13.5), &ok(candidates));
        assert_eq!(r.status, PlaceNameStatus::Fallback);
        assert_eq!(r.name, "58.9000°N, 13.5000°E");
    }

    #[test]
    fn test_empty_synthesis_falls_back() {
        let r = resolve_one("123 45", vec![]);
        assert_eq!(r.status, PlaceNameStatus::Fallback);
        assert_eq!(r.name, "59.3293°N, 18.0686°E");
    }

    #[test]
    fn test_first_match_wins() {
        let comps = vec![
            comp("Lidköping", &["locality"]),
            comp("Vänern", &["natural_feature"]),
            comp("Otherplace", &["locality"]),
        ];
        let slots = Classification::from_components(&comps);
        assert_eq!(slots.locality.unwrap().long_name, "Lidköping");
        assert_eq!(slots.natural_feature.unwrap().long_name, "Vänern");
        assert!(!slots.is_street_address);
    }

    #[test]
    fn test_strip_country_suffix() {
        assert_eq!(strip_country_suffix("Vänern, Lidköping, Sweden", "Sweden"), "Vänern, Lidköping");
        assert_eq!(strip_country_suffix("Vänern, SWEDEN  ", "Sweden"), "Vänern");
        assert_eq!(strip_country_suffix("New Sweden", "Sweden"), "New Sweden");
        assert_eq!(strip_country_suffix(" sweden ", "Sweden"), "");
        assert_eq!(strip_country_suffix("Lidköping", "Sweden"), "Lidköping");
    }

    #[test]
    fn test_name_never_empty() {
        let outcomes = vec![
            ProviderOutcome::Denied { message: None },
            ProviderOutcome::NonOk { status: "OVER_QUERY_LIMIT".into(), message: None },
            ProviderOutcome::TransportError("reset".into()),
            ok(vec![]),
            ok(vec![GeocodeCandidate::new("", vec![])]),
            ok(vec![GeocodeCandidate::new("  ,  ", vec![comp(" ", &["locality"])])]),
            ok(vec![GeocodeCandidate::new("Sweden", vec![comp("", &["natural_feature"])])]),
        ];
        for outcome in &outcomes {
            let r = resolve(Coordinate::new(0.0, 0.0), outcome);
            assert!(!r.name.trim().is_empty(), "empty name for {outcome:?}");
        }
    }

    const TAGS: &[&str] = &[
        "natural_feature",
        "establishment",
        "park",
        "point_of_interest",
        "locality",
        "sublocality",
        "neighborhood",
        "administrative_area_level_2",
        "country",
        "street_number",
        "route",
        "political",
        "plus_code",
    ];

    fn arb_text() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            Just("Sweden".to_string()),
            Just("SWEDEN ".to_string()),
            Just("8FVC9G8M+5V".to_string()),
            Just("Unnamed Road, 123 45".to_string()),
            "[ ,0-9]{0,8}",
            "[A-Za-zåäö0-9 ,+]{0,24}",
        ]
    }

    fn arb_component() -> impl Strategy<Value = AddressComponent> {
        (arb_text(), prop::sample::subsequence(TAGS, 0..3)).prop_map(|(name, tags)| {
            AddressComponent::new(name, &tags)
        })
    }

    fn arb_candidate() -> impl Strategy<Value = GeocodeCandidate> {
        (arb_text(), prop::collection::vec(arb_component(), 0..6))
            .prop_map(|(formatted, components)| GeocodeCandidate::new(formatted, components))
    }

    fn arb_outcome() -> impl Strategy<Value = ProviderOutcome> {
        prop_oneof![
            Just(ProviderOutcome::Denied { message: None }),
            "[A-Z_]{1,16}".prop_map(|status| ProviderOutcome::NonOk { status, message: None }),
            ".{0,12}".prop_map(ProviderOutcome::TransportError),
            prop::collection::vec(arb_candidate(), 0..4).prop_map(ProviderOutcome::Ok),
        ]
    }

    proptest! {
        #[test]
        fn prop_name_never_empty(
            lat in -90.0f64..=90.0,
            lon in -180.0f64..=180.0,
            outcome in arb_outcome(),
        ) {
            let coord = Coordinate::new(lat, lon);
            let r = resolve(coord, &outcome);
            prop_assert!(!r.name.trim().is_empty(), "empty name for {:?}", outcome);
            if r.status != PlaceNameStatus::Ok {
                prop_assert_eq!(r.name, coordinate_fallback(coord));
            }
        }

        #[test]
        fn prop_denied_and_transport_error_share_text(
            lat in -90.0f64..=90.0,
            lon in -180.0f64..=180.0,
        ) {
            let coord = Coordinate::new(lat, lon);
            let denied = resolve(coord, &ProviderOutcome::Denied { message: None });
            let broken = resolve(coord, &ProviderOutcome::TransportError("reset".into()));
            prop_assert_eq!(denied.name, broken.name);
            prop_assert_eq!(denied.status, PlaceNameStatus::Fallback);
            prop_assert_eq!(broken.status, PlaceNameStatus::Error);
        }
    }
}
