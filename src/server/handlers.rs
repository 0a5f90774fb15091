use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::location::{log_result, resolve, Coordinate, PlaceNameResult, ProviderOutcome};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

// ─── GET /api/geocode ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct GeocodeQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

fn parse_coordinate(params: &GeocodeQuery) -> Result<Coordinate, ApiError> {
    let parse = |v: &Option<String>| v.as_deref().and_then(|s| s.trim().parse::<f64>().ok());

    let (Some(lat), Some(lon)) = (parse(&params.lat), parse(&params.lon)) else {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing lat or lon parameter"));
    };

    let coord = Coordinate::new(lat, lon);
    if !coord.is_valid() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Invalid coordinates. Lat: -90..90, Lon: -180..180",
        ));
    }
    Ok(coord)
}

pub(super) async fn geocode(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GeocodeQuery>,
) -> Result<Json<PlaceNameResult>, ApiError> {
    let start = Instant::now();
    let coord = parse_coordinate(&params)?;

    let provider = Arc::clone(&state.provider);
    let outcome = tokio::task::spawn_blocking(move || provider.reverse_geocode(coord))
        .await
        .unwrap_or_else(|e| ProviderOutcome::TransportError(format!("geocoding task failed: {}", e)));

    let result = resolve(coord, &outcome);
    log_result(coord, &result);
    tracing::debug!(
        lat = coord.lat,
        lon = coord.lon,
        status = %result.status,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "GET /api/geocode"
    );

    Ok(Json(result))
}

// ─── GET /health ─────────────────────────────────────────────────

pub(super) async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
