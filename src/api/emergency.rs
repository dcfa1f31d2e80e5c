use std::panic::AssertUnwindSafe;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures::FutureExt;
use serde_json::json;

use crate::domain::DataSource;
use crate::infrastructure::AppState;
use crate::utils::geo::{Coordinate, RadiusMeters};

/// Raw query pairs in request order. Parsing happens in the handler so bad
/// or repeated keys never trip the extractor.
type QueryPairs = Vec<(String, String)>;

/// First value given for `key`.
fn first<'a>(params: &'a QueryPairs, key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

#[utoipa::path(
    get,
    path = "/api/emergency/nearby",
    params(
        ("lat" = f64, Query, description = "Latitude in degrees"),
        ("lon" = f64, Query, description = "Longitude in degrees"),
        ("radius" = Option<u32>, Query, description = "Search radius in meters (500-50000, default 25000)")
    ),
    responses(
        (status = 200, description = "Nearby hospitals and emergency services"),
        (status = 400, description = "Invalid coordinates")
    )
)]
pub async fn get_nearby(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
) -> Response {
    let radius = RadiusMeters::from_query(first(&params, "radius"));
    let Some(origin) = Coordinate::parse(first(&params, "lat"), first(&params, "lon")) else {
        return invalid_coordinates();
    };

    let outcome = AssertUnwindSafe(state.resolver.resolve(origin, radius))
        .catch_unwind()
        .await;

    match outcome {
        Ok(Ok(found)) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "hospitals": found.hospitals,
                "emergencyServices": found.emergency_services,
                "radius": found.radius,
                "dataSource": found.data_source,
                "location": found.location,
            })),
        )
            .into_response(),
        Ok(Err(e)) => {
            tracing::error!("Emergency services error: {}", e);
            emergency_fallback(&state, origin, radius)
        }
        Err(_) => {
            tracing::error!("Emergency services resolution panicked");
            emergency_fallback(&state, origin, radius)
        }
    }
}

/// Last-resort answer: still 200, with whatever static numbers cover the point.
fn emergency_fallback(state: &AppState, origin: Coordinate, radius: RadiusMeters) -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "hospitals": [],
            "emergencyServices": state.resolver.emergency_numbers(&origin),
            "radius": radius,
            "dataSource": DataSource::EmergencyFallback,
            "error": "Limited data available",
        })),
    )
        .into_response()
}

#[utoipa::path(
    get,
    path = "/api/emergency/numbers",
    params(
        ("lat" = f64, Query, description = "Latitude in degrees"),
        ("lon" = f64, Query, description = "Longitude in degrees")
    ),
    responses(
        (status = 200, description = "Static emergency numbers for the region"),
        (status = 400, description = "Invalid coordinates")
    )
)]
pub async fn get_numbers(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
) -> Response {
    let Some(origin) = Coordinate::parse(first(&params, "lat"), first(&params, "lon")) else {
        return invalid_coordinates();
    };

    let region = state.resolver.region_for(&origin).map(|r| r.name.clone());
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "region": region,
            "emergencyServices": state.resolver.emergency_numbers(&origin),
        })),
    )
        .into_response()
}

fn invalid_coordinates() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "success": false, "message": "Invalid coordinates" })),
    )
        .into_response()
}
