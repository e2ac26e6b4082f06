use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::sync::Arc;

use super::{to_api_error, ApiResult};
use crate::models::{OccupancyTable, Seat, SeatNumber};
use crate::services::seat_map::{SeatMap, MAX_SEATS};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/trips/{id}/seats", get(get_seat_map))
}

#[derive(Debug, Deserialize)]
pub struct SeatMapQuery {
    pub capacity: u32,
    /// Comma-separated seat numbers, e.g. `1,3`.
    pub selected: Option<String>,
}

fn parse_selection(raw: Option<&str>) -> Result<BTreeSet<SeatNumber>, std::num::ParseIntError> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

/// GET /api/trips/{id}/seats
async fn get_seat_map(
    State(state): State<Arc<AppState>>,
    Path(trip_id): Path<i64>,
    Query(params): Query<SeatMapQuery>,
) -> ApiResult<Json<Vec<Seat>>> {
    if !(1..=MAX_SEATS).contains(&params.capacity) {
        return Err(to_api_error(StatusCode::BAD_REQUEST, "capacity must be between 1 and 100"));
    }

    let selection = parse_selection(params.selected.as_deref())
        .map_err(|_| to_api_error(StatusCode::BAD_REQUEST, "selected must be a list of seat numbers"))?;

    let occupied = state.gateway.fetch_occupied_seats(trip_id).await.map_err(|e| {
        tracing::error!("get_seat_map: trip {}: {}", trip_id, e);
        to_api_error(StatusCode::BAD_GATEWAY, "Error obteniendo asientos")
    })?;

    let map = SeatMap::new(params.capacity, OccupancyTable::from_occupied_seats(occupied));
    Ok(Json(map.generate(&selection)))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{call, get};
    use super::*;

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection(Some("1, 3,")).unwrap(), BTreeSet::from([1, 3]));
        assert!(parse_selection(None).unwrap().is_empty());
        assert!(parse_selection(Some("uno")).is_err());
    }

    #[tokio::test]
    async fn test_seat_map_from_backend() {
        let (status, body) = call(get("/api/trips/7/seats?capacity=6&selected=1,3")).await;
        assert_eq!(status, StatusCode::OK);

        let seats = body.as_array().unwrap();
        assert_eq!(seats.len(), 6);
        assert_eq!(seats[0]["status"], "SELECTED");
        assert_eq!(seats[1]["status"], "OCCUPIED");
        assert_eq!(seats[3]["status"], "AVAILABLE");
    }

    #[tokio::test]
    async fn test_seat_map_rejects_capacity_out_of_range() {
        for uri in ["/api/trips/7/seats?capacity=4294967295", "/api/trips/7/seats?capacity=0"] {
            let (status, body) = call(get(uri)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["message"], "capacity must be between 1 and 100");
        }

        let (status, body) = call(get("/api/trips/7/seats?capacity=100")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(MAX_SEATS as usize));
    }

    #[tokio::test]
    async fn test_seat_map_backend_error() {
        let (status, body) = call(get("/api/trips/404/seats?capacity=6")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["message"], "Error obteniendo asientos");
    }
}
