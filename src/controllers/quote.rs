use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{to_api_error, ApiResult};
use crate::models::{PassengerRecord, SeatNumber};
use crate::services::pricing::{self, LineItem};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/quote", post(create_quote))
}

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub seats: Vec<SeatNumber>,
    pub fare: Decimal,
    #[serde(default)]
    pub passengers: Vec<PassengerRecord>,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub lines: Vec<LineItem>,
    pub total: Decimal,
    pub display_total: String,
}

/// POST /api/quote
async fn create_quote(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QuoteRequest>,
) -> ApiResult<Json<QuoteResponse>> {
    if req.fare.is_sign_negative() {
        return Err(to_api_error(StatusCode::BAD_REQUEST, "fare must not be negative"));
    }
    if req.passengers.len() > req.seats.len() {
        return Err(to_api_error(StatusCode::BAD_REQUEST, "more passengers than seats"));
    }

    let pets = pricing::count_with_pet(&req.passengers);
    let quote = pricing::quote(req.seats.len() as u32, req.fare, pets, state.pet_policy.surcharge)
        .map_err(|e| to_api_error(StatusCode::BAD_REQUEST, &e.to_string()))?;

    Ok(Json(QuoteResponse {
        display_total: quote.display_total(),
        lines: quote.lines,
        total: quote.total,
    }))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{call, post_json};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_quote_with_pet() {
        let (status, body) = call(post_json(
            "/api/quote",
            json!({
                "seats": [1, 3],
                "fare": 25,
                "passengers": [{"travels_with_pet": true}, {}]
            }),
        ))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["display_total"], "S/ 65.00");
        assert_eq!(body["lines"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_quote_rejects_extra_passengers() {
        let (status, body) = call(post_json(
            "/api/quote",
            json!({"seats": [1], "fare": 25, "passengers": [{}, {}]}),
        ))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_quote_rejects_fare_out_of_range() {
        let (status, body) = call(post_json(
            "/api/quote",
            json!({"seats": [1, 3], "fare": "70000000000000000000000000000"}),
        ))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "amount out of range");
    }
}
