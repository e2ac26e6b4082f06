use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::PassengerRecord;
use crate::services::passenger_rules::{self, MissingField};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/passengers/check", post(check_passenger))
}

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub passenger: PassengerRecord,
    #[serde(default)]
    pub pets_allowed: bool,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub complete: bool,
    pub minor: bool,
    pub missing: Vec<MissingField>,
}

/// POST /api/passengers/check
///
/// The minor flag is re-derived from the submitted age, so a client cannot send
/// an adult age with a stale minor flag.
async fn check_passenger(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CheckRequest>,
) -> Json<CheckResponse> {
    let mut passenger = req.passenger;
    passenger.set_age(passenger.age);

    let missing = passenger_rules::missing_fields(&passenger, &state.pet_policy, req.pets_allowed);
    Json(CheckResponse { complete: missing.is_empty(), minor: passenger.minor, missing })
}
