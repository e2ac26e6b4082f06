use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use super::{to_api_error, ApiResult};
use crate::error::LookupError;
use crate::models::{PassengerRecord, PersonRecord};
use crate::services::passenger_rules;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/dni/{dni}", get(lookup_dni))
}

#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub person: PersonRecord,
    /// Passenger form fields derived from the registry record.
    pub passenger: PassengerRecord,
}

/// GET /api/dni/{dni}
async fn lookup_dni(
    State(state): State<Arc<AppState>>,
    Path(dni): Path<String>,
) -> ApiResult<Json<LookupResponse>> {
    if !state.identity.validate(&dni) {
        return Err(to_api_error(StatusCode::BAD_REQUEST, "DNI debe tener 8 dígitos"));
    }

    let person = state.identity.lookup(&dni).await.map_err(|e| match e {
        LookupError::Invalid(_) => to_api_error(StatusCode::BAD_REQUEST, "DNI debe tener 8 dígitos"),
        LookupError::NotFound => to_api_error(StatusCode::NOT_FOUND, "No se encontraron datos para este DNI"),
        LookupError::Transport(e) => {
            tracing::error!("lookup_dni: registry unreachable: {:?}", e);
            to_api_error(StatusCode::BAD_GATEWAY, "Error al consultar RENIEC")
        }
    })?;

    let today = Utc::now().date_naive();
    let passenger = passenger_rules::derive_from_lookup(&PassengerRecord::default(), &person, today);
    Ok(Json(LookupResponse { person, passenger }))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{call, get};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_lookup_found() {
        let (status, body) = call(get("/api/dni/45678912")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["passenger"]["name"], "Rosa Elena");
        assert_eq!(body["passenger"]["surnames"], "Torres Vega");
        assert_eq!(body["passenger"]["minor"], false);
    }

    #[tokio::test]
    async fn test_lookup_invalid_and_missing() {
        let (status, _) = call(get("/api/dni/1234567")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call(get("/api/dni/11111111")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "No se encontraron datos para este DNI");
    }
}
