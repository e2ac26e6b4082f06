pub mod quote;
pub mod passengers;
pub mod seats;
pub mod identity;

use axum::{http::StatusCode, Json, Router};
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(quote::routes())
        .merge(passengers::routes())
        .merge(seats::routes())
        .merge(identity::routes())
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    success: bool,
    message: String,
}

pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

pub fn to_api_error(status: StatusCode, message: &str) -> (StatusCode, Json<ApiError>) {
    (status, Json(ApiError { success: false, message: message.to_string() }))
}
