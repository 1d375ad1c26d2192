use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::DetailData;
use crate::inbound::http::router::AppState;

/// Target of the link sent after registration.
pub async fn confirm_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<ApiSuccess<DetailData>, ApiError> {
    state
        .user_service
        .confirm_email(&token)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, DetailData::new("User confirmed")))
}
