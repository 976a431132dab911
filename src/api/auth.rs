use axum::{Json, extract::State, response::IntoResponse};
use std::sync::Arc;

use super::AppState;
use crate::controllers::login::LoginPayload;

pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<LoginPayload>>,
) -> impl IntoResponse {
    state.login.login(payload.map(|Json(p)| p)).await
}
