use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use std::sync::Arc;

use super::AppState;
use crate::controllers::follow::FollowPayload;

pub async fn follow(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<FollowPayload>>,
) -> impl IntoResponse {
    state.follows.follow(payload.map(|Json(p)| p)).await
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FollowPayload>,
) -> impl IntoResponse {
    state.follows.get(Some(query)).await
}

pub async fn set_pending(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<FollowPayload>>,
) -> impl IntoResponse {
    state.follows.set_pending(payload.map(|Json(p)| p)).await
}

pub async fn unfollow(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<FollowPayload>>,
) -> impl IntoResponse {
    state.follows.unfollow(payload.map(|Json(p)| p)).await
}
