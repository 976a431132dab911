use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use std::sync::Arc;

use super::AppState;
use crate::controllers::post::PostPayload;

pub async fn create(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<PostPayload>>,
) -> impl IntoResponse {
    state.posts.create(payload.map(|Json(p)| p)).await
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PostPayload>,
) -> impl IntoResponse {
    state.posts.get(Some(query)).await
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<PostPayload>>,
) -> impl IntoResponse {
    state.posts.update(payload.map(|Json(p)| p)).await
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<PostPayload>>,
) -> impl IntoResponse {
    state.posts.delete(payload.map(|Json(p)| p)).await
}
