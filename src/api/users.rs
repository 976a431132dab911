use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use std::sync::Arc;

use super::AppState;
use crate::controllers::UserQuery;
use crate::controllers::user::RegisterUser;

pub async fn create(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<RegisterUser>>,
) -> impl IntoResponse {
    state.users.create(payload.map(|Json(p)| p)).await
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> impl IntoResponse {
    state.users.get(Some(query)).await
}

pub async fn get_by_username(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> impl IntoResponse {
    state.users.get(Some(UserQuery::by_username(&username))).await
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> impl IntoResponse {
    state.users.remove(Some(query)).await
}
