use axum::{
    Json, Router,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::controllers::{
    FollowController, LoginController, PostController, UserController, UserLookup,
};
use crate::db::Store;
use crate::outcome::Outcome;
use crate::security::TokenIssuer;

pub mod auth;
pub mod follows;
pub mod health;
pub mod posts;
pub mod users;

pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub users: Arc<UserController>,
    pub posts: PostController,
    pub follows: FollowController,
    pub login: LoginController,
}

pub async fn create_app_state(config: Config) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    Ok(build_app_state(config, store))
}

/// Wires the controllers over an already-connected store. Tests use this with
/// an in-memory database.
#[must_use]
pub fn build_app_state(config: Config, store: Store) -> Arc<AppState> {
    let users = Arc::new(
        UserController::new(store.clone()).with_security(config.security.clone()),
    );
    let lookup: Arc<dyn UserLookup> = users.clone();

    let tokens = TokenIssuer::new(
        config.auth.token_secret.clone(),
        config.auth.token_ttl_seconds,
    );

    Arc::new(AppState {
        posts: PostController::new(store.clone(), lookup.clone()),
        follows: FollowController::new(store.clone(), lookup.clone()),
        login: LoginController::new(lookup, tokens),
        config,
        store,
        users,
    })
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config.server.cors_allowed_origins.clone();

    let api_router = Router::new()
        .route("/users", post(users::create))
        .route("/users", get(users::get))
        .route("/users", delete(users::remove))
        .route("/users/{username}", get(users::get_by_username))
        .route("/posts", post(posts::create))
        .route("/posts", get(posts::get))
        .route("/posts", put(posts::update))
        .route("/posts", delete(posts::remove))
        .route("/follows", post(follows::follow))
        .route("/follows", get(follows::get))
        .route("/follows", put(follows::set_pending))
        .route("/follows", delete(follows::unfollow))
        .route("/auth/login", post(auth::login))
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

/// Outcome codes are HTTP statuses already; anything out of range degrades
/// to 500. The envelope is the same for every endpoint.
impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.envelope())).into_response()
    }
}
