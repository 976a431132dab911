//! Validation pipelines over the store.
//!
//! Every controller method is a guarded scope: field checks short-circuit with
//! a business failure, inner fallible work uses `?`, and the outer wrapper
//! converts any propagated fault into an `Exception` outcome so a raw error
//! never crosses the boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::outcome::Outcome;

pub mod follow;
pub mod login;
pub mod post;
pub mod user;

pub use follow::FollowController;
pub use login::LoginController;
pub use post::PostController;
pub use user::UserController;

/// Identifies a user by email and/or username. Email wins when both are set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserQuery {
    pub email: Option<String>,
    pub username: Option<String>,
}

impl UserQuery {
    #[must_use]
    pub fn by_email(email: &str) -> Self {
        Self {
            email: Some(email.to_string()),
            username: None,
        }
    }

    #[must_use]
    pub fn by_username(username: &str) -> Self {
        Self {
            email: None,
            username: Some(username.to_string()),
        }
    }
}

/// The user-resolution capability the other controllers depend on. Injected
/// as a trait object so tests can substitute a fake.
#[async_trait]
pub trait UserLookup: Send + Sync {
    /// Public projection, without the password hash.
    async fn get(&self, query: &UserQuery) -> Outcome;

    /// Projection including the stored hash. Login only.
    async fn get_password(&self, query: &UserQuery) -> Outcome;
}

/// A field counts as supplied only when it is present and non-empty.
pub(crate) fn given(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}
