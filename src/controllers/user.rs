use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{UserLookup, UserQuery, given};
use crate::config::SecurityConfig;
use crate::db::{NewUser, Store};
use crate::outcome::Outcome;
use crate::security;

/// Registration payload. Every field is optional at the edge; the pipeline
/// decides which absences are errors and in what order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterUser {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub repeat_password: Option<String>,
    pub name: Option<String>,
    pub last_name: Option<String>,
}

pub struct UserController {
    store: Store,
    security: Option<SecurityConfig>,
}

impl UserController {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self {
            store,
            security: None,
        }
    }

    /// Overrides the argon2 cost parameters. Defaults apply otherwise.
    #[must_use]
    pub fn with_security(mut self, config: SecurityConfig) -> Self {
        self.security = Some(config);
        self
    }

    pub async fn create(&self, request: Option<RegisterUser>) -> Outcome {
        match self.try_create(request).await {
            Ok(ret) => ret,
            Err(err) => Outcome::exception(err),
        }
    }

    async fn try_create(&self, request: Option<RegisterUser>) -> Result<Outcome> {
        let Some(request) = request else {
            return Ok(Outcome::required_request("Request"));
        };

        let Some(email) = given(request.email.as_ref()) else {
            return Ok(Outcome::required_field("E-mail"));
        };
        let Some(username) = given(request.username.as_ref()) else {
            return Ok(Outcome::required_field("Username"));
        };
        let Some(password) = given(request.password.as_ref()) else {
            return Ok(Outcome::required_field("Password"));
        };
        let Some(repeat_password) = given(request.repeat_password.as_ref()) else {
            return Ok(Outcome::required_field("Repeat Password"));
        };
        let Some(name) = given(request.name.as_ref()) else {
            return Ok(Outcome::required_field("Name"));
        };
        let Some(last_name) = given(request.last_name.as_ref()) else {
            return Ok(Outcome::required_field("Last Name"));
        };

        let password_len = password.chars().count();
        if !(5..=50).contains(&password_len) {
            return Ok(Outcome::invalid_field(
                "Password",
                Some("must have more than 5 characters and less than 50"),
            ));
        }

        let email_len = email.chars().count();
        if !(5..=77).contains(&email_len) {
            return Ok(Outcome::invalid_field(
                "E-mail",
                Some("must have more than 5 characters and less than 77"),
            ));
        }

        if password != repeat_password {
            return Ok(Outcome::invalid_field(
                "Repeat Password",
                Some("must be equal to the Password."),
            ));
        }

        // Registration is keyed on email; a successful lookup means taken.
        let existing = self.store.get_user(Some(email), None).await;
        if existing.is_ok() {
            return Ok(Outcome::duplicated_entry("User"));
        }

        let hashed = security::hash_password(password, self.security.as_ref()).await?;

        let created = self
            .store
            .create_user(&NewUser {
                email: email.to_string(),
                username: username.to_string(),
                password: hashed,
                name: name.to_string(),
                last_name: last_name.to_string(),
            })
            .await;
        if !created.is_ok() {
            return Ok(created);
        }

        Ok(Outcome::success(
            created.into_data(),
            "User created successfully.",
        ))
    }

    pub async fn get(&self, request: Option<UserQuery>) -> Outcome {
        let Some(request) = request else {
            return Outcome::required_request("Request");
        };

        let email = given(request.email.as_ref());
        let username = given(request.username.as_ref());
        if email.is_none() && username.is_none() {
            return Outcome::required_field("E-mail/username");
        }

        self.store.get_user(email, username).await
    }

    pub async fn get_password(&self, request: Option<UserQuery>) -> Outcome {
        let Some(request) = request else {
            return Outcome::required_request("Request");
        };

        let Some(email) = given(request.email.as_ref()) else {
            return Outcome::required_field("E-mail");
        };

        self.store.get_user_with_password(email).await
    }

    pub async fn remove(&self, request: Option<UserQuery>) -> Outcome {
        let Some(request) = request else {
            return Outcome::required_request("Request");
        };

        let Some(email) = given(request.email.as_ref()) else {
            return Outcome::required_field("E-mail");
        };

        let existing = self.store.get_user(Some(email), None).await;
        if !existing.is_ok() {
            return existing;
        }

        self.store.remove_user(email).await
    }
}

#[async_trait]
impl UserLookup for UserController {
    async fn get(&self, query: &UserQuery) -> Outcome {
        Self::get(self, Some(query.clone())).await
    }

    async fn get_password(&self, query: &UserQuery) -> Outcome {
        Self::get_password(self, Some(query.clone())).await
    }
}
