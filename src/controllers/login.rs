use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{UserLookup, UserQuery, given};
use crate::db::UserWithPassword;
use crate::outcome::Outcome;
use crate::security::{self, TokenIssuer};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub struct LoginController {
    users: Arc<dyn UserLookup>,
    tokens: TokenIssuer,
}

impl LoginController {
    #[must_use]
    pub fn new(users: Arc<dyn UserLookup>, tokens: TokenIssuer) -> Self {
        Self { users, tokens }
    }

    pub async fn login(&self, request: Option<LoginPayload>) -> Outcome {
        match self.try_login(request).await {
            Ok(ret) => ret,
            Err(err) => Outcome::exception(err),
        }
    }

    async fn try_login(&self, request: Option<LoginPayload>) -> Result<Outcome> {
        let Some(request) = request else {
            return Ok(Outcome::required_request("Request"));
        };

        let Some(email) = given(request.email.as_ref()) else {
            return Ok(Outcome::required_field("E-mail"));
        };
        let Some(password) = given(request.password.as_ref()) else {
            return Ok(Outcome::required_field("Password"));
        };

        let query = UserQuery::by_email(email);

        let ret_stored = self.users.get_password(&query).await;
        if !ret_stored.is_ok() {
            return Ok(ret_stored);
        }

        let Some(data) = ret_stored.into_data() else {
            return Ok(Outcome::exception("Login lookup returned no data"));
        };
        let stored: UserWithPassword = serde_json::from_value(data)?;

        if !security::verify_password(password, &stored.password).await? {
            return Ok(Outcome::incorrect_password());
        }

        // Public projection for the client; the hash never leaves here.
        let ret_user = self.users.get(&query).await;
        if !ret_user.is_ok() {
            return Ok(ret_user);
        }

        let token = self.tokens.issue(&stored.email)?;

        let data = match ret_user.into_data() {
            Some(Value::Object(mut user)) => {
                user.insert("token".to_string(), json!(token));
                Value::Object(user)
            }
            other => json!({ "user": other, "token": token }),
        };

        Ok(Outcome::success(data, "Login successful."))
    }
}
