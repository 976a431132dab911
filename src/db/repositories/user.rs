use sea_orm::{
    ActiveEnum, ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr,
    EntityTrait, ModelTrait, QueryFilter,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{db_failure, now};
use crate::entities::users::{self, Role};
use crate::outcome::Outcome;

/// Public user projection. The password hash is deliberately absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: String,
    pub username: String,
    pub name: String,
    pub last_name: String,
    pub role: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Internal projection used only by the login pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserWithPassword {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Input for a registration insert. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password: String,
    pub name: String,
    pub last_name: String,
}

impl From<users::Model> for UserRecord {
    fn from(model: users::Model) -> Self {
        Self {
            email: model.email,
            username: model.username,
            name: model.name,
            last_name: model.last_name,
            role: model.role.to_value(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    async fn find(
        &self,
        email: Option<&str>,
        username: Option<&str>,
    ) -> Result<Option<users::Model>, DbErr> {
        // Email is the preferred identifier when both are supplied.
        let query = if let Some(email) = email {
            users::Entity::find().filter(users::Column::Email.eq(email))
        } else {
            users::Entity::find().filter(users::Column::Username.eq(username.unwrap_or_default()))
        };

        query.one(&self.conn).await
    }

    /// Looks a user up by email (preferred) or username.
    pub async fn get(&self, email: Option<&str>, username: Option<&str>) -> Outcome {
        match self.find(email, username).await {
            Ok(Some(model)) => match serde_json::to_value(UserRecord::from(model)) {
                Ok(data) => Outcome::fetched(data, "User was successfully obtained"),
                Err(err) => Outcome::exception(err),
            },
            Ok(None) => Outcome::inexistent_entry("User"),
            Err(err) => db_failure("User", &err),
        }
    }

    /// Like [`get`](Self::get) but the projection keeps the stored hash.
    /// Only the login pipeline reads this.
    pub async fn get_with_password(&self, email: &str) -> Outcome {
        match self.find(Some(email), None).await {
            Ok(Some(model)) => {
                let data = json!(UserWithPassword {
                    email: model.email,
                    username: model.username,
                    password: model.password,
                });
                Outcome::fetched(data, "User was successfully obtained")
            }
            Ok(None) => Outcome::inexistent_entry("User"),
            Err(err) => db_failure("User", &err),
        }
    }

    pub async fn create(&self, user: &NewUser) -> Outcome {
        let timestamp = now();
        let active = users::ActiveModel {
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            password: Set(user.password.clone()),
            name: Set(user.name.clone()),
            last_name: Set(user.last_name.clone()),
            role: Set(Role::User),
            created_at: Set(timestamp.clone()),
            updated_at: Set(timestamp),
        };

        match active.insert(&self.conn).await {
            Ok(model) => match serde_json::to_value(UserRecord::from(model)) {
                Ok(data) => Outcome::success(data, "User was successfully created"),
                Err(err) => Outcome::exception(err),
            },
            Err(err) => db_failure("User", &err),
        }
    }

    /// Deletes a user by email. Posts and follows cascade at the store level.
    pub async fn remove(&self, email: &str) -> Outcome {
        let found = match self.find(Some(email), None).await {
            Ok(found) => found,
            Err(err) => return db_failure("User", &err),
        };

        let Some(model) = found else {
            return Outcome::inexistent_entry("User");
        };

        match model.delete(&self.conn).await {
            Ok(_) => Outcome::success(None, "User was successfully removed"),
            Err(err) => db_failure("User", &err),
        }
    }
}
