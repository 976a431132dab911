use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, DbErr, EntityTrait,
};
use serde::{Deserialize, Serialize};

use super::{db_failure, now};
use crate::entities::{follows, users};
use crate::outcome::Outcome;

/// Follow projection joined with both users' display names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowRecord {
    pub sender_username: String,
    pub receiver_username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub is_pending: bool,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver_name: Option<String>,
}

impl FollowRecord {
    fn from_model(
        model: follows::Model,
        sender: Option<users::Model>,
        receiver: Option<users::Model>,
    ) -> Self {
        Self {
            sender_username: model.sender_username,
            receiver_username: model.receiver_username,
            title: model.title,
            is_pending: model.is_pending,
            created_at: model.created_at,
            updated_at: model.updated_at,
            sender_name: sender.map(|u| u.name),
            receiver_name: receiver.map(|u| u.name),
        }
    }
}

pub struct FollowRepository {
    conn: DatabaseConnection,
}

impl FollowRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    async fn find_by_pair(
        &self,
        sender: &str,
        receiver: &str,
    ) -> Result<Option<follows::Model>, DbErr> {
        follows::Entity::find_by_id((sender.to_string(), receiver.to_string()))
            .one(&self.conn)
            .await
    }

    async fn display_names(
        &self,
        sender: &str,
        receiver: &str,
    ) -> Result<(Option<users::Model>, Option<users::Model>), DbErr> {
        let sender = users::Entity::find_by_id(sender.to_string())
            .one(&self.conn)
            .await?;
        let receiver = users::Entity::find_by_id(receiver.to_string())
            .one(&self.conn)
            .await?;
        Ok((sender, receiver))
    }

    pub async fn get(&self, sender: &str, receiver: &str) -> Outcome {
        let found = match self.find_by_pair(sender, receiver).await {
            Ok(found) => found,
            Err(err) => return db_failure("Follow", &err),
        };

        let Some(model) = found else {
            return Outcome::inexistent_entry("Follow");
        };

        let (sender_user, receiver_user) = match self.display_names(sender, receiver).await {
            Ok(pair) => pair,
            Err(err) => return db_failure("Follow", &err),
        };

        match serde_json::to_value(FollowRecord::from_model(model, sender_user, receiver_user)) {
            Ok(data) => Outcome::fetched(data, "Follow was successfully obtained"),
            Err(err) => Outcome::exception(err),
        }
    }

    /// Inserts a new follow request. The uniqueness of the ordered pair is a
    /// store constraint; a race surfaces as DuplicatedEntry.
    pub async fn create(&self, sender: &str, receiver: &str, title: Option<&str>) -> Outcome {
        let timestamp = now();
        let active = follows::ActiveModel {
            sender_username: Set(sender.to_string()),
            receiver_username: Set(receiver.to_string()),
            title: Set(title.map(ToString::to_string)),
            is_pending: Set(false),
            created_at: Set(timestamp.clone()),
            updated_at: Set(timestamp),
        };

        match active.insert(&self.conn).await {
            Ok(model) => match serde_json::to_value(FollowRecord::from_model(model, None, None)) {
                Ok(data) => Outcome::success(data, "Follow was successfully created"),
                Err(err) => Outcome::exception(err),
            },
            Err(err) => db_failure("Follow", &err),
        }
    }

    /// `is_pending` is the only updatable column.
    pub async fn update_pending(&self, sender: &str, receiver: &str, is_pending: bool) -> Outcome {
        let found = match self.find_by_pair(sender, receiver).await {
            Ok(found) => found,
            Err(err) => return db_failure("Follow", &err),
        };

        let Some(model) = found else {
            return Outcome::inexistent_entry("Follow");
        };

        let mut active: follows::ActiveModel = model.into();
        active.is_pending = Set(is_pending);
        active.updated_at = Set(now());

        match active.update(&self.conn).await {
            Ok(model) => match serde_json::to_value(FollowRecord::from_model(model, None, None)) {
                Ok(data) => Outcome::success(data, "Follow was successfully updated"),
                Err(err) => Outcome::exception(err),
            },
            Err(err) => db_failure("Follow", &err),
        }
    }

    pub async fn remove(&self, sender: &str, receiver: &str) -> Outcome {
        match follows::Entity::delete_by_id((sender.to_string(), receiver.to_string()))
            .exec(&self.conn)
            .await
        {
            Ok(res) if res.rows_affected == 0 => Outcome::inexistent_entry("Follow"),
            Ok(_) => Outcome::success(None, "Follow was successfully removed"),
            Err(err) => db_failure("Follow", &err),
        }
    }
}
