use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{db_failure, now};
use crate::entities::{posts, users};
use crate::outcome::Outcome;

/// Post projection joined with the owner's public fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    pub post_id: String,
    pub username: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<PostOwner>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostOwner {
    pub name: String,
    pub last_name: String,
}

impl PostRecord {
    fn from_model(model: posts::Model, owner: Option<users::Model>) -> Self {
        Self {
            post_id: model.post_id,
            username: model.username,
            title: model.title,
            content: model.content,
            created_at: model.created_at,
            updated_at: model.updated_at,
            user: owner.map(|u| PostOwner {
                name: u.name,
                last_name: u.last_name,
            }),
        }
    }
}

pub struct PostRepository {
    conn: DatabaseConnection,
}

impl PostRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Fetches a post by its composite key. A post that exists under a
    /// different owner than the requested one yields WrongInfo, which is
    /// deliberately distinct from "not found".
    pub async fn get(&self, post_id: &str, username: &str) -> Outcome {
        let found = match posts::Entity::find_by_id((post_id.to_string(), username.to_string()))
            .find_also_related(users::Entity)
            .one(&self.conn)
            .await
        {
            Ok(found) => found,
            Err(err) => return db_failure("Post", &err),
        };

        if let Some((post, owner)) = found {
            return match serde_json::to_value(PostRecord::from_model(post, owner)) {
                Ok(data) => Outcome::fetched(data, "Post was successfully obtained"),
                Err(err) => Outcome::exception(err),
            };
        }

        // No row under this owner; check whether the id exists at all.
        match posts::Entity::find()
            .filter(posts::Column::PostId.eq(post_id))
            .count(&self.conn)
            .await
        {
            Ok(0) => Outcome::inexistent_entry("Post"),
            Ok(_) => Outcome::wrong_info("Username"),
            Err(err) => db_failure("Post", &err),
        }
    }

    pub async fn create(&self, post_id: &str, username: &str, title: &str, content: &str) -> Outcome {
        let timestamp = now();
        let active = posts::ActiveModel {
            post_id: Set(post_id.to_string()),
            username: Set(username.to_string()),
            title: Set(title.to_string()),
            content: Set(content.to_string()),
            created_at: Set(timestamp.clone()),
            updated_at: Set(timestamp),
        };

        match active.insert(&self.conn).await {
            Ok(model) => match serde_json::to_value(PostRecord::from_model(model, None)) {
                Ok(data) => Outcome::success(data, "Post was successfully created"),
                Err(err) => Outcome::exception(err),
            },
            Err(err) => db_failure("Post", &err),
        }
    }

    /// Counts posts whose id starts with the given slug, across all owners.
    /// Used to disambiguate derived ids at creation time.
    pub async fn count_ids(&self, prefix: &str) -> Outcome {
        match posts::Entity::find()
            .filter(posts::Column::PostId.starts_with(prefix))
            .count(&self.conn)
            .await
        {
            Ok(count) => Outcome::success(json!(count), "Post ids counted"),
            Err(err) => db_failure("Post", &err),
        }
    }

    /// Content is the only updatable column.
    pub async fn update_content(&self, post_id: &str, username: &str, content: &str) -> Outcome {
        let found = match self.find_by_key(post_id, username).await {
            Ok(found) => found,
            Err(err) => return db_failure("Post", &err),
        };

        let Some(model) = found else {
            return Outcome::inexistent_entry("Post");
        };

        let mut active: posts::ActiveModel = model.into();
        active.content = Set(content.to_string());
        active.updated_at = Set(now());

        match active.update(&self.conn).await {
            Ok(model) => match serde_json::to_value(PostRecord::from_model(model, None)) {
                Ok(data) => Outcome::success(data, "Post was successfully updated"),
                Err(err) => Outcome::exception(err),
            },
            Err(err) => db_failure("Post", &err),
        }
    }

    pub async fn remove(&self, post_id: &str, username: &str) -> Outcome {
        match posts::Entity::delete_by_id((post_id.to_string(), username.to_string()))
            .exec(&self.conn)
            .await
        {
            Ok(res) if res.rows_affected == 0 => Outcome::inexistent_entry("Post"),
            Ok(_) => Outcome::success(None, "Post was successfully removed"),
            Err(err) => db_failure("Post", &err),
        }
    }

    async fn find_by_key(
        &self,
        post_id: &str,
        username: &str,
    ) -> Result<Option<posts::Model>, DbErr> {
        posts::Entity::find_by_id((post_id.to_string(), username.to_string()))
            .one(&self.conn)
            .await
    }
}
