use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{UserLookup, UserQuery, given};
use crate::db::Store;
use crate::outcome::Outcome;

const MAX_CONTENT_CHARS: usize = 300;

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("Invalid regex"))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostPayload {
    pub post_id: Option<String>,
    pub username: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}

pub struct PostController {
    store: Store,
    users: Arc<dyn UserLookup>,
}

impl PostController {
    #[must_use]
    pub fn new(store: Store, users: Arc<dyn UserLookup>) -> Self {
        Self { store, users }
    }

    pub async fn get(&self, post: Option<PostPayload>) -> Outcome {
        let Some(post) = post else {
            return Outcome::required_request("Post");
        };

        let Some(post_id) = given(post.post_id.as_ref()) else {
            return Outcome::required_field("Post ID");
        };
        let Some(username) = given(post.username.as_ref()) else {
            return Outcome::required_field("Username");
        };

        let ret_user = self.users.get(&UserQuery::by_username(username)).await;
        if !ret_user.is_ok() {
            return ret_user.with_message_prefix("Error at getting user from post: ");
        }

        // The store distinguishes "no such post" from "wrong owner".
        self.store.get_post(post_id, username).await
    }

    pub async fn create(&self, post: Option<PostPayload>) -> Outcome {
        let Some(post) = post else {
            return Outcome::required_request("Post");
        };

        let Some(content) = given(post.content.as_ref()) else {
            return Outcome::required_field("Content");
        };
        let Some(title) = given(post.title.as_ref()) else {
            return Outcome::required_field("Title");
        };
        let Some(username) = given(post.username.as_ref()) else {
            return Outcome::required_field("Username");
        };

        let ret_user = self.users.get(&UserQuery::by_username(username)).await;
        if !ret_user.is_ok() {
            return ret_user.with_message_prefix("Error at getting user: ");
        }

        if let Some(invalid) = validate_content(content) {
            return invalid;
        }

        let post_id = match self.derive_post_id(title).await {
            Ok(post_id) => post_id,
            Err(failure) => return failure,
        };

        self.store
            .create_post(&post_id, username, title, content)
            .await
    }

    pub async fn update(&self, post: Option<PostPayload>) -> Outcome {
        let Some(post) = post else {
            return Outcome::required_request("Post");
        };

        let Some(post_id) = given(post.post_id.as_ref()) else {
            return Outcome::required_field("Post ID");
        };
        let Some(username) = given(post.username.as_ref()) else {
            return Outcome::required_field("Username");
        };
        let Some(content) = given(post.content.as_ref()) else {
            return Outcome::required_field("Post content");
        };

        let existing = self
            .get(Some(PostPayload {
                post_id: Some(post_id.to_string()),
                username: Some(username.to_string()),
                ..PostPayload::default()
            }))
            .await;
        if !existing.is_ok() {
            return existing;
        }

        if let Some(invalid) = validate_content(content) {
            return invalid;
        }

        self.store
            .update_post_content(post_id, username, content)
            .await
    }

    pub async fn delete(&self, post: Option<PostPayload>) -> Outcome {
        let Some(post) = post else {
            return Outcome::required_request("Post");
        };

        let Some(post_id) = given(post.post_id.as_ref()) else {
            return Outcome::required_field("Post ID");
        };
        let Some(username) = given(post.username.as_ref()) else {
            return Outcome::required_field("Username");
        };

        let existing = self
            .get(Some(PostPayload {
                post_id: Some(post_id.to_string()),
                username: Some(username.to_string()),
                ..PostPayload::default()
            }))
            .await;
        if !existing.is_ok() {
            return existing;
        }

        self.store.remove_post(post_id, username).await
    }

    /// Slugs the title and appends the count of ids already sharing the slug
    /// prefix, so "Hello World" posted twice yields "hello-world" then
    /// "hello-world-1".
    async fn derive_post_id(&self, title: &str) -> Result<String, Outcome> {
        let mut post_id = slugify(title);

        let counted = self.store.count_post_ids(&post_id).await;
        if !counted.is_ok() {
            return Err(counted);
        }

        let count = counted
            .data()
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(0);
        if count > 0 {
            post_id.push_str(&format!("-{count}"));
        }

        Ok(post_id)
    }
}

fn slugify(title: &str) -> String {
    whitespace_re().replace_all(title, "-").to_lowercase()
}

fn validate_content(content: &str) -> Option<Outcome> {
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Some(Outcome::invalid_field(
            "Post content",
            Some("must have less than 300 characters"),
        ));
    }

    None
}
