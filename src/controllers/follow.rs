use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{UserLookup, UserQuery, given};
use crate::db::Store;
use crate::outcome::Outcome;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FollowPayload {
    pub sender_username: Option<String>,
    pub receiver_username: Option<String>,
    pub title: Option<String>,
    pub is_pending: Option<bool>,
}

pub struct FollowController {
    store: Store,
    users: Arc<dyn UserLookup>,
}

impl FollowController {
    #[must_use]
    pub fn new(store: Store, users: Arc<dyn UserLookup>) -> Self {
        Self { store, users }
    }

    pub async fn get(&self, follow: Option<FollowPayload>) -> Outcome {
        let Some(follow) = follow else {
            return Outcome::required_request("Follow");
        };

        let Some(sender) = given(follow.sender_username.as_ref()) else {
            return Outcome::required_field("Sender username");
        };
        let Some(receiver) = given(follow.receiver_username.as_ref()) else {
            return Outcome::required_field("Receiver username");
        };

        self.store.get_follow(sender, receiver).await
    }

    /// Creates the follow request. Re-following an existing pair is not an
    /// error; the existing row comes back unchanged.
    pub async fn follow(&self, follow: Option<FollowPayload>) -> Outcome {
        let Some(follow) = follow else {
            return Outcome::required_request("Follow");
        };

        let Some(sender) = given(follow.sender_username.as_ref()) else {
            return Outcome::required_field("Sender username");
        };
        let Some(receiver) = given(follow.receiver_username.as_ref()) else {
            return Outcome::required_field("Receiver username");
        };

        let existing = self.store.get_follow(sender, receiver).await;
        if existing.is_ok() {
            return existing;
        }

        let ret_sender = self.users.get(&UserQuery::by_username(sender)).await;
        if !ret_sender.is_ok() {
            if ret_sender.code() == 404 {
                return Outcome::inexistent_entry("User");
            }
            return ret_sender;
        }

        let ret_receiver = self.users.get(&UserQuery::by_username(receiver)).await;
        if !ret_receiver.is_ok() {
            if ret_receiver.code() == 404 {
                return Outcome::inexistent_entry("Receiver User");
            }
            return ret_receiver;
        }

        self.store
            .create_follow(sender, receiver, follow.title.as_deref())
            .await
    }

    pub async fn unfollow(&self, follow: Option<FollowPayload>) -> Outcome {
        let Some(follow) = follow else {
            return Outcome::required_request("Follow");
        };

        let Some(sender) = given(follow.sender_username.as_ref()) else {
            return Outcome::required_field("Sender username");
        };
        let Some(receiver) = given(follow.receiver_username.as_ref()) else {
            return Outcome::required_field("Receiver username");
        };

        let existing = self.store.get_follow(sender, receiver).await;
        if !existing.is_ok() {
            return existing;
        }

        self.store.remove_follow(sender, receiver).await
    }

    /// `is_pending` is the only mutable column on a follow.
    pub async fn set_pending(&self, follow: Option<FollowPayload>) -> Outcome {
        let Some(follow) = follow else {
            return Outcome::required_request("Follow");
        };

        let Some(sender) = given(follow.sender_username.as_ref()) else {
            return Outcome::required_field("Sender username");
        };
        let Some(receiver) = given(follow.receiver_username.as_ref()) else {
            return Outcome::required_field("Receiver username");
        };
        let Some(is_pending) = follow.is_pending else {
            return Outcome::required_field("Is pending");
        };

        let existing = self.store.get_follow(sender, receiver).await;
        if !existing.is_ok() {
            return existing;
        }

        self.store
            .update_follow_pending(sender, receiver, is_pending)
            .await
    }
}
