use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::outcome::Outcome;

pub mod migrator;
pub mod repositories;

pub use repositories::follow::FollowRecord;
pub use repositories::post::{PostOwner, PostRecord};
pub use repositories::user::{NewUser, UserRecord, UserWithPassword};

/// Thin facade over the database connection. Controllers talk to the store,
/// the store delegates to per-entity repositories.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn post_repo(&self) -> repositories::post::PostRepository {
        repositories::post::PostRepository::new(self.conn.clone())
    }

    fn follow_repo(&self) -> repositories::follow::FollowRepository {
        repositories::follow::FollowRepository::new(self.conn.clone())
    }

    pub async fn get_user(&self, email: Option<&str>, username: Option<&str>) -> Outcome {
        self.user_repo().get(email, username).await
    }

    pub async fn get_user_with_password(&self, email: &str) -> Outcome {
        self.user_repo().get_with_password(email).await
    }

    pub async fn create_user(&self, user: &NewUser) -> Outcome {
        self.user_repo().create(user).await
    }

    pub async fn remove_user(&self, email: &str) -> Outcome {
        self.user_repo().remove(email).await
    }

    pub async fn get_post(&self, post_id: &str, username: &str) -> Outcome {
        self.post_repo().get(post_id, username).await
    }

    pub async fn create_post(
        &self,
        post_id: &str,
        username: &str,
        title: &str,
        content: &str,
    ) -> Outcome {
        self.post_repo().create(post_id, username, title, content).await
    }

    pub async fn count_post_ids(&self, prefix: &str) -> Outcome {
        self.post_repo().count_ids(prefix).await
    }

    pub async fn update_post_content(
        &self,
        post_id: &str,
        username: &str,
        content: &str,
    ) -> Outcome {
        self.post_repo().update_content(post_id, username, content).await
    }

    pub async fn remove_post(&self, post_id: &str, username: &str) -> Outcome {
        self.post_repo().remove(post_id, username).await
    }

    pub async fn get_follow(&self, sender: &str, receiver: &str) -> Outcome {
        self.follow_repo().get(sender, receiver).await
    }

    pub async fn create_follow(
        &self,
        sender: &str,
        receiver: &str,
        title: Option<&str>,
    ) -> Outcome {
        self.follow_repo().create(sender, receiver, title).await
    }

    pub async fn update_follow_pending(
        &self,
        sender: &str,
        receiver: &str,
        is_pending: bool,
    ) -> Outcome {
        self.follow_repo().update_pending(sender, receiver, is_pending).await
    }

    pub async fn remove_follow(&self, sender: &str, receiver: &str) -> Outcome {
        self.follow_repo().remove(sender, receiver).await
    }
}
