use sea_orm_migration::prelude::*;

mod m20201021_create_users;
mod m20201218_create_posts_follows;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20201021_create_users::Migration),
            Box::new(m20201218_create_posts_follows::Migration),
        ]
    }
}
