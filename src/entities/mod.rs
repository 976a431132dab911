pub mod prelude;

pub mod follows;
pub mod posts;
pub mod users;
