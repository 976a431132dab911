pub use super::follows::Entity as Follows;
pub use super::posts::Entity as Posts;
pub use super::users::Entity as Users;
