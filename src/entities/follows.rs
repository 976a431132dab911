use sea_orm::entity::prelude::*;

/// A follow request between two users. Both usernames must reference existing
/// users; rows disappear with either side (cascade).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "follows")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "String(StringLen::N(30))")]
    pub sender_username: String,

    #[sea_orm(primary_key, auto_increment = false, column_type = "String(StringLen::N(30))")]
    pub receiver_username: String,

    /// Optional message attached to the request.
    #[sea_orm(nullable, column_type = "String(StringLen::N(60))")]
    pub title: Option<String>,

    pub is_pending: bool,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::SenderUsername",
        to = "super::users::Column::Username",
        on_update = "Restrict",
        on_delete = "Cascade"
    )]
    Sender,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ReceiverUsername",
        to = "super::users::Column::Username",
        on_update = "Restrict",
        on_delete = "Cascade"
    )]
    Receiver,
}

impl ActiveModelBehavior for ActiveModel {}
