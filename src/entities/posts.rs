use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    /// Slug derived from the title at creation time.
    #[sea_orm(primary_key, auto_increment = false, column_type = "String(StringLen::N(120))")]
    pub post_id: String,

    #[sea_orm(primary_key, auto_increment = false, column_type = "String(StringLen::N(30))")]
    pub username: String,

    #[sea_orm(column_type = "String(StringLen::N(60))")]
    pub title: String,

    #[sea_orm(column_type = "String(StringLen::N(300))")]
    pub content: String,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::Username",
        to = "super::users::Column::Username",
        on_update = "Restrict",
        on_delete = "Cascade"
    )]
    Owner,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
