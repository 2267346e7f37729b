use sea_orm::entity::prelude::*;

/// Principal allowed to request access codes (Telegram user id as text).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "whitelist")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub requester_id: String,
    pub name: String,
    pub role: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
