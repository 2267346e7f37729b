use sea_orm::entity::prelude::*;

/// One issued access code for a cabinet, kept forever as history once
/// used or expired.
///
/// Timestamps are RFC 3339 text, not timestamptz: the row shape
/// (`code .. used_at`) is the stable storage contract, and a corrupt
/// expiry must surface as a redemption outcome rather than a decode error.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tokens")]
pub struct Model {
    /// Insertion-ordered surrogate key; redemption scans rows in this order.
    #[sea_orm(primary_key)]
    pub id: i32,
    pub code: String,
    pub technician_name: String,
    pub site_id: String,
    pub purpose: String,
    pub requester_id: String,
    /// "PENDING" or "USED".
    pub status: String,
    pub issued_at: String,
    pub expires_at: String,
    pub used_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
