use anyhow::Context as _;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};

use odckey_access_schema::{audit_log, tokens, whitelist};

use crate::domain::repository::{TokenStore, WhitelistGate};
use crate::domain::types::{AuditEntry, TokenRecord, TokenStatus};
use crate::error::AccessServiceError;

// ── Token store ───────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTokenStore {
    pub db: DatabaseConnection,
}

impl TokenStore for DbTokenStore {
    async fn list_tokens(&self) -> Result<Vec<TokenRecord>, AccessServiceError> {
        let models = tokens::Entity::find()
            .order_by_asc(tokens::Column::Id)
            .all(&self.db)
            .await
            .context("list tokens")?;
        Ok(models.into_iter().map(token_from_model).collect())
    }

    async fn append_token(&self, record: &TokenRecord) -> Result<(), AccessServiceError> {
        tokens::ActiveModel {
            code: Set(record.code.clone()),
            technician_name: Set(record.technician_name.clone()),
            site_id: Set(record.site_id.clone()),
            purpose: Set(record.purpose.clone()),
            requester_id: Set(record.requester_id.clone()),
            status: Set(record.status.as_str().to_owned()),
            issued_at: Set(record.issued_at.clone()),
            expires_at: Set(record.expires_at.clone()),
            used_at: Set(record.used_at.clone()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("append token")?;
        Ok(())
    }

    async fn update_token_status(
        &self,
        code: &str,
        site_id: &str,
        new_status: TokenStatus,
        used_at: Option<&str>,
    ) -> Result<bool, AccessServiceError> {
        // The status filter makes the scan-then-write race safe: of two
        // concurrent redeemers only one update matches a PENDING row.
        let result = tokens::Entity::update_many()
            .col_expr(tokens::Column::Status, Expr::value(new_status.as_str()))
            .col_expr(
                tokens::Column::UsedAt,
                Expr::value(used_at.map(str::to_owned)),
            )
            .filter(tokens::Column::Code.eq(code))
            .filter(
                Expr::expr(Func::upper(Expr::col(tokens::Column::SiteId)))
                    .eq(site_id.to_uppercase()),
            )
            .filter(tokens::Column::Status.eq(TokenStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .context("update token status")?;
        Ok(result.rows_affected > 0)
    }

    async fn append_audit_event(&self, entry: &AuditEntry) -> Result<(), AccessServiceError> {
        audit_log::ActiveModel {
            time: Set(entry.time.clone()),
            actor: Set(entry.actor.clone()),
            action: Set(entry.action.clone()),
            detail: Set(entry.detail.clone()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("append audit event")?;
        Ok(())
    }
}

fn token_from_model(model: tokens::Model) -> TokenRecord {
    TokenRecord {
        code: model.code,
        technician_name: model.technician_name,
        site_id: model.site_id,
        purpose: model.purpose,
        requester_id: model.requester_id,
        status: TokenStatus::from_db(&model.status),
        issued_at: model.issued_at,
        expires_at: model.expires_at,
        used_at: model.used_at,
    }
}

// ── Whitelist gate ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbWhitelistGate {
    pub db: DatabaseConnection,
}

impl WhitelistGate for DbWhitelistGate {
    async fn is_requester_authorized(
        &self,
        requester_id: &str,
    ) -> Result<bool, AccessServiceError> {
        let entry = whitelist::Entity::find_by_id(requester_id.to_owned())
            .one(&self.db)
            .await
            .context("look up whitelist entry")?;
        Ok(entry.is_some())
    }
}
