#![allow(async_fn_in_trait)]

use crate::domain::types::{AuditEntry, TokenRecord, TokenStatus};
use crate::error::AccessServiceError;

/// Port over the durable token store. All state lives behind this trait;
/// the core holds nothing between calls.
pub trait TokenStore: Send + Sync {
    /// Every stored token in insertion order. An empty store yields an
    /// empty vec, never an error.
    async fn list_tokens(&self) -> Result<Vec<TokenRecord>, AccessServiceError>;

    /// Insert a new row. Must not deduplicate.
    async fn append_token(&self, record: &TokenRecord) -> Result<(), AccessServiceError>;

    /// Conditionally transition the row matching `code` and
    /// (case-insensitive) `site_id`: only status and used_at change, and
    /// only if the current status is still PENDING. Returns whether a row
    /// changed — `false` means a concurrent redeemer won the race.
    async fn update_token_status(
        &self,
        code: &str,
        site_id: &str,
        new_status: TokenStatus,
        used_at: Option<&str>,
    ) -> Result<bool, AccessServiceError>;

    /// Append to the audit trail.
    async fn append_audit_event(&self, entry: &AuditEntry) -> Result<(), AccessServiceError>;
}

/// Port for the requester whitelist, consulted before issuance.
pub trait WhitelistGate: Send + Sync {
    async fn is_requester_authorized(
        &self,
        requester_id: &str,
    ) -> Result<bool, AccessServiceError>;
}
