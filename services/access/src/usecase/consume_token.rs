use chrono::{DateTime, Utc};

use crate::clock::Clock;
use crate::domain::repository::TokenStore;
use crate::domain::types::{
    ACTION_CONSUME_TOKEN, AuditEntry, DEVICE_ACTOR, TokenStatus, format_timestamp,
};
use crate::error::AccessServiceError;

/// Outcome of a redemption attempt. Exactly one per call; these are
/// expected results, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// Token matched, was live, and is now Used. The lock may open.
    Ok,
    /// No token with this code exists for this site.
    NotFound,
    /// Matched a token that is no longer Pending — consumed earlier, lost
    /// the redemption race, or sitting in an unexpected state.
    AlreadyUsedOrInvalid,
    /// Matched a Pending token whose stored expiry is not a timestamp.
    BadExpiry,
    /// Matched a Pending token past its window. The record stays Pending.
    Expired,
}

impl ConsumeOutcome {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::NotFound => "NOT_FOUND",
            Self::AlreadyUsedOrInvalid => "ALREADY_USED_OR_INVALID",
            Self::BadExpiry => "BAD_EXPIRY",
            Self::Expired => "EXPIRED",
        }
    }
}

pub struct ConsumeTokenInput {
    pub code: String,
    pub site_id: String,
    /// Redemption instant; defaults to the clock's now.
    pub when: Option<DateTime<Utc>>,
}

pub struct ConsumeTokenUseCase<S, C>
where
    S: TokenStore,
    C: Clock,
{
    pub store: S,
    pub clock: C,
}

impl<S, C> ConsumeTokenUseCase<S, C>
where
    S: TokenStore,
    C: Clock,
{
    pub async fn execute(
        &self,
        input: ConsumeTokenInput,
    ) -> Result<ConsumeOutcome, AccessServiceError> {
        let when = input.when.unwrap_or_else(|| self.clock.now());
        let outcome = self.redeem(&input.code, &input.site_id, when).await?;
        self.audit(&input.code, &input.site_id, outcome).await;
        Ok(outcome)
    }

    async fn redeem(
        &self,
        code: &str,
        site_id: &str,
        when: DateTime<Utc>,
    ) -> Result<ConsumeOutcome, AccessServiceError> {
        // Single pass in insertion order, first match wins.
        let tokens = self.store.list_tokens().await?;
        let wanted_site = site_id.to_uppercase();
        let Some(token) = tokens
            .iter()
            .find(|t| t.code == code && t.site_id.to_uppercase() == wanted_site)
        else {
            return Ok(ConsumeOutcome::NotFound);
        };

        if token.status != TokenStatus::Pending {
            return Ok(ConsumeOutcome::AlreadyUsedOrInvalid);
        }
        let Some(expires_at) = token.expiry() else {
            return Ok(ConsumeOutcome::BadExpiry);
        };
        if when > expires_at {
            // Expired tokens are left Pending; there is no reaper.
            return Ok(ConsumeOutcome::Expired);
        }

        // The store only flips rows still Pending, so a concurrent redeemer
        // cannot make two calls both report Ok.
        let used_at = format_timestamp(when);
        let changed = self
            .store
            .update_token_status(code, site_id, TokenStatus::Used, Some(&used_at))
            .await?;
        if !changed {
            return Ok(ConsumeOutcome::AlreadyUsedOrInvalid);
        }
        Ok(ConsumeOutcome::Ok)
    }

    async fn audit(&self, code: &str, site_id: &str, outcome: ConsumeOutcome) {
        let entry = AuditEntry {
            time: format_timestamp(self.clock.now()),
            actor: DEVICE_ACTOR.to_owned(),
            action: ACTION_CONSUME_TOKEN.to_owned(),
            detail: format!("{code}|{site_id}|{}", outcome.reason()),
        };
        if let Err(e) = self.store.append_audit_event(&entry).await {
            tracing::warn!(error = %e, code, "failed to append consume audit entry");
        }
    }
}
