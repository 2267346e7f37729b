use chrono::{DateTime, Duration, Utc};

use crate::clock::Clock;
use crate::codegen::CodeGenerator;
use crate::domain::repository::TokenStore;
use crate::domain::types::{
    ACTION_ISSUE_TOKEN, AuditEntry, DEFAULT_TTL_MINUTES, MAX_CODE_ATTEMPTS, TokenRecord,
    TokenStatus, format_timestamp,
};
use crate::error::AccessServiceError;

/// Free-text context is trusted to be validated (non-empty, trimmed) by the
/// caller before it reaches the usecase.
pub struct IssueTokenInput {
    pub requester_id: String,
    pub technician_name: String,
    pub site_id: String,
    pub purpose: String,
    pub ttl_minutes: Option<i64>,
}

#[derive(Debug)]
pub struct IssueTokenOutput {
    pub code: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

pub struct IssueTokenUseCase<S, C, G>
where
    S: TokenStore,
    C: Clock,
    G: CodeGenerator,
{
    pub store: S,
    pub clock: C,
    pub generator: G,
}

impl<S, C, G> IssueTokenUseCase<S, C, G>
where
    S: TokenStore,
    C: Clock,
    G: CodeGenerator,
{
    pub async fn execute(
        &self,
        input: IssueTokenInput,
    ) -> Result<IssueTokenOutput, AccessServiceError> {
        let ttl_minutes = input.ttl_minutes.unwrap_or(DEFAULT_TTL_MINUTES);
        if ttl_minutes <= 0 {
            return Err(AccessServiceError::InvalidTtl);
        }

        let issued_at = self.clock.now();
        let code = self.pick_code(issued_at).await?;
        let expires_at = issued_at + Duration::minutes(ttl_minutes);

        let record = TokenRecord {
            code: code.clone(),
            technician_name: input.technician_name,
            site_id: input.site_id.clone(),
            purpose: input.purpose.clone(),
            requester_id: input.requester_id.clone(),
            status: TokenStatus::Pending,
            issued_at: format_timestamp(issued_at),
            expires_at: format_timestamp(expires_at),
            used_at: None,
        };
        self.store.append_token(&record).await?;

        // Audit is best-effort: a failed append never rolls back issuance.
        let entry = AuditEntry {
            time: format_timestamp(self.clock.now()),
            actor: input.requester_id,
            action: ACTION_ISSUE_TOKEN.to_owned(),
            detail: format!("{code}|{}|{}", input.site_id, input.purpose),
        };
        if let Err(e) = self.store.append_audit_event(&entry).await {
            tracing::warn!(error = %e, code, "failed to append issue audit entry");
        }

        Ok(IssueTokenOutput {
            code,
            issued_at,
            expires_at,
        })
    }

    /// Sample candidates until one does not collide with a live pending
    /// token. Exhausting the attempt budget returns the last candidate
    /// anyway — the residual collision odds over a 10,000-value space are
    /// accepted rather than failing the request.
    async fn pick_code(&self, now: DateTime<Utc>) -> Result<String, AccessServiceError> {
        let tokens = self.store.list_tokens().await?;
        let mut candidate = self.generator.generate();
        for _ in 1..MAX_CODE_ATTEMPTS {
            if !collides(&tokens, &candidate, now) {
                return Ok(candidate);
            }
            candidate = self.generator.generate();
        }
        Ok(candidate)
    }
}

fn collides(tokens: &[TokenRecord], candidate: &str, now: DateTime<Utc>) -> bool {
    tokens.iter().any(|t| {
        t.code == candidate
            && t.status == TokenStatus::Pending
            && t.expiry().is_some_and(|exp| exp >= now)
    })
}
