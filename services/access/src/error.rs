use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Access service error variants. Redemption outcomes (not found, expired,
/// already used, bad expiry) are not errors — see `ConsumeOutcome`.
#[derive(Debug, thiserror::Error)]
pub enum AccessServiceError {
    #[error("ttl must be positive")]
    InvalidTtl,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AccessServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidTtl => "INVALID_TTL",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AccessServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidTtl => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — tower-http TraceLayer already records method/uri/status
        // for all requests. Internal errors need the anyhow chain logged so the
        // root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
