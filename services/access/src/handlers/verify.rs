use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::clock::SystemClock;
use crate::error::AccessServiceError;
use crate::state::AppState;
use crate::usecase::consume_token::{ConsumeOutcome, ConsumeTokenInput, ConsumeTokenUseCase};

#[derive(Deserialize)]
pub struct VerifyParams {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub odc: String,
}

#[derive(Serialize)]
pub struct VerifyResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

/// `GET /verify?token=..&odc=..` — called by the cabinet device to redeem
/// a code. The device only opens the lock on `{"ok":true}`.
pub async fn verify_token(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> Result<(StatusCode, Json<VerifyResponse>), AccessServiceError> {
    if params.token.is_empty() || params.odc.is_empty() {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(VerifyResponse {
                ok: false,
                reason: Some("MISSING_PARAMS"),
            }),
        ));
    }

    let usecase = ConsumeTokenUseCase {
        store: state.token_store(),
        clock: SystemClock,
    };
    let outcome = usecase
        .execute(ConsumeTokenInput {
            code: params.token,
            site_id: params.odc,
            when: None,
        })
        .await?;

    let body = match outcome {
        ConsumeOutcome::Ok => VerifyResponse {
            ok: true,
            reason: None,
        },
        other => VerifyResponse {
            ok: false,
            reason: Some(other.reason()),
        },
    };
    Ok((StatusCode::OK, Json(body)))
}
