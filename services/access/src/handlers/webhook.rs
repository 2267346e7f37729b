use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::clock::SystemClock;
use crate::codegen::RandomPinGenerator;
use crate::domain::repository::WhitelistGate as _;
use crate::domain::types::format_timestamp;
use crate::error::AccessServiceError;
use crate::state::AppState;
use crate::usecase::issue_token::{IssueTokenInput, IssueTokenUseCase};

#[derive(Debug, Deserialize)]
pub struct TelegramUpdate {
    pub message: Option<IncomingMessage>,
}

#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    pub chat: Chat,
    pub from: Option<Sender>,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct Sender {
    pub id: i64,
}

/// A parsed `/request_key NAME;SITE;PURPOSE` command.
#[derive(Debug, PartialEq, Eq)]
pub struct KeyRequest {
    pub technician_name: String,
    pub site_id: String,
    pub purpose: String,
}

/// `POST /telegram/webhook` — Telegram bot updates. Always answers 200 so
/// Telegram does not retry; processing failures are logged instead.
pub async fn telegram_webhook(
    State(state): State<AppState>,
    Json(update): Json<TelegramUpdate>,
) -> Json<Value> {
    if let Err(e) = handle_update(&state, update).await {
        tracing::error!(error = %e, "telegram webhook processing failed");
    }
    Json(json!({ "ok": true }))
}

async fn handle_update(
    state: &AppState,
    update: TelegramUpdate,
) -> Result<(), AccessServiceError> {
    let Some(message) = update.message else {
        return Ok(());
    };
    let chat_id = message.chat.id;
    let text = message.text.as_deref().unwrap_or("").trim();
    let Some(sender) = message.from else {
        return Ok(());
    };
    if text.is_empty() {
        return Ok(());
    }

    if text.starts_with("/request_key") {
        return handle_request_key(state, chat_id, sender.id, text).await;
    }
    if text == "/start" || text == "/help" {
        return state.telegram.send_message(chat_id, &help_text()).await;
    }
    // Anything else is not for this bot.
    Ok(())
}

async fn handle_request_key(
    state: &AppState,
    chat_id: i64,
    sender_id: i64,
    text: &str,
) -> Result<(), AccessServiceError> {
    let requester_id = sender_id.to_string();

    if !state
        .whitelist_gate()
        .is_requester_authorized(&requester_id)
        .await?
    {
        return state
            .telegram
            .send_message(chat_id, "Sorry, you are not on the access whitelist.")
            .await;
    }

    let Some(request) = parse_request_key(text) else {
        return state
            .telegram
            .send_message(
                chat_id,
                "Wrong format.\nExample: <code>/request_key Budi;ODC-17;Maintenance</code>",
            )
            .await;
    };

    let usecase = IssueTokenUseCase {
        store: state.token_store(),
        clock: SystemClock,
        generator: RandomPinGenerator,
    };
    let issued = usecase
        .execute(IssueTokenInput {
            requester_id,
            technician_name: request.technician_name.clone(),
            site_id: request.site_id.clone(),
            purpose: request.purpose.clone(),
            ttl_minutes: None,
        })
        .await?;

    let reply = issued_reply(
        &issued.code,
        &request,
        &format_timestamp(issued.expires_at),
    );
    state.telegram.send_message(chat_id, &reply).await
}

/// Parse `/request_key NAME;SITE;PURPOSE`. All three fields are required
/// and must be non-empty after trimming; extra semicolons are ignored.
pub fn parse_request_key(text: &str) -> Option<KeyRequest> {
    let rest = text.strip_prefix("/request_key")?.trim();
    if rest.is_empty() {
        return None;
    }
    let mut parts = rest.split(';').map(str::trim);
    let technician_name = parts.next()?;
    let site_id = parts.next()?;
    let purpose = parts.next()?;
    if technician_name.is_empty() || site_id.is_empty() || purpose.is_empty() {
        return None;
    }
    Some(KeyRequest {
        technician_name: technician_name.to_owned(),
        site_id: site_id.to_owned(),
        purpose: purpose.to_owned(),
    })
}

fn issued_reply(code: &str, request: &KeyRequest, expires_at: &str) -> String {
    [
        "<b>KEY ISSUED</b>".to_owned(),
        format!("Token: <code>{code}</code>"),
        format!("Technician: {}", request.technician_name),
        format!("ODC: {}", request.site_id),
        format!("Purpose: {}", request.purpose),
        format!("Valid until: <code>{expires_at}</code>"),
        String::new(),
        "Give this token to the cabinet device for verification.".to_owned(),
    ]
    .join("\n")
}

fn help_text() -> String {
    [
        "Hello. Available commands:",
        "• <code>/request_key TECHNICIAN;ODC;PURPOSE</code>",
        "",
        "Example:",
        "<code>/request_key Surya;ODC-PSN-12;Jumper replacement</code>",
        "",
        "Notes:",
        "- Only whitelisted users can request a key.",
        "- A token is valid for 3 minutes after it is issued.",
    ]
    .join("\n")
}
