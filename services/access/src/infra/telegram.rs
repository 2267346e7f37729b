use anyhow::Context as _;
use serde_json::json;

use crate::error::AccessServiceError;

/// Thin Telegram Bot API client. Only `sendMessage` is needed; replies are
/// HTML-formatted so codes render monospaced.
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    bot_token: String,
}

impl TelegramClient {
    pub fn new(bot_token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            bot_token,
        }
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), AccessServiceError> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);
        let response = self
            .http
            .post(&url)
            .json(&json!({
                "chat_id": chat_id,
                "text": text,
                "parse_mode": "HTML",
            }))
            .send()
            .await
            .context("send telegram message")?;
        response
            .error_for_status()
            .context("telegram sendMessage rejected")?;
        Ok(())
    }
}
