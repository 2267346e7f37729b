/// Access service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AccessConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Telegram bot token for the issuance chat front-end.
    pub bot_token: String,
    /// TCP port to listen on (default 3114). Env var: `ACCESS_PORT`.
    pub access_port: u16,
}

impl AccessConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            bot_token: std::env::var("BOT_TOKEN").expect("BOT_TOKEN"),
            access_port: std::env::var("ACCESS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3114),
        }
    }
}
