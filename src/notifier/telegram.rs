use std::time::Duration;

use reqwest::Client;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::model::NotifyError;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);
const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Sends formatted messages to one fixed Telegram chat.
///
/// Delivery is single-shot: failures go back to the caller and the next
/// worker cycle is the retry policy.
pub struct TelegramNotifier {
    bot_token: String,
    chat_id: i64,
    client: Client,
    base_url: String,
}

impl TelegramNotifier {
    pub fn new(bot_token: &str, chat_id: i64) -> Result<Self, NotifyError> {
        Self::with_base_url(bot_token, chat_id, TELEGRAM_API_BASE)
    }

    /// Custom base URL constructor, used to point at a mock server in tests.
    pub fn with_base_url(
        bot_token: &str,
        chat_id: i64,
        base_url: &str,
    ) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| NotifyError::Api(e.to_string()))?;

        Ok(Self {
            bot_token: bot_token.to_string(),
            chat_id,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Sends one Markdown-formatted text message to the configured chat.
    pub async fn send_text(&self, text: &str) -> Result<(), NotifyError> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.bot_token);
        let params = [
            ("chat_id", self.chat_id.to_string()),
            ("text", text.to_string()),
            ("parse_mode", "Markdown".to_string()),
        ];

        let response = match timeout(SEND_TIMEOUT, self.client.post(&url).form(&params).send()).await
        {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) => {
                warn!("telegram send failed: {e}");
                return Err(NotifyError::Api(e.to_string()));
            }
            Err(_) => {
                warn!("telegram send timed out");
                return Err(NotifyError::Unreachable);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "unknown".into());
            warn!("telegram api responded [{status}]: {body}");
            return Err(NotifyError::Unreachable);
        }

        info!("telegram message sent [{status}]");
        Ok(())
    }
}
