use std::time::Duration;

use error_stack::{Report, ResultExt, bail};
use futures::future::BoxFuture;
use serde_json::json;
use tracing::debug;

use crate::error::NotifierError;
use crate::notifier::Notifier;

const TELEGRAM_BASE_URL: &str = "https://api.telegram.org";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Publishes messages to a Telegram chat via the bot API.
///
/// Credentials are constructor parameters; there is no ambient environment
/// lookup here. Empty credentials are accepted at construction and fail each
/// publish attempt instead, so a misconfigured daemon keeps running and
/// logging rather than crashing.
pub struct TelegramNotifier {
    client: reqwest::Client,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(token: String, chat_id: String) -> Result<Self, Report<NotifierError>> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .change_context(NotifierError::Request)?;

        Ok(Self {
            client,
            token,
            chat_id,
        })
    }
}

impl Notifier for TelegramNotifier {
    fn name(&self) -> &'static str {
        "telegram"
    }

    fn publish<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<(), Report<NotifierError>>> {
        Box::pin(async move {
            if self.token.is_empty() || self.chat_id.is_empty() {
                bail!(NotifierError::MissingCredentials);
            }

            let url = format!("{}/bot{}/sendMessage", TELEGRAM_BASE_URL, self.token);
            let payload = json!({
                "chat_id": self.chat_id,
                "text": text,
                "parse_mode": "Markdown",
            });

            let response = self
                .client
                .post(&url)
                .json(&payload)
                .send()
                .await
                .change_context(NotifierError::Request)?;

            let status = response.status();
            if !status.is_success() {
                bail!(NotifierError::Rejected {
                    status: status.as_u16(),
                });
            }

            debug!(chat_id = %self.chat_id, "telegram message delivered");
            Ok(())
        })
    }
}
