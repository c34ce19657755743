use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use review_core::NotificationMessage;
use serde::{Deserialize, Serialize};
use watch_logging::{watch_error, watch_info};

use crate::{Delivery, DeliveryError};

pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Telegram `sendMessage` text limit in characters.
const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

/// Messaging collaborator: delivers a text to a chat.
#[async_trait::async_trait]
pub trait Messenger: Send + Sync {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), DeliveryError>;
}

#[derive(Debug, Clone)]
pub struct MessengerSettings {
    pub api_base: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for MessengerSettings {
    fn default() -> Self {
        Self {
            api_base: TELEGRAM_API_BASE.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct BotReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram Bot API messenger (`POST /bot<token>/sendMessage`).
#[derive(Clone)]
pub struct TelegramMessenger {
    send_url: String,
    client: reqwest::Client,
}

impl TelegramMessenger {
    pub fn new(settings: MessengerSettings, bot_token: &str) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;
        let base = settings.api_base.trim_end_matches('/');
        Ok(Self {
            send_url: format!("{base}/bot{bot_token}/sendMessage"),
            client,
        })
    }
}

#[async_trait::async_trait]
impl Messenger for TelegramMessenger {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), DeliveryError> {
        let text = truncate_message(text, TELEGRAM_MESSAGE_LIMIT);
        let payload = serde_json::to_vec(&SendMessage {
            chat_id,
            text: &text,
        })
        .map_err(|err| DeliveryError::Transport(err.to_string()))?;

        // The URL embeds the bot token, so reqwest errors are stripped of it.
        let response = self
            .client
            .post(&self.send_url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|err| DeliveryError::Transport(err.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| DeliveryError::Transport(err.without_url().to_string()))?;
        if !status.is_success() {
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        match serde_json::from_str::<BotReply>(&body) {
            Ok(BotReply { ok: false, description }) => Err(DeliveryError::Refused(
                description.unwrap_or_else(|| "no description".to_string()),
            )),
            _ => Ok(()),
        }
    }
}

/// Best-effort delivery to the configured chat. Failures are logged, never returned.
#[derive(Clone)]
pub struct Notifier {
    messenger: Arc<dyn Messenger>,
    chat_id: String,
}

impl Notifier {
    pub fn new(messenger: Arc<dyn Messenger>, chat_id: impl Into<String>) -> Self {
        Self {
            messenger,
            chat_id: chat_id.into(),
        }
    }

    pub async fn notify(&self, message: &NotificationMessage) -> Delivery {
        match self
            .messenger
            .send_message(&self.chat_id, message.as_str())
            .await
        {
            Ok(()) => {
                watch_info!("Sent message: {}", message);
                Delivery::Delivered
            }
            Err(err) => {
                watch_error!("Message not sent ({}): {}", err, message);
                Delivery::Failed
            }
        }
    }
}

fn truncate_message(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::truncate_message;

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_message("Ура!", 10), "Ура!");
        assert_eq!(truncate_message("Ура!", 2), "Ур");
        assert_eq!(truncate_message("", 0), "");
    }
}
