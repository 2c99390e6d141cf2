use super::traits::{Channel, ChannelMessage, ReplyFormat};
use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Telegram channel — long-polls the Bot API for updates.
///
/// The channel does no authorization of its own: every text message is
/// forwarded with its sender id, and the access guard decides downstream.
pub struct TelegramChannel {
    bot_token: String,
    api_base: String,
    client: reqwest::Client,
}

impl TelegramChannel {
    pub fn new(bot_token: String) -> Self {
        Self {
            bot_token,
            api_base: TELEGRAM_API_BASE.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Point the channel at a different API host. Test seam.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, self.bot_token)
    }

    /// Validate the token against the Bot API and return the bot username.
    pub async fn get_me(&self) -> anyhow::Result<String> {
        let resp = self
            .client
            .get(self.api_url("getMe"))
            .send()
            .await
            .context("Telegram getMe request failed")?;
        if !resp.status().is_success() {
            anyhow::bail!("Telegram rejected the bot token (HTTP {})", resp.status());
        }
        let data: serde_json::Value = resp
            .json()
            .await
            .context("Telegram getMe returned malformed JSON")?;
        Ok(data["result"]["username"]
            .as_str()
            .unwrap_or("unknown")
            .to_string())
    }
}

/// Extract a [`ChannelMessage`] from one `getUpdates` entry.
///
/// Returns `None` for updates without a text message or a sender id.
fn parse_update(update: &serde_json::Value) -> Option<ChannelMessage> {
    let message = update.get("message")?;
    let text = message.get("text").and_then(serde_json::Value::as_str)?;
    let sender_id = message
        .get("from")
        .and_then(|f| f.get("id"))
        .and_then(serde_json::Value::as_i64)?;
    let chat_id = message
        .get("chat")
        .and_then(|c| c.get("id"))
        .and_then(serde_json::Value::as_i64)?;

    Some(ChannelMessage {
        id: Uuid::new_v4().to_string(),
        sender_id,
        chat_id: chat_id.to_string(),
        content: text.to_string(),
        timestamp: std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
    })
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(
        &self,
        message: &str,
        recipient: &str,
        format: ReplyFormat,
    ) -> anyhow::Result<()> {
        let mut body = serde_json::json!({
            "chat_id": recipient,
            "text": message,
        });
        if format == ReplyFormat::Markdown {
            body["parse_mode"] = serde_json::Value::from("Markdown");
        }

        self.client
            .post(self.api_url("sendMessage"))
            .json(&body)
            .send()
            .await?;

        Ok(())
    }

    async fn listen(&self, tx: tokio::sync::mpsc::Sender<ChannelMessage>) -> anyhow::Result<()> {
        let mut offset: i64 = 0;

        tracing::info!("Telegram channel listening for messages...");

        loop {
            let body = serde_json::json!({
                "offset": offset,
                "timeout": 30,
                "allowed_updates": ["message"]
            });

            let resp = match self
                .client
                .post(self.api_url("getUpdates"))
                .json(&body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!("Telegram poll error: {e}");
                    tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                    continue;
                }
            };

            let data: serde_json::Value = match resp.json().await {
                Ok(d) => d,
                Err(e) => {
                    tracing::warn!("Telegram parse error: {e}");
                    tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                    continue;
                }
            };

            if let Some(results) = data.get("result").and_then(serde_json::Value::as_array) {
                for update in results {
                    // Advance offset past this update
                    if let Some(uid) = update.get("update_id").and_then(serde_json::Value::as_i64) {
                        offset = uid + 1;
                    }

                    let Some(msg) = parse_update(update) else {
                        continue;
                    };

                    if tx.send(msg).await.is_err() {
                        return Ok(());
                    }
                }
            }
        }
    }

    async fn health_check(&self) -> bool {
        self.get_me().await.is_ok()
    }
}
