use reqwest::Client;

use super::{Notifier, NotifyError};
use crate::config::TelegramConfig;

/// Telegram Bot API `sendMessage` with `parse_mode=HTML`. One POST, no retry.
pub struct TelegramNotifier {
    cfg: TelegramConfig,
    client: Client,
}

impl TelegramNotifier {
    pub fn new(cfg: TelegramConfig) -> Self {
        Self {
            cfg,
            client: Client::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(TelegramConfig::from_env())
    }

    fn send_message_url(&self, token: &str) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.cfg.api_base.trim_end_matches('/'),
            token
        )
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let (Some(token), Some(chat_id)) = (&self.cfg.token, &self.cfg.chat_id) else {
            tracing::warn!("Telegram disabled (TG_TOKEN / TG_CHAT_ID missing)");
            return Err(NotifyError::NotConfigured("telegram"));
        };

        tracing::debug!("[TG] sending message...");
        let form = [
            ("chat_id", chat_id.as_str()),
            ("text", text),
            ("parse_mode", "HTML"),
        ];
        let rsp = self
            .client
            .post(self.send_message_url(token))
            .timeout(self.cfg.timeout)
            .form(&form)
            .send()
            .await
            // reqwest errors embed the URL, which carries the token
            .map_err(|e| NotifyError::Transport(e.without_url()))?;

        let status = rsp.status();
        if !status.is_success() {
            let body = rsp.text().await.unwrap_or_default();
            return Err(NotifyError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }
        tracing::info!("[TG] sent");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "telegram"
    }
}
