//! Notification delivery seam and the chat-bot webhook implementation.

use async_trait::async_trait;
use figwatch_core::errors::{ExError, ExErrorKind, Result};
use figwatch_core_types::Sensitive;
use std::time::Duration;

pub const DEFAULT_NOTIFY_BASE: &str = "https://notify.bot.codex.so/u";

/// Markup flavour of a message. Reports are HTML-flavoured rich text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFormat {
    Html,
}

impl MessageFormat {
    /// Value of the bot's `parse_mode` field
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageFormat::Html => "HTML",
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str, format: MessageFormat) -> Result<()>;
}

/// Posts messages to a chat-bot webhook as a form with `message` and
/// `parse_mode` fields.
#[derive(Debug, Clone)]
pub struct CodexBotNotifier {
    http: reqwest::Client,
    /// Contains the bot token
    url: Sensitive<String>,
}

impl CodexBotNotifier {
    /// # Errors
    ///
    /// `Config` when the HTTP client cannot be built.
    pub fn new(base_url: &str, token: &Sensitive<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ExError::new(ExErrorKind::Config)
                    .with_op("build_notifier")
                    .with_message(e.to_string())
            })?;
        let url = format!("{}/{}", base_url.trim_end_matches('/'), token.expose());
        Ok(Self {
            http,
            url: Sensitive::new(url),
        })
    }
}

#[async_trait]
impl Notifier for CodexBotNotifier {
    async fn send(&self, text: &str, format: MessageFormat) -> Result<()> {
        let form = [("message", text), ("parse_mode", format.as_str())];
        let response = self
            .http
            .post(self.url.expose().as_str())
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                // reqwest errors echo the url, which holds the token
                ExError::new(ExErrorKind::DeliveryFailed)
                    .with_op("send_report")
                    .with_message(e.without_url().to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExError::new(ExErrorKind::DeliveryFailed)
                .with_op("send_report")
                .with_message(format!("notifier answered {}", status.as_u16())));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode_values() {
        assert_eq!(MessageFormat::Html.as_str(), "HTML");
    }

    #[test]
    fn test_debug_hides_token() {
        let notifier = CodexBotNotifier::new(
            "https://notify.example.test/u/",
            &Sensitive::new("bot-secret".to_string()),
            Duration::from_secs(1),
        )
        .unwrap();
        assert!(!format!("{:?}", notifier).contains("bot-secret"));
        assert_eq!(
            notifier.url.expose(),
            "https://notify.example.test/u/bot-secret"
        );
    }
}
