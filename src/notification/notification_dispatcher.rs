use crate::error::{AppError, Result};
use crate::state::TelegramConfig;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, error, warn};

use super::notification_models::Transport;

const PARSE_MODE: &str = "HTML";

/// Best-effort delivery of one rendered notification.
///
/// Implementations never retry and never surface errors; `false` means the
/// message was not delivered, for whatever reason.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn send(&self, text: &str, media_url: Option<&str>) -> bool;

    /// Whether delivery credentials are present at all.
    fn is_enabled(&self) -> bool {
        true
    }
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
    disable_web_page_preview: bool,
}

#[derive(Debug, Serialize)]
struct SendPhotoRequest<'a> {
    chat_id: &'a str,
    photo: &'a str,
    caption: &'a str,
    parse_mode: &'a str,
}

#[derive(Clone)]
struct BotCredentials {
    bot_token: String,
    chat_id: String,
}

/// Sends notifications through the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramDispatcher {
    client: reqwest::Client,
    api_base: String,
    credentials: Option<BotCredentials>,
}

impl TelegramDispatcher {
    pub fn new(config: &TelegramConfig) -> Self {
        let credentials = match (&config.bot_token, &config.chat_id) {
            (Some(bot_token), Some(chat_id)) => Some(BotCredentials {
                bot_token: bot_token.clone(),
                chat_id: chat_id.clone(),
            }),
            _ => None,
        };

        Self {
            client: reqwest::Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    fn api_url(&self, credentials: &BotCredentials, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, credentials.bot_token, method)
    }

    async fn deliver(
        &self,
        credentials: &BotCredentials,
        text: &str,
        media_url: Option<&str>,
    ) -> Result<()> {
        let request = match media_url {
            Some(photo) => self
                .client
                .post(self.api_url(credentials, "sendPhoto"))
                .json(&SendPhotoRequest {
                    chat_id: &credentials.chat_id,
                    photo,
                    caption: text,
                    parse_mode: PARSE_MODE,
                }),
            None => self
                .client
                .post(self.api_url(credentials, "sendMessage"))
                .json(&SendMessageRequest {
                    chat_id: &credentials.chat_id,
                    text,
                    parse_mode: PARSE_MODE,
                    disable_web_page_preview: false,
                }),
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Connectivity(format!(
                "Telegram responded with {}",
                status
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl Dispatcher for TelegramDispatcher {
    async fn send(&self, text: &str, media_url: Option<&str>) -> bool {
        let Some(credentials) = &self.credentials else {
            warn!("Telegram bot token or chat ID is missing, notification skipped");
            return false;
        };

        let transport = Transport::for_media(media_url);

        match self.deliver(credentials, text, media_url).await {
            Ok(()) => {
                debug!(?transport, "Telegram notification delivered");
                true
            }
            Err(e) => {
                error!(?transport, error = %e, "Error sending Telegram notification");
                false
            }
        }
    }

    fn is_enabled(&self) -> bool {
        self.is_configured()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(api_base: &str, token: Option<&str>, chat: Option<&str>) -> TelegramConfig {
        TelegramConfig {
            bot_token: token.map(String::from),
            chat_id: chat.map(String::from),
            api_base: api_base.to_string(),
        }
    }

    #[tokio::test]
    async fn test_text_variant_wire_format() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTOKEN/sendMessage"))
            .and(body_json(json!({
                "chat_id": "-1001",
                "text": "<b>hello</b>",
                "parse_mode": "HTML",
                "disable_web_page_preview": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let dispatcher = TelegramDispatcher::new(&config(&server.uri(), Some("TOKEN"), Some("-1001")));
        assert!(dispatcher.send("<b>hello</b>", None).await);
    }

    #[tokio::test]
    async fn test_photo_variant_wire_format() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTOKEN/sendPhoto"))
            .and(body_json(json!({
                "chat_id": "-1001",
                "photo": "http://x/a.png",
                "caption": "caption text",
                "parse_mode": "HTML"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let dispatcher = TelegramDispatcher::new(&config(&server.uri(), Some("TOKEN"), Some("-1001")));
        assert!(dispatcher.send("caption text", Some("http://x/a.png")).await);
    }

    #[tokio::test]
    async fn test_missing_credentials_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        for (token, chat) in [(None, Some("-1001")), (Some("TOKEN"), None), (None, None)] {
            let dispatcher = TelegramDispatcher::new(&config(&server.uri(), token, chat));
            assert!(!dispatcher.is_configured());
            assert!(!dispatcher.send("text", None).await);
            assert!(!dispatcher.send("caption", Some("http://x/a.png")).await);
        }
    }

    #[tokio::test]
    async fn test_error_status_returns_false() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "ok": false,
                "description": "Bad Request: chat not found"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dispatcher = TelegramDispatcher::new(&config(&server.uri(), Some("TOKEN"), Some("-1001")));
        assert!(!dispatcher.send("text", None).await);
    }

    #[tokio::test]
    async fn test_transport_failure_returns_false() {
        let dispatcher =
            TelegramDispatcher::new(&config("http://127.0.0.1:1", Some("TOKEN"), Some("-1001")));
        assert!(!dispatcher.send("text", None).await);
    }
}
