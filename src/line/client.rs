//! LINE Messaging API reply client

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// LINE rejects text messages longer than this many characters
pub const MAX_TEXT_CHARS: usize = 5000;

#[derive(Debug, Error)]
pub enum LineError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("LINE API returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// Delivers reply text for a webhook event
#[async_trait]
pub trait ReplySender: Send + Sync {
    async fn reply_text(&self, reply_token: &str, text: &str) -> Result<(), LineError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: Vec<TextMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    r#type: &'static str,
    text: &'a str,
}

/// Reply client backed by the LINE HTTP API
pub struct LineClient {
    client: Client,
    access_token: String,
    reply_url: String,
}

impl LineClient {
    pub fn new(access_token: impl Into<String>, api_base: &str) -> Result<Self, LineError> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            client,
            access_token: access_token.into(),
            reply_url: format!("{}/v2/bot/message/reply", api_base.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl ReplySender for LineClient {
    async fn reply_text(&self, reply_token: &str, text: &str) -> Result<(), LineError> {
        let text = truncate_chars(text, MAX_TEXT_CHARS);
        let request = ReplyRequest {
            reply_token,
            messages: vec![TextMessage {
                r#type: "text",
                text,
            }],
        };

        let response = self
            .client
            .post(&self.reply_url)
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(LineError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text.get(..idx).unwrap_or(text),
        None => text,
    }
}
