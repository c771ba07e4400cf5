//! LINE webhook payload types

use serde::Deserialize;

/// Top-level webhook request body
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookBody {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// A webhook event. Only message events are decoded; follows, joins,
/// postbacks and the rest collapse into `Other`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WebhookEvent {
    Message {
        /// Absent for events delivered while the channel is in standby mode
        #[serde(rename = "replyToken", default)]
        reply_token: Option<String>,
        source: Source,
        message: MessageContent,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageContent {
    Text {
        #[allow(dead_code)] // Message id, needed only for content downloads
        id: String,
        text: String,
    },
    #[serde(other)]
    Other,
}

/// Where an event came from
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Source {
    User {
        #[serde(rename = "userId")]
        user_id: String,
    },
    Group {
        #[serde(rename = "groupId")]
        group_id: String,
        #[serde(rename = "userId", default)]
        #[allow(dead_code)] // Sender within a shared conversation
        user_id: Option<String>,
    },
    Room {
        #[serde(rename = "roomId")]
        room_id: String,
        #[serde(rename = "userId", default)]
        #[allow(dead_code)] // Sender within a shared conversation
        user_id: Option<String>,
    },
}

impl Source {
    /// Conversation key: the group or room when there is one, else the user
    pub fn conversation_id(&self) -> &str {
        match self {
            Source::User { user_id } => user_id,
            Source::Group { group_id, .. } => group_id,
            Source::Room { room_id, .. } => room_id,
        }
    }
}

/// A decoded inbound text message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEvent {
    pub conversation_id: String,
    pub text: String,
    pub reply_token: String,
}

impl WebhookBody {
    /// Text message events in delivery order; everything else is skipped
    pub fn text_events(&self) -> Vec<TextEvent> {
        self.events
            .iter()
            .filter_map(|event| match event {
                WebhookEvent::Message {
                    reply_token: Some(reply_token),
                    source,
                    message: MessageContent::Text { text, .. },
                } => Some(TextEvent {
                    conversation_id: source.conversation_id().to_string(),
                    text: text.clone(),
                    reply_token: reply_token.clone(),
                }),
                WebhookEvent::Message {
                    reply_token: None,
                    source,
                    ..
                } => {
                    tracing::debug!(
                        conv_id = source.conversation_id(),
                        "Skipping message without reply token"
                    );
                    None
                }
                other => {
                    tracing::debug!(event = ?other, "Skipping non-text event");
                    None
                }
            })
            .collect()
    }
}
