//! Mock reply sender for testing

use super::client::{LineError, ReplySender};
use async_trait::async_trait;
use std::sync::Mutex;

/// Records every reply instead of sending it
#[derive(Default)]
pub struct RecordingSender {
    replies: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sender whose every delivery fails with an API error
    pub fn failing() -> Self {
        Self {
            replies: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// (reply token, text) pairs in delivery order
    pub fn replies(&self) -> Vec<(String, String)> {
        self.replies.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplySender for RecordingSender {
    async fn reply_text(&self, reply_token: &str, text: &str) -> Result<(), LineError> {
        self.replies
            .lock()
            .unwrap()
            .push((reply_token.to_string(), text.to_string()));
        if self.fail {
            return Err(LineError::Api {
                status: 400,
                body: "Invalid reply token".to_string(),
            });
        }
        Ok(())
    }
}
