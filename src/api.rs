//! HTTP surface: LINE webhook, echo callback and diagnostics

mod handlers;
mod types;

pub use handlers::create_router;

use crate::driver::SessionDriver;
use crate::line::ReplySender;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub driver: Arc<SessionDriver>,
    pub replies: Arc<dyn ReplySender>,
    pub channel_secret: Arc<str>,
}

impl AppState {
    pub fn new(
        driver: Arc<SessionDriver>,
        replies: Arc<dyn ReplySender>,
        channel_secret: &str,
    ) -> Self {
        Self {
            driver,
            replies,
            channel_secret: Arc::from(channel_secret),
        }
    }
}
