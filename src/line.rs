//! LINE Messaging API integration
//!
//! Webhook decoding, signature checks and reply delivery. Nothing in here
//! knows about the state machine.

mod client;
pub mod signature;
pub mod webhook;

#[cfg(test)]
pub mod testing;

pub use client::{LineClient, LineError, ReplySender};
pub use webhook::{TextEvent, WebhookBody};
