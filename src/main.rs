//! Hoopstat - basketball play-by-play stat keeper for LINE chats
//!
//! Each chat conversation walks a finite-state machine that collects a
//! roster and then records shots and rebounds per player.

mod api;
mod config;
mod driver;
mod line;
mod prompt;
mod session;
mod state_machine;

use api::{create_router, AppState};
use config::Config;
use driver::SessionDriver;
use line::{LineClient, ReplySender};
use session::SessionStore;
use state_machine::TransitionTable;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hoopstat=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let replies: Arc<dyn ReplySender> = Arc::new(LineClient::new(
        config.channel_access_token.clone(),
        &config.line_api_base,
    )?);

    let table = TransitionTable::new(config.loop_back);
    tracing::info!(
        transitions = table.transitions().len(),
        loop_back = %table.loop_back().state(),
        "Transition table built"
    );
    let driver = Arc::new(SessionDriver::new(table, Arc::new(SessionStore::new())));

    let state = AppState::new(driver, replies, &config.channel_secret);
    let app = create_router(state).layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Hoopstat listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
