//! HTTP request handlers

use super::types::{ApiError, HealthResponse};
use super::AppState;
use crate::line::{signature, TextEvent, WebhookBody};
use crate::prompt::FALLBACK_REPLY;
use crate::state_machine::to_dot;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

const SIGNATURE_HEADER: &str = "x-line-signature";

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Drives the stat-entry conversation
        .route("/webhook", post(webhook))
        // Echo endpoint for checking channel wiring
        .route("/callback", post(callback))
        // Diagnostic export of the transition table
        .route("/show-fsm", get(show_fsm))
        .route("/health", get(health))
        .with_state(state)
}

/// Verify the signature and decode the body into text events
fn verified_events(
    state: &AppState,
    headers: &HeaderMap,
    body: &Bytes,
) -> Result<Vec<TextEvent>, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::MissingSignature)?;
    if !signature::verify(&state.channel_secret, body, signature) {
        return Err(ApiError::InvalidSignature);
    }

    let payload: WebhookBody = serde_json::from_slice(body)?;
    tracing::debug!(
        destination = payload.destination.as_deref().unwrap_or(""),
        events = payload.events.len(),
        "Webhook received"
    );
    Ok(payload.text_events())
}

async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, ApiError> {
    for event in verified_events(&state, &headers, &body)? {
        let outcome = state.driver.handle(&event.conversation_id, &event.text);
        let reply = outcome
            .reply_text
            .unwrap_or_else(|| FALLBACK_REPLY.to_string());
        deliver(&state, &event, &reply).await;
    }
    Ok("OK")
}

async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, ApiError> {
    for event in verified_events(&state, &headers, &body)? {
        deliver(&state, &event, &event.text).await;
    }
    Ok("OK")
}

// Delivery failures are logged, never surfaced: a non-2xx makes LINE
// redeliver, and the redelivered message would advance the session twice.
async fn deliver(state: &AppState, event: &TextEvent, text: &str) {
    if let Err(e) = state.replies.reply_text(&event.reply_token, text).await {
        tracing::warn!(
            conv_id = %event.conversation_id,
            error = %e,
            "Failed to deliver reply"
        );
    }
}

async fn show_fsm(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/vnd.graphviz; charset=utf-8")],
        to_dot(state.driver.table()),
    )
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        sessions: state.driver.sessions().len(),
        loop_back: state.driver.table().loop_back().state().as_str(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::SessionDriver;
    use crate::line::testing::RecordingSender;
    use crate::line::ReplySender;
    use crate::session::SessionStore;
    use crate::state_machine::{StatState, TransitionTable};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use std::sync::Arc;
    use tower::ServiceExt;

    const SECRET: &str = "test-secret";

    fn setup(sender: Arc<RecordingSender>) -> (Router, Arc<SessionDriver>) {
        let driver = Arc::new(SessionDriver::new(
            TransitionTable::default(),
            Arc::new(SessionStore::new()),
        ));
        let replies: Arc<dyn ReplySender> = sender;
        let state = AppState::new(Arc::clone(&driver), replies, SECRET);
        (create_router(state), driver)
    }

    fn text_body(user: &str, texts: &[&str]) -> String {
        let events: Vec<_> = texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                json!({
                    "type": "message",
                    "replyToken": format!("token-{i}"),
                    "source": {"type": "user", "userId": user},
                    "message": {"type": "text", "id": i.to_string(), "text": text}
                })
            })
            .collect();
        json!({"destination": "U0", "events": events}).to_string()
    }

    fn signed(path: &str, body: String) -> Request<Body> {
        let signature = signature::sign(SECRET, body.as_bytes());
        Request::builder()
            .method("POST")
            .uri(path)
            .header(SIGNATURE_HEADER, signature)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_webhook_advances_and_replies() {
        let sender = Arc::new(RecordingSender::new());
        let (app, driver) = setup(Arc::clone(&sender));

        let body = text_body("U1", &["start", "Alice 3", "confirm", "done", "3", "2pt", "made"]);
        let response = app.oneshot(signed("/webhook", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "OK");

        let replies = sender.replies();
        assert_eq!(replies.len(), 7);
        assert_eq!(replies[6].0, "token-6");
        assert!(replies[6].1.starts_with("Recorded 2PT made for Alice."));

        let session = driver.sessions().snapshot("U1").unwrap();
        assert_eq!(session.state, StatState::EnterPlayer);
        assert_eq!(session.roster.line("Alice").twopt_made, 1);
    }

    #[tokio::test]
    async fn test_webhook_sends_fallback_on_no_match() {
        let sender = Arc::new(RecordingSender::new());
        let (app, driver) = setup(Arc::clone(&sender));

        let response = app
            .oneshot(signed("/webhook", text_body("U1", &["made"])))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            sender.replies(),
            vec![("token-0".to_string(), FALLBACK_REPLY.to_string())]
        );
        assert_eq!(driver.sessions().snapshot("U1").unwrap().state, StatState::User);
    }

    #[tokio::test]
    async fn test_webhook_rejects_bad_signature() {
        let sender = Arc::new(RecordingSender::new());
        let (app, driver) = setup(Arc::clone(&sender));

        let request = Request::builder()
            .method("POST")
            .uri("/webhook")
            .header(SIGNATURE_HEADER, signature::sign("wrong-secret", b"{}"))
            .body(Body::from(text_body("U1", &["start"])))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let unsigned = Request::builder()
            .method("POST")
            .uri("/webhook")
            .body(Body::from(text_body("U1", &["start"])))
            .unwrap();
        let response = app.oneshot(unsigned).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        assert!(sender.replies().is_empty());
        assert!(driver.sessions().is_empty());
    }

    #[tokio::test]
    async fn test_webhook_skips_events_without_reply_token() {
        let sender = Arc::new(RecordingSender::new());
        let (app, driver) = setup(Arc::clone(&sender));

        let body = json!({
            "destination": "U0",
            "events": [
                {
                    "type": "message",
                    "mode": "standby",
                    "source": {"type": "user", "userId": "U1"},
                    "message": {"type": "text", "id": "1", "text": "start"}
                },
                {
                    "type": "message",
                    "mode": "active",
                    "replyToken": "token-2",
                    "source": {"type": "user", "userId": "U2"},
                    "message": {"type": "text", "id": "2", "text": "start"}
                }
            ]
        })
        .to_string();
        let response = app.oneshot(signed("/webhook", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let replies = sender.replies();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].0, "token-2");
        assert!(driver.sessions().snapshot("U1").is_none());
        assert_eq!(
            driver.sessions().snapshot("U2").unwrap().state,
            StatState::EnterPlayer
        );
    }

    #[tokio::test]
    async fn test_webhook_rejects_malformed_body() {
        let sender = Arc::new(RecordingSender::new());
        let (app, _) = setup(sender);
        let response = app
            .oneshot(signed("/webhook", "not json".to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(response).await.contains("Malformed webhook body"));
    }

    #[tokio::test]
    async fn test_delivery_failure_still_acknowledges() {
        let sender = Arc::new(RecordingSender::failing());
        let (app, driver) = setup(Arc::clone(&sender));
        let response = app
            .oneshot(signed("/webhook", text_body("U1", &["start"])))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(sender.replies().len(), 1);
        assert_eq!(
            driver.sessions().snapshot("U1").unwrap().state,
            StatState::EnterPlayer
        );
    }

    #[tokio::test]
    async fn test_callback_echoes() {
        let sender = Arc::new(RecordingSender::new());
        let (app, driver) = setup(Arc::clone(&sender));
        let response = app
            .oneshot(signed("/callback", text_body("U1", &["hello there"])))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            sender.replies(),
            vec![("token-0".to_string(), "hello there".to_string())]
        );
        assert!(driver.sessions().is_empty());
    }

    #[tokio::test]
    async fn test_show_fsm_returns_dot() {
        let (app, _) = setup(Arc::new(RecordingSender::new()));
        let request = Request::builder().uri("/show-fsm").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/vnd.graphviz; charset=utf-8"
        );
        let dot = body_string(response).await;
        assert!(dot.contains("\"user\" -> \"enter_player\""));
    }

    #[tokio::test]
    async fn test_health_reports_sessions() {
        let (app, driver) = setup(Arc::new(RecordingSender::new()));
        driver.handle("U1", "start");
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(
            body,
            json!({"status": "ok", "sessions": 1, "loop_back": "enter_player"})
        );
    }
}
