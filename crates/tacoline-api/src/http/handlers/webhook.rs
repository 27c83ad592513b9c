//! LINE webhook endpoint.
//!
//! POST /callback - Verifies `X-Line-Signature`, decodes the payload and
//! acknowledges immediately. Each delivery is handled in its own task, with
//! its events processed in the order LINE sent them; replies are
//! fire-and-forget.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use secrecy::ExposeSecret;
use tracing::{Instrument, debug, error, info_span, warn};

use tacoline_infra::line::signature::{SIGNATURE_HEADER, verify_signature};
use tacoline_infra::line::webhook::WebhookBody;
use tacoline_types::event::InboundEvent;
use tacoline_types::reply::ReplyMessage;

use crate::http::error::AppError;
use crate::state::{AppState, ConcreteRouter};

/// POST /callback
pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, AppError> {
    if let Some(secret) = &state.channel_secret {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|value| value.to_str().ok());
        verify_signature(secret.expose_secret().as_bytes(), &body, signature)?;
    }

    let payload: WebhookBody = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("invalid webhook payload: {e}")))?;

    let events = payload.inbound_events();
    debug!(count = events.len(), "webhook accepted");

    if !events.is_empty() {
        tokio::spawn(process_batch(state, events));
    }

    Ok("OK")
}

/// Handle the events of one delivery one after another.
pub async fn process_batch(state: AppState, events: Vec<InboundEvent>) {
    for event in events {
        let span = info_span!("event", user_id = %event.user_id, kind = ?event.kind);
        process_event(state.clone(), event).instrument(span).await;
    }
}

/// Route one event and deliver the replies. Returns what was sent.
pub async fn process_event(state: AppState, event: InboundEvent) -> Vec<ReplyMessage> {
    let router = Arc::clone(&state.router);
    let routed = event.clone();
    let messages = run_isolated(move || router.handle(&routed)).await;

    if messages.is_empty() {
        return messages;
    }
    if let Err(e) = state.replies.reply(&event.reply_token, &messages).await {
        warn!(
            user_id = %event.user_id,
            sender = state.replies.name(),
            error = %e,
            "failed to deliver reply"
        );
    }
    messages
}

/// Run the router on the blocking pool; a panic becomes the apology reply.
async fn run_isolated<F>(handle: F) -> Vec<ReplyMessage>
where
    F: FnOnce() -> Vec<ReplyMessage> + Send + 'static,
{
    match tokio::task::spawn_blocking(handle).await {
        Ok(messages) => messages,
        Err(e) => {
            error!(error = %e, "event handler failed");
            ConcreteRouter::apology()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use axum::http::{HeaderValue, StatusCode};
    use axum::response::IntoResponse;
    use secrecy::SecretString;

    use tacoline_core::catalog::Catalog;
    use tacoline_core::reply::box_sender::BoxReplySender;
    use tacoline_core::reply::sender::ReplySender;
    use tacoline_core::session::{InMemorySessionStore, SessionRouter, SessionStore};
    use tacoline_core::session::router::APOLOGY_TEXT;
    use tacoline_infra::line::signature::sign;
    use tacoline_types::cart::UserId;
    use tacoline_types::config::ShopConfig;
    use tacoline_types::error::ReplyError;

    const SECRET: &str = "test-channel-secret";

    type Sent = Arc<Mutex<Vec<(String, Vec<ReplyMessage>)>>>;

    #[derive(Clone, Default)]
    struct Recorder {
        sent: Sent,
    }

    impl ReplySender for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        async fn reply(&self, reply_token: &str, messages: &[ReplyMessage]) -> Result<(), ReplyError> {
            self.sent
                .lock()
                .unwrap()
                .push((reply_token.to_string(), messages.to_vec()));
            Ok(())
        }
    }

    struct Failing;

    impl ReplySender for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        async fn reply(&self, _reply_token: &str, _messages: &[ReplyMessage]) -> Result<(), ReplyError> {
            Err(ReplyError::Api {
                status: 400,
                message: "Invalid reply token".into(),
            })
        }
    }

    fn test_state(sender: BoxReplySender) -> AppState {
        let router = SessionRouter::new(
            Arc::new(Catalog::default()),
            &ShopConfig::default(),
            InMemorySessionStore::new(),
        );
        AppState::new(router, sender, Some(SecretString::from(SECRET)))
    }

    fn signed_headers(body: &[u8]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let signature = sign(SECRET.as_bytes(), body).unwrap();
        headers.insert(SIGNATURE_HEADER, HeaderValue::from_str(&signature).unwrap());
        headers
    }

    fn text_payload(user: &str, text: &str, token: &str) -> Vec<u8> {
        serde_json::json!({
            "destination": "Ubot",
            "events": [{
                "type": "message",
                "replyToken": token,
                "source": {"type": "user", "userId": user},
                "message": {"id": "1", "type": "text", "text": text}
            }]
        })
        .to_string()
        .into_bytes()
    }

    async fn status_of(state: AppState, headers: HeaderMap, body: Vec<u8>) -> StatusCode {
        match callback(State(state), headers, Bytes::from(body)).await {
            Ok(ok) => ok.into_response().status(),
            Err(e) => e.into_response().status(),
        }
    }

    #[tokio::test]
    async fn test_valid_callback_replies() {
        let recorder = Recorder::default();
        let sent = Arc::clone(&recorder.sent);
        let state = test_state(BoxReplySender::new(recorder));

        let body = text_payload("U1", "我要點餐", "tok-1");
        let headers = signed_headers(&body);
        let result = callback(State(state.clone()), headers, Bytes::from(body)).await;
        assert_eq!(result.unwrap(), "OK");

        // Event tasks run detached; wait for the reply to land.
        for _ in 0..100 {
            if !sent.lock().unwrap().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "tok-1");
        assert_eq!(sent[0].1.last().unwrap().body(), "請選擇主餐");
    }

    fn postback_batch(user: &str, data: &[&str]) -> Vec<u8> {
        let events: Vec<serde_json::Value> = data
            .iter()
            .enumerate()
            .map(|(i, data)| {
                serde_json::json!({
                    "type": "postback",
                    "replyToken": format!("tok-{i}"),
                    "source": {"type": "user", "userId": user},
                    "postback": {"data": data}
                })
            })
            .collect();
        serde_json::json!({"destination": "Ubot", "events": events})
            .to_string()
            .into_bytes()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_batched_events_run_in_delivery_order() {
        let steps = [
            "cmd=start",
            "main=雞肉Taco",
            "meal=single",
            "skip=meat",
            "topping=香菜",
            "sauce=酪梨醬",
            "skip=sauce",
            "qty=2",
        ];

        for round in 0..20 {
            let recorder = Recorder::default();
            let sent = Arc::clone(&recorder.sent);
            let state = test_state(BoxReplySender::new(recorder));
            let user = format!("U{round}");

            let body = postback_batch(&user, &steps);
            let headers = signed_headers(&body);
            let result = callback(State(state.clone()), headers, Bytes::from(body)).await;
            assert_eq!(result.unwrap(), "OK");

            for _ in 0..200 {
                if sent.lock().unwrap().len() == steps.len() {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }

            let tokens: Vec<String> = sent.lock().unwrap().iter().map(|(t, _)| t.clone()).collect();
            let expected: Vec<String> = (0..steps.len()).map(|i| format!("tok-{i}")).collect();
            assert_eq!(tokens, expected, "round {round}: replies out of order");

            let cart = state.router.store().get(&UserId::from(user.as_str())).unwrap();
            assert_eq!(cart.lines.len(), 1, "round {round}");
            assert!(cart.pending.is_none(), "round {round}");
            assert_eq!(cart.lines[0].quantity, Some(2));
        }
    }

    #[tokio::test]
    async fn test_bad_signature_rejected() {
        let state = test_state(BoxReplySender::new(Recorder::default()));
        let body = text_payload("U1", "hello", "tok");

        let mut forged = HeaderMap::new();
        forged.insert(
            SIGNATURE_HEADER,
            HeaderValue::from_str(&sign(b"wrong-secret", &body).unwrap()).unwrap(),
        );
        assert_eq!(
            status_of(state.clone(), forged, body.clone()).await,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(state.clone(), HeaderMap::new(), body).await,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(state.router.store().user_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_rejected() {
        let state = test_state(BoxReplySender::new(Recorder::default()));
        let body = b"{not json".to_vec();
        let headers = signed_headers(&body);
        assert_eq!(status_of(state, headers, body).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_verification_ping_accepted() {
        let state = test_state(BoxReplySender::new(Recorder::default()));
        let body = br#"{"destination":"Ubot","events":[]}"#.to_vec();
        let headers = signed_headers(&body);
        assert_eq!(status_of(state, headers, body).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_dry_run_without_secret_skips_verification() {
        let mut state = test_state(BoxReplySender::new(Recorder::default()));
        state.channel_secret = None;
        let body = text_payload("U1", "hello", "tok");
        assert_eq!(status_of(state, HeaderMap::new(), body).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_process_event_full_order() {
        let recorder = Recorder::default();
        let sent = Arc::clone(&recorder.sent);
        let state = test_state(BoxReplySender::new(recorder));

        let steps = [
            "cmd=start",
            "main=雞肉Taco",
            "meal=single",
            "skip=meat",
            "topping=香菜",
            "sauce=酪梨醬",
            "skip=sauce",
            "qty=2",
        ];
        for (i, data) in steps.iter().enumerate() {
            let event = InboundEvent::postback("U1", *data, format!("tok-{i}"));
            process_event(state.clone(), event).await;
        }
        let replies = process_event(
            state.clone(),
            InboundEvent::text("U1", "結帳", "tok-checkout"),
        )
        .await;

        let receipt = replies[0].body();
        assert!(receipt.contains("小計: $260"));
        assert!(receipt.contains("應付金額: $234"));
        assert_eq!(sent.lock().unwrap().len(), steps.len() + 1);

        let cart = state.router.store().get(&UserId::from("U1")).unwrap();
        assert!(cart.lines.is_empty());
    }

    #[tokio::test]
    async fn test_delivery_failure_is_logged_not_fatal() {
        let state = test_state(BoxReplySender::new(Failing));
        let replies = process_event(state.clone(), InboundEvent::text("U1", "hello", "tok")).await;
        assert!(!replies.is_empty());
        assert_eq!(state.router.store().user_count(), 1);
    }

    #[tokio::test]
    async fn test_panic_becomes_apology() {
        let replies = run_isolated(|| panic!("handler exploded")).await;
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].body(), APOLOGY_TEXT);
    }
}
