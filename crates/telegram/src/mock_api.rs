//! In-process stand-in for the Telegram Bot API.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use {
    axum::{Json, Router, body::Bytes, extract::State, http::Uri, routing::post},
    serde_json::{Value, json},
    tokio::sync::oneshot,
};

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    /// Lower-cased Bot API method, e.g. `sendmessage`.
    pub method: String,
    pub body: Value,
}

#[derive(Clone, Default)]
struct MockState {
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    responses: Arc<Mutex<HashMap<String, Value>>>,
}

pub struct MockTelegramApi {
    state: MockState,
    pub bot: teloxide::Bot,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockTelegramApi {
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new()
            .route("/{*path}", post(handler))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("serve mock telegram api");
        });

        let api_url = reqwest::Url::parse(&format!("http://{addr}/")).expect("parse api url");
        let bot = teloxide::Bot::new("test-token").set_api_url(api_url);
        Self {
            state,
            bot,
            shutdown: Some(shutdown_tx),
        }
    }

    /// Override the full JSON response for a method (case-insensitive).
    pub fn respond(&self, method: &str, response: Value) {
        self.state
            .responses
            .lock()
            .unwrap()
            .insert(method.to_ascii_lowercase(), response);
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// `(chat_id, text)` of every sendMessage call.
    pub fn sent_messages(&self) -> Vec<(i64, String)> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == "sendmessage")
            .map(|r| {
                (
                    r.body["chat_id"].as_i64().unwrap(),
                    r.body["text"].as_str().unwrap().to_string(),
                )
            })
            .collect()
    }
}

impl Drop for MockTelegramApi {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

async fn handler(State(state): State<MockState>, uri: Uri, body: Bytes) -> Json<Value> {
    let method = uri
        .path()
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let response = state.responses.lock().unwrap().get(&method).cloned();
    let response = response.unwrap_or_else(|| default_response(&method, &body));
    state
        .requests
        .lock()
        .unwrap()
        .push(CapturedRequest { method, body });
    Json(response)
}

fn default_response(method: &str, body: &Value) -> Value {
    match method {
        "sendmessage" => json!({
            "ok": true,
            "result": {
                "message_id": 1,
                "date": 0,
                "chat": { "id": body["chat_id"], "type": "private", "first_name": "Admin" },
                "text": body["text"],
            }
        }),
        _ => json!({ "ok": true, "result": true }),
    }
}
