#![allow(dead_code)]

use std::net::TcpListener as StdTcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};

pub const TEST_TOKEN: &str = "tid=test-copilot-token;exp=1999999999";
pub const PIRATE_REPLY: &str =
    "Arrr! The Eiffel Tower be the grandest mast in all of Paris, matey!";

/// What the mock answers to every chat-completion request.
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    /// 200 with this text, provided the bearer token matches [`TEST_TOKEN`].
    Text(&'static str),
    /// This status with an error body.
    Status(StatusCode),
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub headers: HeaderMap,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    reply: Reply,
    seen: Arc<Mutex<Vec<Recorded>>>,
}

pub struct MockEndpoint {
    pub base_url: String,
    seen: Arc<Mutex<Vec<Recorded>>>,
}

impl MockEndpoint {
    pub fn requests(&self) -> Vec<Recorded> {
        self.seen.lock().expect("mock state should not be poisoned").clone()
    }
}

/// Serves `POST /chat/completions` on a loopback port from a background thread.
pub fn spawn(reply: Reply) -> MockEndpoint {
    let listener = StdTcpListener::bind("127.0.0.1:0").expect("loopback port should bind");
    listener
        .set_nonblocking(true)
        .expect("listener should become non-blocking");
    let addr = listener.local_addr().expect("listener should have an address");

    let seen = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        reply,
        seen: Arc::clone(&seen),
    };

    thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("mock runtime should build");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener)
                .expect("listener should register with tokio");
            let app = Router::new()
                .route("/chat/completions", post(completions))
                .with_state(state);
            axum::serve(listener, app)
                .await
                .expect("mock server should run");
        });
    });

    MockEndpoint {
        base_url: format!("http://{addr}"),
        seen,
    }
}

async fn completions(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let authorized = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {TEST_TOKEN}"));

    state
        .seen
        .lock()
        .expect("mock state should not be poisoned")
        .push(Recorded { headers, body });

    match state.reply {
        Reply::Text(text) if authorized => Json(json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "model": "gpt-4o",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": text},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 58, "completion_tokens": 17, "total_tokens": 75}
        }))
        .into_response(),
        Reply::Text(_) => error_response(StatusCode::UNAUTHORIZED),
        Reply::Status(status) => error_response(status),
    }
}

fn error_response(status: StatusCode) -> Response {
    let message = status.canonical_reason().unwrap_or("error");
    (status, Json(json!({"error": {"message": message}}))).into_response()
}
