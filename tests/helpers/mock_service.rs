//! Mock governance service for integration testing.
//!
//! Provides a configurable mock server that answers the action submit and
//! status endpoints with scripted per-call replies, and captures request
//! bodies and headers so tests can assert on exactly what the client sent.
//!
//! Note: Some accessors are provided for future test expansion and may not
//! be used by every test crate. They are covered by `#[allow(dead_code)]`.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use axum::Router;
use axum::extract::{Json, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

type Reply = (StatusCode, Value);

/// Mock governance service.
///
/// Replies are scripted per call and consumed in order; once a queue runs
/// dry the last scripted reply repeats, and with nothing scripted at all
/// the endpoint falls back to a benign default ("allowed" for submits,
/// "pending" for status lookups).
pub struct MockGovernance {
    submit_replies: VecDeque<Reply>,
    status_replies: VecDeque<Reply>,
    submit_delay: Option<Duration>,
}

impl MockGovernance {
    #[must_use]
    pub fn new() -> Self {
        Self {
            submit_replies: VecDeque::new(),
            status_replies: VecDeque::new(),
            submit_delay: None,
        }
    }

    /// Script the next reply for `POST /v1/actions`.
    #[must_use]
    pub fn on_submit(mut self, status: u16, body: Value) -> Self {
        self.submit_replies
            .push_back((StatusCode::from_u16(status).expect("valid status code"), body));
        self
    }

    /// Script the next reply for `GET /v1/actions/{id}`.
    #[must_use]
    pub fn on_status(mut self, status: u16, body: Value) -> Self {
        self.status_replies
            .push_back((StatusCode::from_u16(status).expect("valid status code"), body));
        self
    }

    /// Delay every submit reply, for timeout testing.
    #[must_use]
    pub fn with_submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = Some(delay);
        self
    }

    /// Start the mock server and return a handle to it.
    pub async fn start(self) -> MockHandle {
        let state = Arc::new(ServiceState {
            submit_replies: Mutex::new(self.submit_replies),
            status_replies: Mutex::new(self.status_replies),
            last_submit_reply: Mutex::new(None),
            last_status_reply: Mutex::new(None),
            submit_count: AtomicU32::new(0),
            status_count: AtomicU32::new(0),
            last_submit_body: Mutex::new(None),
            last_submit_headers: Mutex::new(None),
            last_status_headers: Mutex::new(None),
            submit_delay: self.submit_delay,
        });

        let app = Router::new()
            .route("/v1/actions", post(handle_submit))
            .route("/v1/actions/{id}", get(handle_status))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockHandle {
            base_url: format!("http://{addr}"),
            state,
            _task: task,
        }
    }
}

impl Default for MockGovernance {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a running mock service.
pub struct MockHandle {
    /// Base URL to point the client at
    pub base_url: String,
    state: Arc<ServiceState>,
    _task: JoinHandle<()>,
}

impl MockHandle {
    /// Number of submit requests received.
    pub fn submit_count(&self) -> u32 {
        self.state.submit_count.load(Ordering::SeqCst)
    }

    /// Number of status lookups received.
    pub fn status_count(&self) -> u32 {
        self.state.status_count.load(Ordering::SeqCst)
    }

    /// Body of the last submit request.
    pub async fn last_submit_body(&self) -> Option<Value> {
        self.state.last_submit_body.lock().await.clone()
    }

    /// A header from the last submit request.
    pub async fn submit_header(&self, name: &str) -> Option<String> {
        header_value(&self.state.last_submit_headers, name).await
    }

    /// A header from the last status lookup.
    pub async fn status_header(&self, name: &str) -> Option<String> {
        header_value(&self.state.last_status_headers, name).await
    }
}

struct ServiceState {
    submit_replies: Mutex<VecDeque<Reply>>,
    status_replies: Mutex<VecDeque<Reply>>,
    last_submit_reply: Mutex<Option<Reply>>,
    last_status_reply: Mutex<Option<Reply>>,
    submit_count: AtomicU32,
    status_count: AtomicU32,
    last_submit_body: Mutex<Option<Value>>,
    last_submit_headers: Mutex<Option<HeaderMap>>,
    last_status_headers: Mutex<Option<HeaderMap>>,
    submit_delay: Option<Duration>,
}

async fn header_value(headers: &Mutex<Option<HeaderMap>>, name: &str) -> Option<String> {
    headers
        .lock()
        .await
        .as_ref()
        .and_then(|map| map.get(name))
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

async fn next_reply(
    queue: &Mutex<VecDeque<Reply>>,
    last: &Mutex<Option<Reply>>,
    fallback: Reply,
) -> Reply {
    if let Some(reply) = queue.lock().await.pop_front() {
        *last.lock().await = Some(reply.clone());
        return reply;
    }
    last.lock().await.clone().unwrap_or(fallback)
}

async fn handle_submit(
    State(state): State<Arc<ServiceState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    state.submit_count.fetch_add(1, Ordering::SeqCst);
    *state.last_submit_body.lock().await = Some(body);
    *state.last_submit_headers.lock().await = Some(headers);

    if let Some(delay) = state.submit_delay {
        tokio::time::sleep(delay).await;
    }

    let (status, reply) = next_reply(
        &state.submit_replies,
        &state.last_submit_reply,
        (StatusCode::OK, json!({"id": "act-default", "status": "allowed"})),
    )
    .await;
    (status, reply.to_string())
}

async fn handle_status(
    State(state): State<Arc<ServiceState>>,
    Path(_action_id): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    state.status_count.fetch_add(1, Ordering::SeqCst);
    *state.last_status_headers.lock().await = Some(headers);

    let (status, reply) = next_reply(
        &state.status_replies,
        &state.last_status_reply,
        (StatusCode::OK, json!({"status": "pending"})),
    )
    .await;
    (status, reply.to_string())
}
