//! Test helpers
//!
//! [`CannedServer`] is a local HTTP endpoint that answers requests from a
//! fixed script, in order, and records what it received. Providers are
//! pointed at it through `ProviderOptions::api_endpoint`.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri, header};
use axum::response::IntoResponse;
use serde_json::Value;
use tokio::net::TcpListener;

use crate::types::ProviderOptions;

/// One request as seen by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<Value>,
}

impl Recorded {
    /// `"METHOD /path"`, for comparing request sequences.
    pub fn line(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

#[derive(Default)]
struct Script {
    replies: VecDeque<(u16, Value)>,
    received: Vec<Recorded>,
}

pub struct CannedServer {
    url: String,
    script: Arc<Mutex<Script>>,
}

impl CannedServer {
    /// Serve `replies` in order. `Value::Null` is sent as an empty body; an
    /// unscripted request gets a 500.
    pub async fn start(replies: Vec<(u16, Value)>) -> Self {
        let script = Arc::new(Mutex::new(Script {
            replies: replies.into(),
            received: Vec::new(),
        }));
        let app = Router::new()
            .fallback(respond)
            .with_state(Arc::clone(&script));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            url: format!("http://{addr}"),
            script,
        }
    }

    /// Options pointing a provider at this server.
    pub fn options(&self, ttl: Option<u32>) -> ProviderOptions {
        ProviderOptions {
            api_endpoint: Some(self.url.clone()),
            ttl,
            ..ProviderOptions::default()
        }
    }

    /// Everything received so far.
    pub fn received(&self) -> Vec<Recorded> {
        self.script.lock().unwrap().received.clone()
    }

    /// Received requests as `"METHOD /path"` lines.
    pub fn lines(&self) -> Vec<String> {
        self.received().iter().map(Recorded::line).collect()
    }

    /// Whether every scripted reply has been used.
    pub fn exhausted(&self) -> bool {
        self.script.lock().unwrap().replies.is_empty()
    }
}

async fn respond(
    State(script): State<Arc<Mutex<Script>>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> impl IntoResponse {
    let (status, reply) = {
        let mut script = script.lock().unwrap();
        script.received.push(Recorded {
            method: method.to_string(),
            path: uri.path().to_string(),
            query: uri.query().map(ToString::to_string),
            body: serde_json::from_slice(&body).ok(),
        });
        script
            .replies
            .pop_front()
            .unwrap_or((500, serde_json::json!({"error": "unexpected request"})))
    };

    let text = if reply.is_null() {
        String::new()
    } else {
        reply.to_string()
    };
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        [(header::CONTENT_TYPE, "application/json")],
        text,
    )
}
