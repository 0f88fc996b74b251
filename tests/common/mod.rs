//! Stub remote endpoint shared by the integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::Json;
use tokio::sync::Notify;

#[derive(Debug, Clone)]
pub struct Captured {
    pub path: String,
    pub user_agent: Option<String>,
    pub body: serde_json::Value,
}

#[derive(Default)]
pub struct Recorder {
    captured: Mutex<Vec<Captured>>,
    pub notify: Notify,
}

impl Recorder {
    pub fn captured(&self) -> Vec<Captured> {
        self.captured.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.captured.lock().unwrap().len()
    }

    /// Resolves once at least `n` requests arrived
    pub async fn wait_for(&self, n: usize) {
        while self.count() < n {
            self.notify.notified().await;
        }
    }
}

async fn capture(
    State(recorder): State<Arc<Recorder>>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> StatusCode {
    let path = uri.path().to_string();
    let forbidden = path.contains("forbidden");

    recorder.captured.lock().unwrap().push(Captured {
        path,
        user_agent: headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    recorder.notify.notify_one();

    if forbidden {
        StatusCode::FORBIDDEN
    } else {
        StatusCode::OK
    }
}

/// Serve a stub answering 403 for paths containing "forbidden", 200 otherwise
pub async fn spawn_stub() -> (SocketAddr, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let router = Router::new()
        .fallback(capture)
        .with_state(Arc::clone(&recorder));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (address, recorder)
}

/// A port nothing is listening on right now
pub fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}
