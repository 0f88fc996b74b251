//! Liveness responder
//!
//! Answers every request, whatever the method or path, with `200 OK` and a
//! fixed plain text body. It says nothing about dispatcher health: a
//! response only proves the process and its network stack are up.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri, header};
use axum::response::IntoResponse;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::error::{AppError, AppResult};
use crate::events::{Event, EventSink};

#[derive(Clone)]
struct ProbeState {
    body: Arc<str>,
    sink: Arc<dyn EventSink>,
}

/// A bound listener, ready to serve
pub struct LivenessResponder {
    listener: TcpListener,
    body: Arc<str>,
    sink: Arc<dyn EventSink>,
}

impl LivenessResponder {
    /// Bind the listening socket.
    ///
    /// Failing here is fatal for the whole process: dispatching must not
    /// start without a working liveness endpoint.
    pub async fn bind(
        address: SocketAddr,
        body: impl Into<Arc<str>>,
        sink: Arc<dyn EventSink>,
    ) -> AppResult<Self> {
        let listener = TcpListener::bind(address)
            .await
            .map_err(|source| AppError::Bind { address, source })?;

        Ok(Self {
            listener,
            body: body.into(),
            sink,
        })
    }

    pub fn local_addr(&self) -> AppResult<SocketAddr> {
        self.listener.local_addr().map_err(|e| AppError::Internal {
            source: anyhow::Error::from(e).context("Failed to read liveness listener address"),
        })
    }

    /// Serve until `shutdown` is cancelled
    pub async fn serve(self, shutdown: CancellationToken) -> AppResult<()> {
        let address = self.local_addr()?;
        let sink = Arc::clone(&self.sink);
        sink.record(&Event::ResponderListening { address });

        let router = router(self.body, Arc::clone(&self.sink));
        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown.cancelled_owned())
            .await
            .map_err(|e| AppError::Internal {
                source: anyhow::Error::from(e).context("Liveness responder failed"),
            })?;

        sink.record(&Event::ResponderStopped);
        Ok(())
    }
}

/// Router answering every route and method with `body`
pub fn router(body: Arc<str>, sink: Arc<dyn EventSink>) -> Router {
    Router::new()
        .fallback(answer)
        .with_state(ProbeState { body, sink })
}

async fn answer(State(state): State<ProbeState>, method: Method, uri: Uri) -> impl IntoResponse {
    state.sink.record(&Event::ProbeAnswered {
        method: method.to_string(),
        path: uri.path().to_string(),
    });

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain")],
        state.body.to_string(),
    )
}
