//! HTTP transport backed by `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use serde::Serialize;

use super::Transport;
use crate::config::TransportConfig;
use crate::config::validation::DESTINATION_PLACEHOLDER;
use crate::dispatch::SendOutcome;
use crate::error::{AppError, AppResult};
use crate::models::{Destination, Notification};

/// JSON body of one send
#[derive(Debug, Serialize)]
struct SendPayload<'a> {
    access_token: &'a str,
    message: &'a str,
}

/// POSTs each notification to an endpoint derived from its destination.
///
/// The client is built once and shared by every send, so connections are
/// pooled across destinations.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder()
            .default_headers(Self::headers(config)?)
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .gzip(true)
            .deflate(true);

        if let Some(secs) = config.request_timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder.build().map_err(|e| AppError::Internal {
            source: anyhow::Error::from(e).context("Failed to build HTTP client"),
        })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Identify the client honestly, then add any configured extras
    fn headers(config: &TransportConfig) -> AppResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("herald/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                AppError::configuration("transport.headers", format!("Invalid header name '{name}'"))
            })?;
            let value = HeaderValue::from_str(value).map_err(|_| {
                AppError::configuration("transport.headers", format!("Invalid value for header '{}'", name.as_str()))
            })?;
            headers.insert(name, value);
        }

        Ok(headers)
    }

    /// URL for one destination, percent-encoded so it stays a single segment
    pub fn url_for(&self, destination: &Destination) -> String {
        self.endpoint.replace(
            DESTINATION_PLACEHOLDER,
            &urlencoding::encode(destination.as_str()),
        )
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, notification: &Notification<'_>) -> SendOutcome {
        let payload = SendPayload {
            access_token: notification.credential.expose(),
            message: &notification.text,
        };

        let response = self
            .client
            .post(self.url_for(notification.destination))
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(resp) => SendOutcome::from_status(resp.status().as_u16()),
            Err(e) => SendOutcome::Failed {
                error: e.to_string(),
            },
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
