//! Outbound send transports.

mod http;

pub use http::HttpTransport;

use async_trait::async_trait;

use crate::dispatch::SendOutcome;
use crate::models::Notification;

/// Sends one notification and classifies the result.
///
/// Implementations never fail: a transport error becomes
/// [`SendOutcome::Failed`] so the dispatcher can log it and move on.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, notification: &Notification<'_>) -> SendOutcome;

    /// Transport name for logging
    fn name(&self) -> &'static str;
}
