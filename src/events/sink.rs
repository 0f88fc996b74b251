use std::sync::Mutex;

use super::{Event, SendReport};
use crate::dispatch::SendOutcome;

/// Receives every event a component produces
pub trait EventSink: Send + Sync {
    fn record(&self, event: &Event);
}

/// Forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TracingSink {
    fn send_finished(report: &SendReport) {
        match &report.outcome {
            SendOutcome::Accepted => tracing::info!(
                credential = %report.credential_hint,
                destination = %report.destination,
                text = %report.text,
                at = %report.at,
                "Token {} sent message to {} at {}",
                report.credential_hint,
                report.destination,
                report.at
            ),
            SendOutcome::Rejected { status } => tracing::error!(
                credential = %report.credential_hint,
                destination = %report.destination,
                status = %status,
                at = %report.at,
                "API error for {}: {} at {}",
                report.destination,
                status,
                report.at
            ),
            SendOutcome::Failed { error } => tracing::error!(
                credential = %report.credential_hint,
                destination = %report.destination,
                error = %error,
                at = %report.at,
                "Failed to send message to {}: {} at {}",
                report.destination,
                error,
                report.at
            ),
        }
    }
}

impl EventSink for TracingSink {
    fn record(&self, event: &Event) {
        match event {
            Event::SourceUnreadable { path, error } => {
                tracing::error!(path = %path.display(), error = %error, "Failed to load source");
            }
            Event::InvalidValue { item, raw, fallback } => {
                tracing::error!(
                    item = %item,
                    raw = %raw,
                    fallback = %fallback,
                    "Invalid {} value; defaulting to {}",
                    item,
                    fallback
                );
            }
            Event::DispatchStarted {
                messages,
                credentials,
                destinations,
            } => {
                tracing::info!(
                    messages = %messages,
                    credentials = %credentials,
                    destinations = %destinations,
                    sends_per_cycle = %(messages * credentials * destinations),
                    "Dispatcher starting"
                );
            }
            Event::SendFinished(report) => Self::send_finished(report),
            Event::PacingPause {
                credential_hint,
                delay,
            } => {
                tracing::debug!(
                    credential = %credential_hint,
                    delay_secs = %delay.as_secs(),
                    "Credential sweep finished, pausing"
                );
            }
            Event::CycleCompleted { cycle } => {
                tracing::info!(cycle = %cycle, "Cycle completed, restarting from the first message");
            }
            Event::NoMessages => tracing::error!("No messages found."),
            Event::DispatchCancelled => tracing::info!("Dispatcher stopped"),
            Event::ResponderListening { address } => {
                tracing::info!(address = %address, "Liveness responder listening");
            }
            Event::ProbeAnswered { method, path } => {
                tracing::debug!(method = %method, path = %path, "Liveness probe answered");
            }
            Event::ResponderStopped => tracing::info!("Liveness responder stopped"),
        }
    }
}

/// Keeps events in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Event>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Only the send reports, in order
    pub fn reports(&self) -> Vec<SendReport> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::SendFinished(report) => Some(report),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for MemorySink {
    fn record(&self, event: &Event) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
