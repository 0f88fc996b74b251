//! Side-effect reporting for the dispatcher, the responder and the loader.
//!
//! Components receive an [`EventSink`] at construction instead of writing to
//! a global logger. [`TracingSink`] is the production sink and
//! [`MemorySink`] captures events for assertions.

mod sink;

pub use sink::{EventSink, MemorySink, TracingSink};

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::dispatch::SendOutcome;

/// Everything observable about one send attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReport {
    /// Truncated credential, never the full secret
    pub credential_hint: String,
    pub destination: String,
    pub text: String,
    pub outcome: SendOutcome,
    /// Wall-clock stamp in the configured zone
    pub at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A text source could not be read and is treated as absent
    SourceUnreadable { path: PathBuf, error: String },
    /// A value did not parse, the default was substituted
    InvalidValue {
        item: &'static str,
        raw: String,
        fallback: String,
    },
    DispatchStarted {
        messages: usize,
        credentials: usize,
        destinations: usize,
    },
    SendFinished(SendReport),
    PacingPause {
        credential_hint: String,
        delay: Duration,
    },
    CycleCompleted { cycle: u64 },
    /// The message list was empty, nothing was dispatched
    NoMessages,
    DispatchCancelled,
    ResponderListening { address: SocketAddr },
    ProbeAnswered { method: String, path: String },
    ResponderStopped,
}
