use std::fmt;

/// Result of a single send attempt; only ever used to produce a log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Accepted,
    /// The remote answered with a non-2xx status
    Rejected { status: u16 },
    /// No response: connection, TLS or timeout failure
    Failed { error: String },
}

impl SendOutcome {
    /// Classify an HTTP status code
    pub fn from_status(status: u16) -> Self {
        if (200..300).contains(&status) {
            SendOutcome::Accepted
        } else {
            SendOutcome::Rejected { status }
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, SendOutcome::Accepted)
    }
}

impl fmt::Display for SendOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendOutcome::Accepted => f.write_str("accepted"),
            SendOutcome::Rejected { status } => write!(f, "rejected ({status})"),
            SendOutcome::Failed { error } => write!(f, "failed: {error}"),
        }
    }
}
