use std::fmt;
use std::sync::Arc;

/// Number of leading characters of a credential that may appear in logs
const HINT_CHARS: usize = 6;

/// An opaque bearer token authenticating one outbound send.
///
/// `Debug` never prints the secret; use [`Credential::hint`] for log lines
/// and [`Credential::expose`] only when building a request.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credential(Arc<str>);

impl Credential {
    /// Returns `None` for blank input
    pub fn new(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        (!raw.is_empty()).then(|| Self(Arc::from(raw)))
    }

    /// First characters of the token followed by `...`
    pub fn hint(&self) -> String {
        let prefix: String = self.0.chars().take(HINT_CHARS).collect();
        format!("{prefix}...")
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&self.hint()).finish()
    }
}

/// An opaque identifier naming one remote conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Destination(Arc<str>);

impl Destination {
    /// Returns `None` for blank input
    pub fn new(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        (!raw.is_empty()).then(|| Self(Arc::from(raw)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
