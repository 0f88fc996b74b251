//! Immutable values shared by the dispatcher and its transports.

mod credential;
mod notification;

pub use credential::{Credential, Destination};
pub use notification::Notification;
