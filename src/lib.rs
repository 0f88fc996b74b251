//! herald
//!
//! Broadcasts a rotating list of messages to a fixed set of destinations
//! with a pool of credentials, while a liveness endpoint answers probes.

use shadow_rs::shadow;
shadow!(build);

pub mod app;
pub mod cli;
pub mod clock;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod liveness;
pub mod logger;
pub mod models;
pub mod transport;

pub use app::{App, Exit};

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}
