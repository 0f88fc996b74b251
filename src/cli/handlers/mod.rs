//! Command handlers for CLI operations

pub mod check;

pub use check::CheckCommandHandler;
