//! Broadcast dispatch loop
//!
//! [`Dispatcher`] walks messages × credentials × destinations forever,
//! pausing after each credential's destination sweep. [`Cursor`] keeps the
//! three indices and tells the dispatcher where the pacing and cycle
//! boundaries fall.

pub mod cursor;
pub mod dispatcher;
pub mod outcome;

pub use cursor::{Cursor, Position, Step};
pub use dispatcher::{DispatchExit, Dispatcher};
pub use outcome::SendOutcome;
