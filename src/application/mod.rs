//! # Application Layer
//!
//! Contains the core logic of the bridge: timeline sync and ordering, digest rendering,
//! command dispatch, background polling, and logging setup.

pub mod digest_formatter;
pub mod logging;
pub mod ordering;
pub mod parsing;
pub mod poller;
pub mod router;
pub mod sync;
