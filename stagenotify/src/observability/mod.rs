//! Logging integration for the notifier.
//!
//! The crate itself only emits `tracing` events; hosts that do not bring
//! their own subscriber can call [`init_logging`].

mod logging;

pub use logging::{build_filter, init_logging};
