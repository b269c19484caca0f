//! Session Controller: owns the platform connection, display, context and
//! surface for one run and sequences negotiation, reporting and teardown.
//!
//! # Invariants
//! - Teardown runs in reverse acquisition order: surface, native window,
//!   context, display, platform connection.
//! - Teardown is safe to repeat and safe with nothing acquired.
//! - Exit status is 0 only when the report was produced.

mod collect;
mod controller;
mod platform;

pub use collect::collect_report;
pub use controller::{
    ContextRequest, Session, SessionError, SessionState, WINDOW_HEIGHT, WINDOW_WIDTH,
};
pub use platform::{Platform, PlatformError};
