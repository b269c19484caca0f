//! Shared vocabulary: versions, API families, EGL/GL enums and the query traits
//! that both the display and rendering abstractions implement.
//!
//! # Invariants
//! - Error codes are never dropped: every failed query carries its raw code.
//! - Error registers are consume-on-read; readers must take the code
//!   immediately after the failing call.

pub mod consts;
pub mod error;
pub mod source;
pub mod types;

pub use error::{ApiError, ErrorDomain};
pub use source::{AttributeSource, CapabilitySource};
pub use types::{ApiFamily, GlVersion, ParseVersionError};
