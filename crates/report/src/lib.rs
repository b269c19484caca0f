//! Capability report: uniform query lines, extension enumeration and the
//! word-wrapped text layout.
//!
//! # Invariants
//! - Every report line is `label = value` or an explicit `(null)` line with
//!   the underlying error code. Nothing is silently omitted.
//! - Extension lists are wrapped by one formatter whatever mechanism
//!   produced them.

mod extensions;
mod query;
mod report;
mod wrap;

pub use extensions::{
    EnumerationPath, ExtensionSet, ExtensionSource, enumerate_extensions, tokenize,
};
pub use query::{QueryStatus, ReportLine, query_attribute, query_string};
pub use report::{CapabilityReport, ReportRenderer, TextRenderer};
pub use wrap::{DEFAULT_INDENT, DEFAULT_MAX_WIDTH, word_wrap};
