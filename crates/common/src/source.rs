use crate::error::ErrorDomain;

/// A service answering named string queries, with a consume-on-read error
/// register.
///
/// Implemented by the EGL display abstraction and by the GL context. Callers
/// must call [`take_error`](Self::take_error) directly after a failed query
/// and before any other call on the same source, or the code is lost.
pub trait CapabilitySource {
    /// Register the codes returned by `take_error` belong to.
    fn domain(&self) -> ErrorDomain;

    /// Look up the string named `key`. `None` when the runtime returned null.
    fn query_string(&self, key: u32) -> Option<String>;

    /// Read and clear the pending error code.
    fn take_error(&self) -> u32;
}

/// Integer attributes of the live context, such as its granted version.
pub trait AttributeSource: CapabilitySource {
    fn query_attribute(&self, key: u32) -> Option<i32>;
}
