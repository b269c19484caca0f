use glinfo_negotiate::{NativeDisplay, NativeWindow};

/// Errors from the windowing-service collaborator.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("failed to connect to the Wayland display: {0}")]
    Connect(String),
    #[error("Wayland registry round-trip failed: {0}")]
    Roundtrip(String),
    #[error("compositor does not advertise {0}")]
    MissingGlobal(&'static str),
    #[error("failed to create native window: {0}")]
    Window(String),
}

/// A live connection to the windowing service.
///
/// `destroy_window` and `disconnect` must be no-ops when there is nothing to
/// release.
pub trait Platform {
    /// Pointer EGL binds its display to.
    fn native_display(&self) -> NativeDisplay;

    /// Create the surface object EGL draws into.
    fn create_window(&mut self, width: i32, height: i32) -> Result<NativeWindow, PlatformError>;

    fn destroy_window(&mut self);

    fn disconnect(&mut self);
}
