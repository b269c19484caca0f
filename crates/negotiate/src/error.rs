use glinfo_common::{ApiError, ApiFamily, GlVersion};

use crate::engine::EglVersion;

/// A failed negotiation step. Each variant names the step and carries the
/// underlying EGL error where EGL reported one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NegotiationError {
    #[error("no EGL display available for the native display: {0}")]
    DisplayUnavailable(ApiError),
    #[error("eglInitialize failed: {0}")]
    InitializationFailed(ApiError),
    #[error("EGL {0} is too old, version 1.5 or newer is required")]
    UnsupportedVersion(EglVersion),
    #[error("eglBindAPI({family}) failed: {error}")]
    ApiBindFailed { family: ApiFamily, error: ApiError },
    #[error("{family} major version {major} is not supported")]
    UnsupportedMajorVersion { family: ApiFamily, major: i32 },
    #[error("no EGL config matches the requested attributes{}", error_suffix(.0))]
    NoMatchingConfig(Option<ApiError>),
    #[error("eglCreateContext for {family} {requested} failed: {error}")]
    ContextCreationFailed {
        family: ApiFamily,
        requested: GlVersion,
        error: ApiError,
    },
    #[error("eglCreateWindowSurface failed: {0}")]
    SurfaceCreationFailed(ApiError),
    #[error("eglMakeCurrent failed: {0}")]
    MakeCurrentFailed(ApiError),
}

fn error_suffix(error: &Option<ApiError>) -> String {
    error.as_ref().map(|e| format!(": {e}")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glinfo_common::consts::egl;

    #[test]
    fn messages_name_the_failed_step() {
        let err = NegotiationError::InitializationFailed(ApiError::egl(egl::NOT_INITIALIZED));
        assert_eq!(
            err.to_string(),
            "eglInitialize failed: 0x3001 (EGL_NOT_INITIALIZED)"
        );

        let err = NegotiationError::UnsupportedVersion(EglVersion::new(1, 4));
        assert_eq!(
            err.to_string(),
            "EGL 1.4 is too old, version 1.5 or newer is required"
        );
    }

    #[test]
    fn no_matching_config_with_and_without_code() {
        assert_eq!(
            NegotiationError::NoMatchingConfig(None).to_string(),
            "no EGL config matches the requested attributes"
        );
        assert_eq!(
            NegotiationError::NoMatchingConfig(Some(ApiError::egl(egl::BAD_ATTRIBUTE)))
                .to_string(),
            "no EGL config matches the requested attributes: 0x3004 (EGL_BAD_ATTRIBUTE)"
        );
    }
}
