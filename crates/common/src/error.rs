use std::fmt;

use crate::consts::{egl, gl};

/// Which error register a code was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorDomain {
    Egl,
    Gl,
}

impl ErrorDomain {
    /// Prefix used in report lines, e.g. `EGLError=`.
    pub fn label(self) -> &'static str {
        match self {
            ErrorDomain::Egl => "EGL",
            ErrorDomain::Gl => "GL",
        }
    }

    /// Symbolic name of `code`, if it is one this domain defines.
    pub fn error_name(self, code: u32) -> Option<&'static str> {
        match self {
            ErrorDomain::Egl => egl_error_name(code),
            ErrorDomain::Gl => gl_error_name(code),
        }
    }
}

/// A raw error code taken from an EGL or GL error register.
///
/// Renders as `0x3008 (EGL_BAD_DISPLAY)`; unknown codes keep their numeric
/// form and read `(Unknown error)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ApiError {
    pub domain: ErrorDomain,
    pub code: u32,
}

impl ApiError {
    pub fn egl(code: i32) -> Self {
        Self {
            domain: ErrorDomain::Egl,
            code: code as u32,
        }
    }

    pub fn gl(code: u32) -> Self {
        Self {
            domain: ErrorDomain::Gl,
            code,
        }
    }

    pub fn name(&self) -> Option<&'static str> {
        self.domain.error_name(self.code)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:#06x} ({})",
            self.code,
            self.name().unwrap_or("Unknown error")
        )
    }
}

fn egl_error_name(code: u32) -> Option<&'static str> {
    let name = match i32::try_from(code).ok()? {
        egl::SUCCESS => "EGL_SUCCESS",
        egl::NOT_INITIALIZED => "EGL_NOT_INITIALIZED",
        egl::BAD_ACCESS => "EGL_BAD_ACCESS",
        egl::BAD_ALLOC => "EGL_BAD_ALLOC",
        egl::BAD_ATTRIBUTE => "EGL_BAD_ATTRIBUTE",
        egl::BAD_CONFIG => "EGL_BAD_CONFIG",
        egl::BAD_CONTEXT => "EGL_BAD_CONTEXT",
        egl::BAD_CURRENT_SURFACE => "EGL_BAD_CURRENT_SURFACE",
        egl::BAD_DISPLAY => "EGL_BAD_DISPLAY",
        egl::BAD_MATCH => "EGL_BAD_MATCH",
        egl::BAD_NATIVE_PIXMAP => "EGL_BAD_NATIVE_PIXMAP",
        egl::BAD_NATIVE_WINDOW => "EGL_BAD_NATIVE_WINDOW",
        egl::BAD_PARAMETER => "EGL_BAD_PARAMETER",
        egl::BAD_SURFACE => "EGL_BAD_SURFACE",
        egl::CONTEXT_LOST => "EGL_CONTEXT_LOST",
        _ => return None,
    };
    Some(name)
}

fn gl_error_name(code: u32) -> Option<&'static str> {
    let name = match code {
        gl::NO_ERROR => "GL_NO_ERROR",
        gl::INVALID_ENUM => "GL_INVALID_ENUM",
        gl::INVALID_VALUE => "GL_INVALID_VALUE",
        gl::INVALID_OPERATION => "GL_INVALID_OPERATION",
        gl::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
        gl::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
        gl::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        gl::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        gl::CONTEXT_LOST => "GL_CONTEXT_LOST",
        _ => return None,
    };
    Some(name)
}
