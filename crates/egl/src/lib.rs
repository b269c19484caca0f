//! EGL and GL bound at runtime.
//!
//! `libEGL` is opened with `dlopen`; every GL entry point, core or not, is
//! resolved through `eglGetProcAddress`, which EGL 1.5 guarantees for core
//! functions. Nothing links against GL at build time.

mod egl;
mod gl;
mod library;

pub use egl::Egl;
pub use gl::{GlContext, parse_gl_version};
pub use library::{EGL_LIBRARY_ENV, LoadError, load_egl};
