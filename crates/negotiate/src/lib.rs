//! Negotiation Engine: binds a native display to EGL and creates a context
//! for the requested client API version.
//!
//! # Invariants
//! - Every failure is typed and terminal for the attempt; nothing is retried.
//! - The extended platform path degrades silently to the generic path.
//! - The granted context version is never assumed to equal the request.
//! - A failed display acquisition leaves no initialized display behind.

mod display;
mod egl;
mod engine;
mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use display::DisplayStrings;
pub use egl::{
    EglApi, EglConfig, EglContext, EglDisplay, EglEnum, EglInt, EglSurface, NativeDisplay,
    NativeWindow,
};
pub use engine::{
    ConfigSelection, ContextHandle, DisplayBinding, EglVersion, MIN_EGL_VERSION, Negotiator,
    PlatformPath, renderable_bit,
};
pub use error::NegotiationError;
