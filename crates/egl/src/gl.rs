use std::cell::{Cell, OnceCell};
use std::ffi::{CStr, c_char};

use glinfo_common::consts::{egl, gl};
use glinfo_common::{AttributeSource, CapabilitySource, ErrorDomain, GlVersion};
use glinfo_report::ExtensionSource;
use tracing::debug;

use crate::egl::Egl;
use crate::library::LoadError;

type GetStringFn = unsafe extern "C" fn(u32) -> *const u8;
type GetStringiFn = unsafe extern "C" fn(u32, u32) -> *const u8;
type GetIntegervFn = unsafe extern "C" fn(u32, *mut i32);
type GetErrorFn = unsafe extern "C" fn() -> u32;

/// Query entry points of the GL or GLES context current on this thread.
///
/// Only valid while the context it was loaded for stays current. Errors
/// the adapter reads internally are parked and handed out by the next
/// [`take_error`](CapabilitySource::take_error).
pub struct GlContext<'e> {
    egl: Option<&'e Egl>,
    get_string: GetStringFn,
    get_integerv: GetIntegervFn,
    get_error: GetErrorFn,
    get_stringi: OnceCell<Option<GetStringiFn>>,
    pending: Cell<Option<u32>>,
}

impl<'e> GlContext<'e> {
    /// Resolve the core query functions. Call with a context current.
    pub fn load(egl: &'e Egl) -> Result<Self, LoadError> {
        // SAFETY: prototypes match the GL/GLES headers.
        unsafe {
            Ok(Self {
                egl: Some(egl),
                get_string: resolve(egl, "glGetString")?,
                get_integerv: resolve(egl, "glGetIntegerv")?,
                get_error: resolve(egl, "glGetError")?,
                get_stringi: OnceCell::new(),
                pending: Cell::new(None),
            })
        }
    }

    /// Build over entry points that are already resolved, with
    /// `glGetStringi` fixed up front instead of looked up on first use.
    #[cfg(test)]
    fn from_entry_points(
        get_string: GetStringFn,
        get_integerv: GetIntegervFn,
        get_error: GetErrorFn,
        get_stringi: Option<GetStringiFn>,
    ) -> Self {
        Self {
            egl: None,
            get_string,
            get_integerv,
            get_error,
            get_stringi: OnceCell::from(get_stringi),
            pending: Cell::new(None),
        }
    }

    fn gl_error(&self) -> u32 {
        // SAFETY: no arguments; a context is current.
        unsafe { (self.get_error)() }
    }

    fn integer(&self, key: u32) -> Option<i32> {
        let mut value = -1;
        // SAFETY: single-value keys only; `value` is writable.
        unsafe { (self.get_integerv)(key, &mut value) };
        let error = self.gl_error();
        if error != gl::NO_ERROR {
            self.pending.set(Some(error));
            return None;
        }
        (value >= 0).then_some(value)
    }

    fn string(&self, key: u32) -> Option<String> {
        // SAFETY: a context is current.
        let raw = unsafe { (self.get_string)(key) };
        owned(raw)
    }

    // GL 2.x and GLES 2.0 contexts have no glGetStringi.
    fn get_stringi(&self) -> Option<GetStringiFn> {
        *self.get_stringi.get_or_init(|| {
            // SAFETY: prototype from GL 3.0 / GLES 3.0.
            let resolved = self
                .egl
                .and_then(|egl| unsafe { egl.proc::<GetStringiFn>("glGetStringi") });
            debug!(resolved = resolved.is_some(), "glGetStringi");
            resolved
        })
    }
}

unsafe fn resolve<T: Copy>(egl: &Egl, name: &'static str) -> Result<T, LoadError> {
    // SAFETY: forwarded caller contract.
    unsafe { egl.proc::<T>(name) }.ok_or(LoadError::GlSymbol(name))
}

fn owned(raw: *const u8) -> Option<String> {
    if raw.is_null() {
        return None;
    }
    // SAFETY: GL returns static NUL-terminated strings.
    Some(
        unsafe { CStr::from_ptr(raw as *const c_char) }
            .to_string_lossy()
            .into_owned(),
    )
}

/// Pull `major.minor` out of a `GL_VERSION` string.
///
/// Handles desktop strings (`4.6 (Core Profile) Mesa 24.0`) and the GLES
/// forms (`OpenGL ES 3.2 Mesa`, `OpenGL ES-CM 1.1`).
pub fn parse_gl_version(version: &str) -> Option<GlVersion> {
    let token = version
        .split_whitespace()
        .find(|t| t.starts_with(|c: char| c.is_ascii_digit()))?;
    let mut parts = token.split('.');
    let major = leading_number(parts.next()?)?;
    let minor = parts.next().and_then(leading_number).unwrap_or(0);
    Some(GlVersion::new(major, minor))
}

fn leading_number(part: &str) -> Option<i32> {
    let end = part
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(part.len());
    part[..end].parse().ok()
}

impl CapabilitySource for GlContext<'_> {
    fn domain(&self) -> ErrorDomain {
        ErrorDomain::Gl
    }

    fn query_string(&self, key: u32) -> Option<String> {
        self.string(key)
    }

    fn take_error(&self) -> u32 {
        match self.pending.take() {
            Some(code) => code,
            None => self.gl_error(),
        }
    }
}

impl AttributeSource for GlContext<'_> {
    /// Answers `EGL_CONTEXT_MAJOR_VERSION`/`EGL_CONTEXT_MINOR_VERSION` for
    /// the current context. Contexts before 3.0 reject the integer query,
    /// so `GL_VERSION` is parsed instead.
    ///
    /// When both fail, the integer query's error is parked for
    /// `take_error`, else the string query's. If GL raised neither, nothing
    /// is parked and `take_error` reads the live register, which then
    /// reports `GL_NO_ERROR`.
    fn query_attribute(&self, key: u32) -> Option<i32> {
        let (integer_key, pick): (u32, fn(GlVersion) -> i32) = match key as i32 {
            egl::CONTEXT_MAJOR_VERSION => (gl::MAJOR_VERSION, |v| v.major),
            egl::CONTEXT_MINOR_VERSION => (gl::MINOR_VERSION, |v| v.minor),
            _ => {
                // What glGetIntegerv raises for an unknown name.
                self.pending.set(Some(gl::INVALID_ENUM));
                return None;
            }
        };

        if let Some(value) = self.integer(integer_key) {
            return Some(value);
        }
        let integer_error = self.pending.take();

        let version = self.string(gl::VERSION);
        let string_error = match version {
            Some(_) => None,
            None => Some(self.gl_error()).filter(|&code| code != gl::NO_ERROR),
        };
        if let Some(parsed) = version.as_deref().and_then(parse_gl_version) {
            return Some(pick(parsed));
        }

        self.pending.set(integer_error.or(string_error));
        None
    }
}

impl ExtensionSource for GlContext<'_> {
    fn bulk_extensions(&self) -> Option<String> {
        let bulk = self.string(gl::EXTENSIONS);
        if bulk.is_none() {
            // Core profiles reject GL_EXTENSIONS; drop the INVALID_ENUM.
            let error = self.gl_error();
            debug!(error = format_args!("{error:#06x}"), "GL_EXTENSIONS string unavailable");
        }
        bulk
    }

    fn extension_count(&self) -> Option<usize> {
        self.get_stringi()?;
        let count = self.integer(gl::NUM_EXTENSIONS);
        if count.is_none() {
            self.pending.take();
        }
        count.and_then(|n| usize::try_from(n).ok())
    }

    fn extension_at(&self, index: usize) -> Option<String> {
        let get_stringi = self.get_stringi()?;
        let index = u32::try_from(index).ok()?;
        // SAFETY: `index` is below GL_NUM_EXTENSIONS.
        let raw = unsafe { get_stringi(gl::EXTENSIONS, index) };
        let name = owned(raw);
        if name.is_none() {
            self.gl_error();
        }
        name
    }
}
