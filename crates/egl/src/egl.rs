use std::cell::OnceCell;
use std::ffi::{CStr, CString, c_char, c_void};
use std::ptr;

use glinfo_negotiate::{
    EglApi, EglConfig, EglContext, EglDisplay, EglEnum, EglInt, EglSurface, NativeDisplay,
    NativeWindow,
};
use libloading::Library;
use tracing::debug;

use crate::library::{LoadError, symbol};

type EglBoolean = u32;
type Handle = *mut c_void;

type GetErrorFn = unsafe extern "C" fn() -> EglInt;
type QueryStringFn = unsafe extern "C" fn(Handle, EglInt) -> *const c_char;
type GetDisplayFn = unsafe extern "C" fn(Handle) -> Handle;
type GetPlatformDisplayExtFn = unsafe extern "C" fn(EglEnum, Handle, *const EglInt) -> Handle;
type InitializeFn = unsafe extern "C" fn(Handle, *mut EglInt, *mut EglInt) -> EglBoolean;
type TerminateFn = unsafe extern "C" fn(Handle) -> EglBoolean;
type BindApiFn = unsafe extern "C" fn(EglEnum) -> EglBoolean;
type ChooseConfigFn =
    unsafe extern "C" fn(Handle, *const EglInt, *mut Handle, EglInt, *mut EglInt) -> EglBoolean;
type CreateContextFn = unsafe extern "C" fn(Handle, Handle, Handle, *const EglInt) -> Handle;
type DestroyFn = unsafe extern "C" fn(Handle, Handle) -> EglBoolean;
type CreateWindowSurfaceFn = unsafe extern "C" fn(Handle, Handle, Handle, *const EglInt) -> Handle;
type MakeCurrentFn = unsafe extern "C" fn(Handle, Handle, Handle, Handle) -> EglBoolean;
type GetProcAddressFn = unsafe extern "C" fn(*const c_char) -> *const c_void;

/// A loaded `libEGL` with its core entry points resolved.
///
/// Function pointers are copied out of the library at load time; the
/// library handle is held for as long as the struct lives so they stay
/// valid.
pub struct Egl {
    path: String,
    get_error: GetErrorFn,
    query_string: QueryStringFn,
    get_display: GetDisplayFn,
    initialize: InitializeFn,
    terminate: TerminateFn,
    bind_api: BindApiFn,
    choose_config: ChooseConfigFn,
    create_context: CreateContextFn,
    destroy_context: DestroyFn,
    create_window_surface: CreateWindowSurfaceFn,
    destroy_surface: DestroyFn,
    make_current: MakeCurrentFn,
    get_proc_address: GetProcAddressFn,
    platform_display_ext: OnceCell<Option<GetPlatformDisplayExtFn>>,
    _library: Library,
}

impl Egl {
    pub(crate) fn from_library(library: Library, path: &str) -> Result<Self, LoadError> {
        Ok(Self {
            path: path.to_string(),
            get_error: symbol(&library, path, "eglGetError")?,
            query_string: symbol(&library, path, "eglQueryString")?,
            get_display: symbol(&library, path, "eglGetDisplay")?,
            initialize: symbol(&library, path, "eglInitialize")?,
            terminate: symbol(&library, path, "eglTerminate")?,
            bind_api: symbol(&library, path, "eglBindAPI")?,
            choose_config: symbol(&library, path, "eglChooseConfig")?,
            create_context: symbol(&library, path, "eglCreateContext")?,
            destroy_context: symbol(&library, path, "eglDestroyContext")?,
            create_window_surface: symbol(&library, path, "eglCreateWindowSurface")?,
            destroy_surface: symbol(&library, path, "eglDestroySurface")?,
            make_current: symbol(&library, path, "eglMakeCurrent")?,
            get_proc_address: symbol(&library, path, "eglGetProcAddress")?,
            platform_display_ext: OnceCell::new(),
            _library: library,
        })
    }

    /// Path or soname the library was opened from.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// `eglGetProcAddress`. `None` for names that are not valid C strings or
    /// that the implementation does not know.
    pub fn proc_address(&self, name: &str) -> Option<*const c_void> {
        let name = CString::new(name).ok()?;
        // SAFETY: `name` is NUL-terminated and outlives the call.
        let address = unsafe { (self.get_proc_address)(name.as_ptr()) };
        (!address.is_null()).then_some(address)
    }

    /// Resolve `name` through `eglGetProcAddress` as a function pointer of
    /// type `T`.
    ///
    /// # Safety
    ///
    /// `T` must be an `unsafe extern "C" fn` type matching the C prototype
    /// of `name`.
    pub unsafe fn proc<T: Copy>(&self, name: &str) -> Option<T> {
        debug_assert_eq!(size_of::<T>(), size_of::<*const c_void>());
        let address = self.proc_address(name)?;
        // SAFETY: `T` is a function pointer type per the caller contract.
        Some(unsafe { std::mem::transmute_copy::<*const c_void, T>(&address) })
    }

    fn platform_display_ext(&self) -> Option<GetPlatformDisplayExtFn> {
        *self.platform_display_ext.get_or_init(|| {
            // SAFETY: prototype from EGL_EXT_platform_base.
            let resolved =
                unsafe { self.proc::<GetPlatformDisplayExtFn>("eglGetPlatformDisplayEXT") };
            debug!(resolved = resolved.is_some(), "eglGetPlatformDisplayEXT");
            resolved
        })
    }
}

impl std::fmt::Debug for Egl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Egl").field("path", &self.path).finish_non_exhaustive()
    }
}

fn truthy(value: EglBoolean) -> bool {
    value != 0
}

fn terminated(attribs: &[EglInt]) -> bool {
    attribs.last() == Some(&glinfo_common::consts::egl::NONE)
}

// Every call below passes handles that came out of this same library, and
// attribute lists that end in EGL_NONE.
impl EglApi for Egl {
    fn get_error(&self) -> EglInt {
        // SAFETY: no arguments.
        unsafe { (self.get_error)() }
    }

    fn query_string(&self, display: EglDisplay, name: EglInt) -> Option<String> {
        // SAFETY: `display` is NONE or a display from `get_display`.
        let raw = unsafe { (self.query_string)(display.as_ptr(), name) };
        if raw.is_null() {
            return None;
        }
        // SAFETY: EGL returns a static NUL-terminated string on success.
        Some(unsafe { CStr::from_ptr(raw) }.to_string_lossy().into_owned())
    }

    fn get_display(&self, native: NativeDisplay) -> EglDisplay {
        // SAFETY: `native` is a live `wl_display *` or NONE.
        EglDisplay::from_ptr(unsafe { (self.get_display)(native.as_ptr()) })
    }

    fn get_platform_display_ext(
        &self,
        platform: EglEnum,
        native: NativeDisplay,
    ) -> Option<EglDisplay> {
        let entry = self.platform_display_ext()?;
        // SAFETY: a null attribute list is permitted by EGL_EXT_platform_base.
        let display = unsafe { entry(platform, native.as_ptr(), ptr::null()) };
        Some(EglDisplay::from_ptr(display))
    }

    fn initialize(&self, display: EglDisplay) -> Option<(EglInt, EglInt)> {
        let (mut major, mut minor) = (0, 0);
        // SAFETY: both out-pointers are valid for writes.
        let ok = unsafe { (self.initialize)(display.as_ptr(), &mut major, &mut minor) };
        truthy(ok).then_some((major, minor))
    }

    fn terminate(&self, display: EglDisplay) -> bool {
        // SAFETY: see impl note.
        truthy(unsafe { (self.terminate)(display.as_ptr()) })
    }

    fn bind_api(&self, api: EglEnum) -> bool {
        // SAFETY: plain enum argument.
        truthy(unsafe { (self.bind_api)(api) })
    }

    fn choose_config(
        &self,
        display: EglDisplay,
        attribs: &[EglInt],
        capacity: usize,
    ) -> Option<Vec<EglConfig>> {
        debug_assert!(terminated(attribs));
        let mut configs: Vec<Handle> = vec![ptr::null_mut(); capacity];
        let size = EglInt::try_from(capacity).unwrap_or(EglInt::MAX);
        let mut count: EglInt = 0;
        // SAFETY: `configs` has room for `size` entries and `count` is
        // writable.
        let ok = unsafe {
            (self.choose_config)(
                display.as_ptr(),
                attribs.as_ptr(),
                configs.as_mut_ptr(),
                size,
                &mut count,
            )
        };
        if !truthy(ok) {
            return None;
        }
        configs.truncate(usize::try_from(count).unwrap_or(0));
        Some(configs.into_iter().map(EglConfig::from_ptr).collect())
    }

    fn create_context(
        &self,
        display: EglDisplay,
        config: EglConfig,
        share: EglContext,
        attribs: &[EglInt],
    ) -> EglContext {
        debug_assert!(terminated(attribs));
        // SAFETY: see impl note.
        let context = unsafe {
            (self.create_context)(
                display.as_ptr(),
                config.as_ptr(),
                share.as_ptr(),
                attribs.as_ptr(),
            )
        };
        EglContext::from_ptr(context)
    }

    fn destroy_context(&self, display: EglDisplay, context: EglContext) -> bool {
        // SAFETY: see impl note.
        truthy(unsafe { (self.destroy_context)(display.as_ptr(), context.as_ptr()) })
    }

    fn create_window_surface(
        &self,
        display: EglDisplay,
        config: EglConfig,
        window: NativeWindow,
        attribs: &[EglInt],
    ) -> EglSurface {
        debug_assert!(terminated(attribs));
        // SAFETY: `window` is a live `wl_egl_window *` owned by the platform.
        let surface = unsafe {
            (self.create_window_surface)(
                display.as_ptr(),
                config.as_ptr(),
                window.as_ptr(),
                attribs.as_ptr(),
            )
        };
        EglSurface::from_ptr(surface)
    }

    fn destroy_surface(&self, display: EglDisplay, surface: EglSurface) -> bool {
        // SAFETY: see impl note.
        truthy(unsafe { (self.destroy_surface)(display.as_ptr(), surface.as_ptr()) })
    }

    fn make_current(
        &self,
        display: EglDisplay,
        draw: EglSurface,
        read: EglSurface,
        context: EglContext,
    ) -> bool {
        // SAFETY: NONE for all three releases the current context.
        truthy(unsafe {
            (self.make_current)(
                display.as_ptr(),
                draw.as_ptr(),
                read.as_ptr(),
                context.as_ptr(),
            )
        })
    }
}
