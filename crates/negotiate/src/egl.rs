use std::ffi::c_void;

pub type EglInt = i32;
pub type EglEnum = u32;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name(usize);

        impl $name {
            /// The null handle.
            pub const NONE: Self = Self(0);

            pub const fn from_raw(raw: usize) -> Self {
                Self(raw)
            }

            pub const fn raw(self) -> usize {
                self.0
            }

            pub fn from_ptr<T>(ptr: *mut T) -> Self {
                Self(ptr as usize)
            }

            pub fn as_ptr(self) -> *mut c_void {
                self.0 as *mut c_void
            }

            pub fn is_none(self) -> bool {
                self.0 == 0
            }
        }
    };
}

handle!(
    /// `EGLDisplay`.
    EglDisplay
);
handle!(
    /// `EGLConfig`.
    EglConfig
);
handle!(
    /// `EGLContext`.
    EglContext
);
handle!(
    /// `EGLSurface`.
    EglSurface
);
handle!(
    /// Native display pointer handed to EGL (`wl_display *`).
    NativeDisplay
);
handle!(
    /// Native window pointer handed to EGL (`wl_egl_window *`).
    NativeWindow
);

/// The subset of EGL the engine and session drive.
///
/// Methods mirror the C entry points one to one, with EGL's boolean results
/// kept as `bool`/`Option`. The error register behind [`get_error`] is
/// consume-on-read.
///
/// [`get_error`]: EglApi::get_error
pub trait EglApi {
    /// `eglGetError`: read and clear the calling thread's error code.
    fn get_error(&self) -> EglInt;

    /// `eglQueryString`. `EglDisplay::NONE` queries client extensions.
    fn query_string(&self, display: EglDisplay, name: EglInt) -> Option<String>;

    /// `eglGetDisplay`.
    fn get_display(&self, native: NativeDisplay) -> EglDisplay;

    /// `eglGetPlatformDisplayEXT`. `None` when the entry point cannot be
    /// resolved at all.
    fn get_platform_display_ext(
        &self,
        platform: EglEnum,
        native: NativeDisplay,
    ) -> Option<EglDisplay>;

    /// `eglInitialize`, returning the major/minor version on success.
    fn initialize(&self, display: EglDisplay) -> Option<(EglInt, EglInt)>;

    /// `eglTerminate`.
    fn terminate(&self, display: EglDisplay) -> bool;

    /// `eglBindAPI`.
    fn bind_api(&self, api: EglEnum) -> bool;

    /// `eglChooseConfig` with room for `capacity` configs. `None` when the
    /// call itself failed.
    fn choose_config(
        &self,
        display: EglDisplay,
        attribs: &[EglInt],
        capacity: usize,
    ) -> Option<Vec<EglConfig>>;

    /// `eglCreateContext`. Returns `EglContext::NONE` on failure.
    fn create_context(
        &self,
        display: EglDisplay,
        config: EglConfig,
        share: EglContext,
        attribs: &[EglInt],
    ) -> EglContext;

    /// `eglDestroyContext`.
    fn destroy_context(&self, display: EglDisplay, context: EglContext) -> bool;

    /// `eglCreateWindowSurface`. Returns `EglSurface::NONE` on failure.
    fn create_window_surface(
        &self,
        display: EglDisplay,
        config: EglConfig,
        window: NativeWindow,
        attribs: &[EglInt],
    ) -> EglSurface;

    /// `eglDestroySurface`.
    fn destroy_surface(&self, display: EglDisplay, surface: EglSurface) -> bool;

    /// `eglMakeCurrent`.
    fn make_current(
        &self,
        display: EglDisplay,
        draw: EglSurface,
        read: EglSurface,
        context: EglContext,
    ) -> bool;
}
