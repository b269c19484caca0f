//! Scriptable in-memory [`EglApi`] for tests.
//!
//! Every call is recorded. Failures are switched on per entry point with the
//! `fail_*` builders and set the error code real EGL would report.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use glinfo_common::consts::egl;

use crate::egl::{
    EglApi, EglConfig, EglContext, EglDisplay, EglEnum, EglInt, EglSurface, NativeDisplay,
    NativeWindow,
};

/// Entry points recorded by [`MockEgl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EglCall {
    GetError,
    QueryString,
    GetDisplay,
    GetPlatformDisplayExt,
    Initialize,
    Terminate,
    BindApi,
    ChooseConfig,
    CreateContext,
    DestroyContext,
    CreateWindowSurface,
    DestroySurface,
    MakeCurrent,
}

const DISPLAY: EglDisplay = EglDisplay::from_raw(0x1);
const PLATFORM_DISPLAY: EglDisplay = EglDisplay::from_raw(0x2);
const CONTEXT: EglContext = EglContext::from_raw(0xc0);
const SURFACE: EglSurface = EglSurface::from_raw(0x5f);

#[derive(Debug, Default, Clone, Copy)]
struct Failures {
    get_display: bool,
    platform_display: bool,
    initialize: bool,
    bind_api: bool,
    choose_config: bool,
    create_context: bool,
    create_surface: bool,
    make_current: bool,
}

#[derive(Debug)]
pub struct MockEgl {
    client_extensions: Option<String>,
    display_strings: HashMap<EglInt, String>,
    version: (EglInt, EglInt),
    config_count: usize,
    failures: Failures,
    pending_error: Cell<EglInt>,
    calls: RefCell<Vec<EglCall>>,
    bound_api: Cell<Option<EglEnum>>,
    config_attribs: RefCell<Vec<EglInt>>,
    context_attribs: RefCell<Vec<EglInt>>,
}

impl Default for MockEgl {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEgl {
    /// EGL 1.5 with no platform extensions and one matching config.
    pub fn new() -> Self {
        let display_strings = [
            (egl::VERSION, "1.5 Mock"),
            (egl::VENDOR, "Mock Vendor"),
            (egl::EXTENSIONS, "EGL_KHR_create_context EGL_KHR_surfaceless_context"),
            (egl::CLIENT_APIS, "OpenGL OpenGL_ES"),
        ]
        .into_iter()
        .map(|(k, v)| (k, v.to_string()))
        .collect();

        Self {
            client_extensions: Some("EGL_EXT_client_extensions".into()),
            display_strings,
            version: (1, 5),
            config_count: 1,
            failures: Failures::default(),
            pending_error: Cell::new(egl::SUCCESS),
            calls: RefCell::new(Vec::new()),
            bound_api: Cell::new(None),
            config_attribs: RefCell::new(Vec::new()),
            context_attribs: RefCell::new(Vec::new()),
        }
    }

    pub fn with_client_extensions(mut self, list: &str) -> Self {
        self.client_extensions = Some(list.to_string());
        self
    }

    pub fn without_client_extensions(mut self) -> Self {
        self.client_extensions = None;
        self
    }

    pub fn with_version(mut self, major: EglInt, minor: EglInt) -> Self {
        self.version = (major, minor);
        self
    }

    pub fn with_config_count(mut self, count: usize) -> Self {
        self.config_count = count;
        self
    }

    /// Set or, with `None`, remove a display string.
    pub fn with_display_string(mut self, name: EglInt, value: Option<&str>) -> Self {
        match value {
            Some(value) => {
                self.display_strings.insert(name, value.to_string());
            }
            None => {
                self.display_strings.remove(&name);
            }
        }
        self
    }

    pub fn fail_get_display(mut self) -> Self {
        self.failures.get_display = true;
        self
    }

    pub fn fail_platform_display(mut self) -> Self {
        self.failures.platform_display = true;
        self
    }

    pub fn fail_initialize(mut self) -> Self {
        self.failures.initialize = true;
        self
    }

    pub fn fail_bind_api(mut self) -> Self {
        self.failures.bind_api = true;
        self
    }

    pub fn fail_choose_config(mut self) -> Self {
        self.failures.choose_config = true;
        self
    }

    pub fn fail_create_context(mut self) -> Self {
        self.failures.create_context = true;
        self
    }

    pub fn fail_create_surface(mut self) -> Self {
        self.failures.create_surface = true;
        self
    }

    pub fn fail_make_current(mut self) -> Self {
        self.failures.make_current = true;
        self
    }

    pub fn calls(&self) -> Vec<EglCall> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, call: EglCall) -> usize {
        self.calls.borrow().iter().filter(|c| **c == call).count()
    }

    pub fn bound_api(&self) -> Option<EglEnum> {
        self.bound_api.get()
    }

    pub fn last_config_attribs(&self) -> Vec<EglInt> {
        self.config_attribs.borrow().clone()
    }

    pub fn last_context_attribs(&self) -> Vec<EglInt> {
        self.context_attribs.borrow().clone()
    }

    fn record(&self, call: EglCall) {
        self.calls.borrow_mut().push(call);
    }

    fn fail(&self, code: EglInt) {
        self.pending_error.set(code);
    }
}

impl EglApi for MockEgl {
    fn get_error(&self) -> EglInt {
        self.record(EglCall::GetError);
        self.pending_error.replace(egl::SUCCESS)
    }

    fn query_string(&self, display: EglDisplay, name: EglInt) -> Option<String> {
        self.record(EglCall::QueryString);
        if display.is_none() {
            if name == egl::EXTENSIONS && self.client_extensions.is_some() {
                return self.client_extensions.clone();
            }
            self.fail(egl::BAD_DISPLAY);
            return None;
        }
        let value = self.display_strings.get(&name).cloned();
        if value.is_none() {
            self.fail(egl::BAD_PARAMETER);
        }
        value
    }

    fn get_display(&self, _native: NativeDisplay) -> EglDisplay {
        self.record(EglCall::GetDisplay);
        if self.failures.get_display {
            self.fail(egl::BAD_DISPLAY);
            return EglDisplay::NONE;
        }
        DISPLAY
    }

    fn get_platform_display_ext(
        &self,
        _platform: EglEnum,
        _native: NativeDisplay,
    ) -> Option<EglDisplay> {
        self.record(EglCall::GetPlatformDisplayExt);
        if self.failures.platform_display {
            self.fail(egl::BAD_PARAMETER);
            return Some(EglDisplay::NONE);
        }
        Some(PLATFORM_DISPLAY)
    }

    fn initialize(&self, _display: EglDisplay) -> Option<(EglInt, EglInt)> {
        self.record(EglCall::Initialize);
        if self.failures.initialize {
            self.fail(egl::NOT_INITIALIZED);
            return None;
        }
        Some(self.version)
    }

    fn terminate(&self, _display: EglDisplay) -> bool {
        self.record(EglCall::Terminate);
        true
    }

    fn bind_api(&self, api: EglEnum) -> bool {
        self.record(EglCall::BindApi);
        if self.failures.bind_api {
            self.fail(egl::BAD_PARAMETER);
            return false;
        }
        self.bound_api.set(Some(api));
        true
    }

    fn choose_config(
        &self,
        _display: EglDisplay,
        attribs: &[EglInt],
        capacity: usize,
    ) -> Option<Vec<EglConfig>> {
        self.record(EglCall::ChooseConfig);
        *self.config_attribs.borrow_mut() = attribs.to_vec();
        if self.failures.choose_config {
            self.fail(egl::BAD_ATTRIBUTE);
            return None;
        }
        Some(
            (0..self.config_count.min(capacity))
                .map(|i| EglConfig::from_raw(0x100 + i))
                .collect(),
        )
    }

    fn create_context(
        &self,
        _display: EglDisplay,
        _config: EglConfig,
        _share: EglContext,
        attribs: &[EglInt],
    ) -> EglContext {
        self.record(EglCall::CreateContext);
        *self.context_attribs.borrow_mut() = attribs.to_vec();
        if self.failures.create_context {
            self.fail(egl::BAD_MATCH);
            return EglContext::NONE;
        }
        CONTEXT
    }

    fn destroy_context(&self, _display: EglDisplay, _context: EglContext) -> bool {
        self.record(EglCall::DestroyContext);
        true
    }

    fn create_window_surface(
        &self,
        _display: EglDisplay,
        _config: EglConfig,
        _window: NativeWindow,
        _attribs: &[EglInt],
    ) -> EglSurface {
        self.record(EglCall::CreateWindowSurface);
        if self.failures.create_surface {
            self.fail(egl::BAD_NATIVE_WINDOW);
            return EglSurface::NONE;
        }
        SURFACE
    }

    fn destroy_surface(&self, _display: EglDisplay, _surface: EglSurface) -> bool {
        self.record(EglCall::DestroySurface);
        true
    }

    fn make_current(
        &self,
        _display: EglDisplay,
        _draw: EglSurface,
        _read: EglSurface,
        context: EglContext,
    ) -> bool {
        self.record(EglCall::MakeCurrent);
        if self.failures.make_current && !context.is_none() {
            self.fail(egl::BAD_ACCESS);
            return false;
        }
        true
    }
}
