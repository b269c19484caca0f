use glinfo_common::consts::egl;
use glinfo_common::{ApiError, ApiFamily, AttributeSource, GlVersion};
use glinfo_negotiate::{
    ContextHandle, DisplayBinding, DisplayStrings, EglApi, EglContext, EglSurface,
    NativeWindow, NegotiationError, Negotiator, PlatformPath,
};
use glinfo_report::{CapabilityReport, ExtensionSource, QueryStatus};
use tracing::{debug, info, warn};

use crate::collect::collect_report;
use crate::platform::{Platform, PlatformError};

/// Size of the throwaway window the context is made current on.
pub const WINDOW_WIDTH: i32 = 400;
pub const WINDOW_HEIGHT: i32 = 300;

/// Lifecycle of one session. `Failed` can follow any step and always leads
/// to `TornDown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Start,
    PlatformConnected,
    DisplayNegotiated,
    ContextCreated,
    SurfaceCreated,
    Reported,
    Failed,
    TornDown,
}

/// Client API and version to negotiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextRequest {
    pub family: ApiFamily,
    pub version: GlVersion,
}

/// Why a session did not produce a report.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("windowing service connection failed: {0}")]
    Connection(PlatformError),
    #[error(transparent)]
    Platform(PlatformError),
    #[error(transparent)]
    Negotiation(#[from] NegotiationError),
    #[error("GL entry points unavailable: {0}")]
    RenderingUnavailable(String),
}

/// Exclusive owner of every handle acquired during one run.
pub struct Session<'e, E: EglApi + ?Sized, P: Platform> {
    egl: &'e E,
    platform: Option<P>,
    binding: Option<DisplayBinding>,
    context: Option<ContextHandle>,
    window: Option<NativeWindow>,
    surface: EglSurface,
    current: bool,
    path: Option<PlatformPath>,
    lifecycle: Lifecycle,
}

#[derive(Debug)]
struct Lifecycle {
    state: SessionState,
    history: Vec<SessionState>,
}

impl Lifecycle {
    fn new() -> Self {
        Self {
            state: SessionState::Start,
            history: vec![SessionState::Start],
        }
    }

    fn advance(&mut self, next: SessionState) {
        debug!(from = ?self.state, to = ?next, "session state");
        self.state = next;
        self.history.push(next);
    }
}

impl<'e, E: EglApi + ?Sized, P: Platform> Session<'e, E, P> {
    pub fn new(egl: &'e E) -> Self {
        Self {
            egl,
            platform: None,
            binding: None,
            context: None,
            window: None,
            surface: EglSurface::NONE,
            current: false,
            path: None,
            lifecycle: Lifecycle::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.lifecycle.state
    }

    /// Every state visited so far, in order.
    pub fn history(&self) -> &[SessionState] {
        &self.lifecycle.history
    }

    pub fn binding(&self) -> Option<&DisplayBinding> {
        self.binding.as_ref()
    }

    /// How the display was obtained. Kept after teardown.
    pub fn platform_path(&self) -> Option<PlatformPath> {
        self.path
    }

    /// Process exit status: 0 only if the report was produced.
    pub fn exit_status(&self) -> u8 {
        if self.lifecycle.history.contains(&SessionState::Reported) {
            0
        } else {
            1
        }
    }

    /// Connect, negotiate, create the surface and collect the report, then
    /// tear everything down whatever the outcome.
    ///
    /// `load_rendering` runs once the context is current and resolves the
    /// rendering API's query entry points.
    pub fn run<C, L, R>(
        &mut self,
        request: ContextRequest,
        connect: C,
        load_rendering: L,
    ) -> Result<CapabilityReport, SessionError>
    where
        C: FnOnce() -> Result<P, PlatformError>,
        L: FnOnce(&'e E) -> Result<R, String>,
        R: AttributeSource + ExtensionSource,
    {
        let result = self.drive(request, connect, load_rendering);
        if let Err(err) = &result {
            warn!(%err, state = ?self.lifecycle.state, "session failed");
            self.lifecycle.advance(SessionState::Failed);
        }
        self.teardown();
        result
    }

    fn drive<C, L, R>(
        &mut self,
        request: ContextRequest,
        connect: C,
        load_rendering: L,
    ) -> Result<CapabilityReport, SessionError>
    where
        C: FnOnce() -> Result<P, PlatformError>,
        L: FnOnce(&'e E) -> Result<R, String>,
        R: AttributeSource + ExtensionSource,
    {
        let egl = self.egl;
        // Held in `self` so teardown can disconnect it on any later failure.
        let platform = self
            .platform
            .insert(connect().map_err(SessionError::Connection)?);
        let native = platform.native_display();
        self.lifecycle.advance(SessionState::PlatformConnected);

        let negotiator = Negotiator::new(egl);
        let binding = negotiator.acquire_display(native, request.family)?;
        self.binding = Some(binding);
        self.path = Some(binding.path());
        self.lifecycle.advance(SessionState::DisplayNegotiated);

        let context = negotiator.create_context(&binding, request.version)?;
        self.context = Some(context);
        self.lifecycle.advance(SessionState::ContextCreated);

        let window = platform
            .create_window(WINDOW_WIDTH, WINDOW_HEIGHT)
            .map_err(SessionError::Platform)?;
        self.window = Some(window);
        self.bind_surface(&binding, &context, window)?;
        self.lifecycle.advance(SessionState::SurfaceCreated);

        let rendering = load_rendering(egl).map_err(SessionError::RenderingUnavailable)?;
        let display = DisplayStrings::new(egl, binding.display());
        let report = collect_report(&display, &rendering);
        log_granted_version(&report, request.version);
        self.lifecycle.advance(SessionState::Reported);
        Ok(report)
    }

    /// Wrap `window` in an EGL surface and make `context` current on it.
    fn bind_surface(
        &mut self,
        binding: &DisplayBinding,
        context: &ContextHandle,
        window: NativeWindow,
    ) -> Result<(), SessionError> {
        let display = binding.display();
        let surface =
            self.egl
                .create_window_surface(display, context.config.config(), window, &[egl::NONE]);
        if surface.is_none() {
            let error = ApiError::egl(self.egl.get_error());
            return Err(NegotiationError::SurfaceCreationFailed(error).into());
        }
        self.surface = surface;

        if !self
            .egl
            .make_current(display, surface, surface, context.context)
        {
            let error = ApiError::egl(self.egl.get_error());
            return Err(NegotiationError::MakeCurrentFailed(error).into());
        }
        self.current = true;
        Ok(())
    }

    /// Release everything acquired so far, newest first. Safe to call more
    /// than once and with nothing acquired.
    pub fn teardown(&mut self) {
        if self.lifecycle.state == SessionState::TornDown {
            return;
        }

        let display = self.binding.map(|binding| binding.display());
        if let Some(display) = display {
            if self.current {
                self.egl.make_current(
                    display,
                    EglSurface::NONE,
                    EglSurface::NONE,
                    EglContext::NONE,
                );
                self.current = false;
            }
            if !self.surface.is_none() {
                self.egl.destroy_surface(display, self.surface);
            }
        }
        self.surface = EglSurface::NONE;

        if self.window.take().is_some() {
            if let Some(platform) = self.platform.as_mut() {
                platform.destroy_window();
            }
        }
        if let (Some(display), Some(context)) = (display, self.context.take()) {
            self.egl.destroy_context(display, context.context);
        }
        if let Some(binding) = self.binding.take() {
            self.egl.terminate(binding.display());
        }
        if let Some(mut platform) = self.platform.take() {
            platform.disconnect();
        }

        self.lifecycle.advance(SessionState::TornDown);
    }
}

impl<E: EglApi + ?Sized, P: Platform> Drop for Session<'_, E, P> {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn log_granted_version(report: &CapabilityReport, requested: GlVersion) {
    let value = |label: &str| match report.line(label).map(|line| &line.status) {
        Some(QueryStatus::Present(v)) => v.parse::<i32>().ok(),
        _ => None,
    };
    if let (Some(major), Some(minor)) = (
        value("EGL_CONTEXT_MAJOR_VERSION"),
        value("EGL_CONTEXT_MINOR_VERSION"),
    ) {
        let granted = GlVersion::new(major, minor);
        if granted != requested {
            info!(%requested, %granted, "runtime granted a different context version");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glinfo_common::consts::gl;
    use glinfo_common::{CapabilitySource, ErrorDomain};
    use glinfo_negotiate::mock::{EglCall, MockEgl};
    use glinfo_negotiate::NativeDisplay;
    use glinfo_report::{ReportRenderer, TextRenderer};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct FakePlatform {
        log: Rc<RefCell<Vec<&'static str>>>,
        fail_window: bool,
    }

    impl Platform for FakePlatform {
        fn native_display(&self) -> NativeDisplay {
            NativeDisplay::from_raw(0xd15)
        }

        fn create_window(&mut self, _w: i32, _h: i32) -> Result<NativeWindow, PlatformError> {
            self.log.borrow_mut().push("create_window");
            if self.fail_window {
                return Err(PlatformError::Window("no surface".into()));
            }
            Ok(NativeWindow::from_raw(0x3a))
        }

        fn destroy_window(&mut self) {
            self.log.borrow_mut().push("destroy_window");
        }

        fn disconnect(&mut self) {
            self.log.borrow_mut().push("disconnect");
        }
    }

    struct FakeRendering {
        granted: (i32, i32),
        bulk: Option<&'static str>,
        pending: Cell<u32>,
    }

    impl FakeRendering {
        fn new(granted: (i32, i32), bulk: Option<&'static str>) -> Self {
            Self {
                granted,
                bulk,
                pending: Cell::new(gl::NO_ERROR),
            }
        }
    }

    impl CapabilitySource for FakeRendering {
        fn domain(&self) -> ErrorDomain {
            ErrorDomain::Gl
        }

        fn query_string(&self, key: u32) -> Option<String> {
            match key {
                gl::VERSION => {
                    let (major, minor) = self.granted;
                    Some(format!("OpenGL ES {major}.{minor} Fake"))
                }
                gl::VENDOR => Some("Fake Vendor".into()),
                gl::RENDERER => Some("Fake Renderer".into()),
                _ => {
                    self.pending.set(gl::INVALID_ENUM);
                    None
                }
            }
        }

        fn take_error(&self) -> u32 {
            self.pending.replace(gl::NO_ERROR)
        }
    }

    impl AttributeSource for FakeRendering {
        fn query_attribute(&self, key: u32) -> Option<i32> {
            match key as i32 {
                egl::CONTEXT_MAJOR_VERSION => Some(self.granted.0),
                egl::CONTEXT_MINOR_VERSION => Some(self.granted.1),
                _ => None,
            }
        }
    }

    impl ExtensionSource for FakeRendering {
        fn bulk_extensions(&self) -> Option<String> {
            self.bulk.map(str::to_string)
        }

        fn extension_count(&self) -> Option<usize> {
            None
        }

        fn extension_at(&self, _index: usize) -> Option<String> {
            None
        }
    }

    const ES2: ContextRequest = ContextRequest {
        family: ApiFamily::OpenGlEs,
        version: GlVersion::new(2, 0),
    };

    fn run_with(
        mock: &MockEgl,
        platform: FakePlatform,
        rendering: FakeRendering,
    ) -> (Result<CapabilityReport, SessionError>, Vec<SessionState>, u8) {
        let mut session = Session::new(mock);
        let result = session.run(ES2, || Ok(platform), |_| Ok(rendering));
        (result, session.history().to_vec(), session.exit_status())
    }

    #[test]
    fn generic_path_end_to_end() {
        let mock = MockEgl::new();
        let mut session = Session::new(&mock);
        let result = session.run(
            ES2,
            || Ok(FakePlatform::default()),
            |_| Ok(FakeRendering::new((2, 0), Some("GL_OES_x"))),
        );
        assert!(result.is_ok());
        assert_eq!(
            session.history(),
            [
                SessionState::Start,
                SessionState::PlatformConnected,
                SessionState::DisplayNegotiated,
                SessionState::ContextCreated,
                SessionState::SurfaceCreated,
                SessionState::Reported,
                SessionState::TornDown,
            ]
        );
        assert_eq!(session.exit_status(), 0);
        assert_eq!(session.platform_path(), Some(PlatformPath::Generic));
        assert_eq!(mock.count(EglCall::GetDisplay), 1);
        assert_eq!(mock.count(EglCall::GetPlatformDisplayExt), 0);
    }

    #[test]
    fn extended_path_recorded_in_session() {
        let mock = MockEgl::new()
            .with_client_extensions("EGL_EXT_platform_base EGL_EXT_platform_wayland");
        let mut session = Session::new(&mock);
        let result = session.run(
            ES2,
            || Ok(FakePlatform::default()),
            |_| Ok(FakeRendering::new((2, 0), None)),
        );
        assert!(result.is_ok());
        assert_eq!(session.platform_path(), Some(PlatformPath::Extended));
        assert_eq!(mock.count(EglCall::GetPlatformDisplayExt), 1);
        assert_eq!(mock.count(EglCall::GetDisplay), 0);
    }

    #[test]
    fn granted_version_is_reported_not_requested() {
        let mock = MockEgl::new();
        let (result, _, status) = run_with(
            &mock,
            FakePlatform::default(),
            FakeRendering::new((3, 1), Some("GL_EXT_foo GL_EXT_bar")),
        );
        let report = result.unwrap();
        let text = TextRenderer::new().render(&report);
        assert!(text.contains("EGL_CONTEXT_MAJOR_VERSION = 3\n"));
        assert!(text.contains("EGL_CONTEXT_MINOR_VERSION = 1\n"));
        assert!(text.contains("GL_VERSION = OpenGL ES 3.1 Fake\n"));
        assert_eq!(status, 0);
    }

    #[test]
    fn bulk_extensions_are_wrapped() {
        let mock = MockEgl::new();
        let (result, _, _) = run_with(
            &mock,
            FakePlatform::default(),
            FakeRendering::new((2, 0), Some("GL_EXT_foo GL_EXT_bar")),
        );
        let text = TextRenderer::new().render(&result.unwrap());
        assert!(text.ends_with("GL_EXTENSIONS:\n    GL_EXT_foo, GL_EXT_bar\n"));
    }

    #[test]
    fn report_lines_in_order_with_absent_fields() {
        let mock = MockEgl::new().with_display_string(egl::VENDOR, None);
        let (result, _, status) = run_with(
            &mock,
            FakePlatform::default(),
            FakeRendering::new((2, 0), None),
        );
        let report = result.unwrap();
        let labels: Vec<&str> = report.lines.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(
            labels,
            [
                "EGL_VERSION",
                "EGL_VENDOR",
                "EGL_EXTENSIONS",
                "EGL_CLIENT_APIS",
                "EGL_CONTEXT_MAJOR_VERSION",
                "EGL_CONTEXT_MINOR_VERSION",
                "GL_VERSION",
                "GL_VENDOR",
                "GL_RENDERER",
                "GL_SHADING_LANGUAGE_VERSION",
            ]
        );
        assert_eq!(
            report.lines[1].to_string(),
            "EGL_VENDOR = (null) ; EGLError=0x300c (EGL_BAD_PARAMETER)"
        );
        assert_eq!(
            report.lines[9].to_string(),
            "GL_SHADING_LANGUAGE_VERSION = (null) ; GLError=0x0500 (GL_INVALID_ENUM)"
        );
        assert_eq!(report.diagnostics(), ["GL_EXTENSIONS: no extensions found"]);
        assert_eq!(status, 0);
    }

    #[test]
    fn teardown_reverses_acquisition() {
        let mock = MockEgl::new();
        let platform = FakePlatform::default();
        let log = platform.log.clone();
        let (result, _, _) = run_with(&mock, platform, FakeRendering::new((2, 0), None));
        assert!(result.is_ok());

        let calls = mock.calls();
        let tail = &calls[calls.len() - 4..];
        assert_eq!(
            tail,
            [
                EglCall::MakeCurrent,
                EglCall::DestroySurface,
                EglCall::DestroyContext,
                EglCall::Terminate,
            ]
        );
        assert_eq!(
            *log.borrow(),
            ["create_window", "destroy_window", "disconnect"]
        );
    }

    #[test]
    fn teardown_twice_releases_once() {
        let mock = MockEgl::new();
        let platform = FakePlatform::default();
        let log = platform.log.clone();
        let mut session = Session::new(&mock);
        session
            .run(ES2, || Ok(platform), |_| Ok(FakeRendering::new((2, 0), None)))
            .unwrap();
        let before = mock.calls().len();
        session.teardown();
        session.teardown();
        drop(session);
        assert_eq!(mock.calls().len(), before);
        assert_eq!(mock.count(EglCall::Terminate), 1);
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn teardown_with_nothing_acquired() {
        let mock = MockEgl::new();
        let mut session: Session<'_, MockEgl, FakePlatform> = Session::new(&mock);
        session.teardown();
        session.teardown();
        assert!(mock.calls().is_empty());
        assert_eq!(session.state(), SessionState::TornDown);
        assert_eq!(session.exit_status(), 1);
    }

    #[test]
    fn connection_failure_touches_no_egl() {
        let mock = MockEgl::new();
        let mut session: Session<'_, MockEgl, FakePlatform> = Session::new(&mock);
        let result = session.run(
            ES2,
            || Err(PlatformError::Connect("no socket".into())),
            |_| Ok(FakeRendering::new((2, 0), None)),
        );
        assert!(matches!(result, Err(SessionError::Connection(_))));
        assert!(mock.calls().is_empty());
        assert_eq!(
            session.history(),
            [
                SessionState::Start,
                SessionState::Failed,
                SessionState::TornDown
            ]
        );
        assert_eq!(session.exit_status(), 1);
    }

    #[test]
    fn context_failure_releases_display_and_platform() {
        let mock = MockEgl::new().fail_create_context();
        let platform = FakePlatform::default();
        let log = platform.log.clone();
        let (result, history, status) =
            run_with(&mock, platform, FakeRendering::new((2, 0), None));
        assert!(matches!(
            result,
            Err(SessionError::Negotiation(
                NegotiationError::ContextCreationFailed { .. }
            ))
        ));
        assert_eq!(status, 1);
        assert!(history.contains(&SessionState::Failed));
        assert!(!history.contains(&SessionState::ContextCreated));
        assert_eq!(mock.count(EglCall::DestroyContext), 0);
        assert_eq!(mock.count(EglCall::Terminate), 1);
        assert_eq!(*log.borrow(), ["disconnect"]);
    }

    #[test]
    fn unsupported_major_fails_before_context() {
        let mock = MockEgl::new();
        let mut session = Session::new(&mock);
        let request = ContextRequest {
            family: ApiFamily::OpenGlEs,
            version: GlVersion::new(5, 0),
        };
        let result = session.run(
            request,
            || Ok(FakePlatform::default()),
            |_| Ok(FakeRendering::new((2, 0), None)),
        );
        assert!(matches!(
            result,
            Err(SessionError::Negotiation(
                NegotiationError::UnsupportedMajorVersion { major: 5, .. }
            ))
        ));
        assert_eq!(mock.count(EglCall::CreateContext), 0);
        assert_eq!(session.exit_status(), 1);
    }

    #[test]
    fn window_failure_skips_surface() {
        let mock = MockEgl::new();
        let platform = FakePlatform {
            fail_window: true,
            ..FakePlatform::default()
        };
        let log = platform.log.clone();
        let (result, _, status) = run_with(&mock, platform, FakeRendering::new((2, 0), None));
        assert!(matches!(result, Err(SessionError::Platform(_))));
        assert_eq!(status, 1);
        assert_eq!(mock.count(EglCall::CreateWindowSurface), 0);
        assert_eq!(mock.count(EglCall::DestroyContext), 1);
        assert_eq!(*log.borrow(), ["create_window", "disconnect"]);
    }

    #[test]
    fn surface_failure_keeps_error_code() {
        let mock = MockEgl::new().fail_create_surface();
        let platform = FakePlatform::default();
        let log = platform.log.clone();
        let (result, _, _) = run_with(&mock, platform, FakeRendering::new((2, 0), None));
        match result {
            Err(SessionError::Negotiation(NegotiationError::SurfaceCreationFailed(error))) => {
                assert_eq!(error, ApiError::egl(egl::BAD_NATIVE_WINDOW));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(mock.count(EglCall::DestroySurface), 0);
        assert_eq!(mock.count(EglCall::DestroyContext), 1);
        assert_eq!(
            *log.borrow(),
            ["create_window", "destroy_window", "disconnect"]
        );
    }

    #[test]
    fn make_current_failure_destroys_surface() {
        let mock = MockEgl::new().fail_make_current();
        let (result, _, status) = run_with(
            &mock,
            FakePlatform::default(),
            FakeRendering::new((2, 0), None),
        );
        assert!(matches!(
            result,
            Err(SessionError::Negotiation(NegotiationError::MakeCurrentFailed(_)))
        ));
        assert_eq!(status, 1);
        assert_eq!(mock.count(EglCall::MakeCurrent), 1);
        assert_eq!(mock.count(EglCall::DestroySurface), 1);
    }

    #[test]
    fn rendering_loader_failure_is_reported() {
        let mock = MockEgl::new();
        let mut session = Session::new(&mock);
        let result = session.run(
            ES2,
            || Ok(FakePlatform::default()),
            |_| Err::<FakeRendering, _>("glGetString missing".to_string()),
        );
        assert!(matches!(result, Err(SessionError::RenderingUnavailable(_))));
        assert_eq!(session.exit_status(), 1);
        // The context was current, so it is released before destruction.
        assert_eq!(mock.count(EglCall::MakeCurrent), 2);
    }
}
