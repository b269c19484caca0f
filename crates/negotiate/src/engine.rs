use std::fmt;

use glinfo_common::consts::egl;
use glinfo_common::{ApiError, ApiFamily, GlVersion};
use tracing::{debug, info, warn};

use crate::egl::{EglApi, EglConfig, EglContext, EglDisplay, EglInt, NativeDisplay};
use crate::error::NegotiationError;

/// Oldest EGL the engine accepts. Context minor-version attributes are core
/// from 1.5 on.
pub const MIN_EGL_VERSION: EglVersion = EglVersion::new(1, 5);

/// Version reported by `eglInitialize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EglVersion {
    pub major: EglInt,
    pub minor: EglInt,
}

impl EglVersion {
    pub const fn new(major: EglInt, minor: EglInt) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for EglVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// How the EGL display was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformPath {
    /// `eglGetPlatformDisplayEXT(EGL_PLATFORM_WAYLAND_EXT, ..)`.
    Extended,
    /// `eglGetDisplay(..)`.
    Generic,
}

impl fmt::Display for PlatformPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlatformPath::Extended => "extended",
            PlatformPath::Generic => "generic",
        })
    }
}

/// An initialized display with the client API bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayBinding {
    display: EglDisplay,
    path: PlatformPath,
    version: EglVersion,
    family: ApiFamily,
}

impl DisplayBinding {
    pub fn display(&self) -> EglDisplay {
        self.display
    }

    pub fn path(&self) -> PlatformPath {
        self.path
    }

    pub fn version(&self) -> EglVersion {
        self.version
    }

    pub fn family(&self) -> ApiFamily {
        self.family
    }
}

/// The single config chosen for the requested API tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigSelection(EglConfig);

impl ConfigSelection {
    pub fn config(&self) -> EglConfig {
        self.0
    }
}

/// A created context and the request that produced it.
///
/// The granted version may differ from `requested`; query the live context
/// for the real one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextHandle {
    pub context: EglContext,
    pub config: ConfigSelection,
    pub requested: GlVersion,
}

/// `EGL_RENDERABLE_TYPE` bit for `major` within `family`.
pub fn renderable_bit(family: ApiFamily, major: i32) -> Result<EglInt, NegotiationError> {
    match (family, major) {
        (ApiFamily::OpenGlEs, 1) => Ok(egl::OPENGL_ES_BIT),
        (ApiFamily::OpenGlEs, 2) => Ok(egl::OPENGL_ES2_BIT),
        (ApiFamily::OpenGlEs, 3) => Ok(egl::OPENGL_ES3_BIT),
        (ApiFamily::OpenGl, 1..=4) => Ok(egl::OPENGL_BIT),
        _ => Err(NegotiationError::UnsupportedMajorVersion { family, major }),
    }
}

fn api_enum(family: ApiFamily) -> u32 {
    match family {
        ApiFamily::OpenGlEs => egl::OPENGL_ES_API,
        ApiFamily::OpenGl => egl::OPENGL_API,
    }
}

/// Drives display acquisition and context creation against an [`EglApi`].
pub struct Negotiator<'a, E: EglApi + ?Sized> {
    egl: &'a E,
}

impl<'a, E: EglApi + ?Sized> Negotiator<'a, E> {
    pub fn new(egl: &'a E) -> Self {
        Self { egl }
    }

    fn last_error(&self) -> ApiError {
        ApiError::egl(self.egl.get_error())
    }

    /// Client extensions advertised without a display. Absence is not an
    /// error; it only disables the extended platform path.
    pub fn client_extensions(&self) -> Vec<String> {
        match self.egl.query_string(EglDisplay::NONE, egl::EXTENSIONS) {
            Some(list) => list.split_whitespace().map(str::to_string).collect(),
            None => {
                // Pre-1.5 runtimes flag EGL_BAD_DISPLAY here; clear it so it
                // is not blamed on a later call.
                let error = self.last_error();
                debug!(%error, "no EGL client extensions");
                Vec::new()
            }
        }
    }

    /// Obtain, initialize and validate a display for `native`, then bind
    /// `family` on it.
    pub fn acquire_display(
        &self,
        native: NativeDisplay,
        family: ApiFamily,
    ) -> Result<DisplayBinding, NegotiationError> {
        let _span = tracing::debug_span!("acquire_display").entered();

        let (display, path) = self.open_display(native)?;
        info!(%path, "EGL display obtained");

        let Some((major, minor)) = self.egl.initialize(display) else {
            let error = self.last_error();
            self.egl.terminate(display);
            return Err(NegotiationError::InitializationFailed(error));
        };
        let version = EglVersion::new(major, minor);
        debug!(%version, "EGL initialized");

        if version < MIN_EGL_VERSION {
            self.egl.terminate(display);
            return Err(NegotiationError::UnsupportedVersion(version));
        }

        if !self.egl.bind_api(api_enum(family)) {
            let error = self.last_error();
            self.egl.terminate(display);
            return Err(NegotiationError::ApiBindFailed { family, error });
        }

        Ok(DisplayBinding {
            display,
            path,
            version,
            family,
        })
    }

    fn open_display(
        &self,
        native: NativeDisplay,
    ) -> Result<(EglDisplay, PlatformPath), NegotiationError> {
        let extensions = self.client_extensions();
        let has = |name: &str| extensions.iter().any(|e| e == name);

        if has(egl::EXT_PLATFORM_BASE)
            && (has(egl::EXT_PLATFORM_WAYLAND) || has(egl::KHR_PLATFORM_WAYLAND))
        {
            match self
                .egl
                .get_platform_display_ext(egl::PLATFORM_WAYLAND_EXT, native)
            {
                Some(display) if !display.is_none() => {
                    return Ok((display, PlatformPath::Extended));
                }
                Some(_) => {
                    let error = self.last_error();
                    warn!(%error, "eglGetPlatformDisplayEXT failed, using eglGetDisplay");
                }
                None => {
                    warn!("eglGetPlatformDisplayEXT advertised but not resolvable");
                }
            }
        } else {
            debug!("Wayland platform extensions not advertised");
        }

        let display = self.egl.get_display(native);
        if display.is_none() {
            return Err(NegotiationError::DisplayUnavailable(self.last_error()));
        }
        Ok((display, PlatformPath::Generic))
    }

    /// Choose exactly one config able to render `version` into a window.
    pub fn choose_config(
        &self,
        binding: &DisplayBinding,
        version: GlVersion,
    ) -> Result<ConfigSelection, NegotiationError> {
        let renderable = renderable_bit(binding.family, version.major)?;
        let attribs = [
            egl::SURFACE_TYPE,
            egl::WINDOW_BIT,
            egl::RENDERABLE_TYPE,
            renderable,
            egl::RED_SIZE,
            1,
            egl::GREEN_SIZE,
            1,
            egl::BLUE_SIZE,
            1,
            egl::NONE,
        ];

        match self.egl.choose_config(binding.display, &attribs, 1) {
            None => Err(NegotiationError::NoMatchingConfig(Some(self.last_error()))),
            Some(configs) => match configs.first() {
                Some(config) => Ok(ConfigSelection(*config)),
                None => Err(NegotiationError::NoMatchingConfig(None)),
            },
        }
    }

    /// Create a context for `requested` on `binding`.
    ///
    /// The request is passed verbatim as context attributes; the runtime may
    /// grant any compatible version.
    pub fn create_context(
        &self,
        binding: &DisplayBinding,
        requested: GlVersion,
    ) -> Result<ContextHandle, NegotiationError> {
        let _span = tracing::debug_span!("create_context", %requested).entered();

        let config = self.choose_config(binding, requested)?;
        let attribs = [
            egl::CONTEXT_MAJOR_VERSION,
            requested.major,
            egl::CONTEXT_MINOR_VERSION,
            requested.minor,
            egl::NONE,
        ];

        let context =
            self.egl
                .create_context(binding.display, config.config(), EglContext::NONE, &attribs);
        if context.is_none() {
            return Err(NegotiationError::ContextCreationFailed {
                family: binding.family,
                requested,
                error: self.last_error(),
            });
        }
        debug!(family = %binding.family, "context created");

        Ok(ContextHandle {
            context,
            config,
            requested,
        })
    }
}
