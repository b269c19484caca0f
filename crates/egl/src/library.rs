use libloading::Library;
use tracing::{debug, info, warn};

use crate::egl::Egl;

/// Environment variable naming an explicit EGL library to load.
pub const EGL_LIBRARY_ENV: &str = "GLINFO_EGL_LIBRARY";

/// Sonames tried when no explicit path is given, in order.
const DEFAULT_LIBRARIES: &[&str] = &["libEGL.so.1", "libEGL.so"];

/// Errors from opening EGL or resolving its entry points.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("dlopen {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: libloading::Error,
    },
    #[error("{library} does not export {symbol}: {source}")]
    Symbol {
        library: String,
        symbol: &'static str,
        #[source]
        source: libloading::Error,
    },
    #[error("no usable EGL library found (tried {})", .0.join(", "))]
    NotFound(Vec<String>),
    #[error("eglGetProcAddress cannot resolve {0}")]
    GlSymbol(&'static str),
}

/// Load EGL and resolve its entry points.
///
/// Search order:
/// 1. `GLINFO_EGL_LIBRARY`
/// 2. `libEGL.so.1`, then `libEGL.so`
pub fn load_egl() -> Result<Egl, LoadError> {
    let mut tried = Vec::new();

    if let Ok(explicit) = std::env::var(EGL_LIBRARY_ENV) {
        match try_load(&explicit) {
            Ok(egl) => return Ok(egl),
            Err(e) => warn!("{EGL_LIBRARY_ENV}={explicit} set but failed: {e}"),
        }
        tried.push(explicit);
    }

    for name in DEFAULT_LIBRARIES {
        match try_load(name) {
            Ok(egl) => return Ok(egl),
            Err(e) => debug!("{name}: {e}"),
        }
        tried.push((*name).to_string());
    }

    Err(LoadError::NotFound(tried))
}

fn try_load(path: &str) -> Result<Egl, LoadError> {
    // SAFETY: loading the system EGL ICD loader; its initializers are the
    // ones every EGL client runs.
    let library = unsafe { Library::new(path) }.map_err(|source| LoadError::Open {
        path: path.to_string(),
        source,
    })?;
    let egl = Egl::from_library(library, path)?;
    info!("loaded EGL from {path}");
    Ok(egl)
}

/// Copy the function pointer `name` out of `library`.
///
/// `T` must be the `unsafe extern "C" fn` type matching the C prototype.
pub(crate) fn symbol<T: Copy>(
    library: &Library,
    path: &str,
    name: &'static str,
) -> Result<T, LoadError> {
    // SAFETY: callers pass the documented prototype as `T`. The returned
    // pointer is only called while `library` is kept alive by `Egl`.
    let sym = unsafe { library.get::<T>(name.as_bytes()) }.map_err(|source| {
        LoadError::Symbol {
            library: path.to_string(),
            symbol: name,
            source,
        }
    })?;
    Ok(*sym)
}
