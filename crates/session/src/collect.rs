use glinfo_common::consts::{egl, gl};
use glinfo_common::{AttributeSource, CapabilitySource};
use glinfo_report::{
    CapabilityReport, ExtensionSource, enumerate_extensions, query_attribute, query_string,
};

const DISPLAY_KEYS: [(i32, &str); 4] = [
    (egl::VERSION, "EGL_VERSION"),
    (egl::VENDOR, "EGL_VENDOR"),
    (egl::EXTENSIONS, "EGL_EXTENSIONS"),
    (egl::CLIENT_APIS, "EGL_CLIENT_APIS"),
];

const CONTEXT_KEYS: [(i32, &str); 2] = [
    (egl::CONTEXT_MAJOR_VERSION, "EGL_CONTEXT_MAJOR_VERSION"),
    (egl::CONTEXT_MINOR_VERSION, "EGL_CONTEXT_MINOR_VERSION"),
];

const RENDERING_KEYS: [(u32, &str); 4] = [
    (gl::VERSION, "GL_VERSION"),
    (gl::VENDOR, "GL_VENDOR"),
    (gl::RENDERER, "GL_RENDERER"),
    (gl::SHADING_LANGUAGE_VERSION, "GL_SHADING_LANGUAGE_VERSION"),
];

/// Query every report field. Failed fields become `(null)` lines and never
/// stop the remaining queries.
pub fn collect_report<D, R>(display: &D, rendering: &R) -> CapabilityReport
where
    D: CapabilitySource + ?Sized,
    R: AttributeSource + ExtensionSource + ?Sized,
{
    let mut report = CapabilityReport::new("GL_EXTENSIONS");
    for (key, label) in DISPLAY_KEYS {
        report.push(query_string(display, key as u32, label));
    }
    for (key, label) in CONTEXT_KEYS {
        report.push(query_attribute(rendering, key as u32, label));
    }
    for (key, label) in RENDERING_KEYS {
        report.push(query_string(rendering, key, label));
    }
    report.extensions = enumerate_extensions(rendering);
    report
}
