use std::fmt;

use glinfo_common::{ApiError, AttributeSource, CapabilitySource};

/// Outcome of one capability query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryStatus {
    Present(String),
    Absent(ApiError),
}

/// One `label = value` line of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub label: String,
    pub status: QueryStatus,
}

impl ReportLine {
    pub fn present(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            status: QueryStatus::Present(value.into()),
        }
    }

    pub fn absent(label: impl Into<String>, error: ApiError) -> Self {
        Self {
            label: label.into(),
            status: QueryStatus::Absent(error),
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self.status, QueryStatus::Present(_))
    }
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            QueryStatus::Present(value) => write!(f, "{} = {value}", self.label),
            QueryStatus::Absent(error) => write!(
                f,
                "{} = (null) ; {}Error={error}",
                self.label,
                error.domain.label()
            ),
        }
    }
}

/// Query string `key` from `source` and render it under `label`.
pub fn query_string<S: CapabilitySource + ?Sized>(source: &S, key: u32, label: &str) -> ReportLine {
    match source.query_string(key) {
        Some(value) => ReportLine::present(label, value),
        // Read the register before anything else runs on this source.
        None => ReportLine::absent(label, take_error(source)),
    }
}

/// Query integer attribute `key` from `source` and render it under `label`.
pub fn query_attribute<S: AttributeSource + ?Sized>(
    source: &S,
    key: u32,
    label: &str,
) -> ReportLine {
    match source.query_attribute(key) {
        Some(value) => ReportLine::present(label, value.to_string()),
        None => ReportLine::absent(label, take_error(source)),
    }
}

fn take_error<S: CapabilitySource + ?Sized>(source: &S) -> ApiError {
    ApiError {
        domain: source.domain(),
        code: source.take_error(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glinfo_common::ErrorDomain;
    use glinfo_common::consts::{egl, gl};
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    /// Error register that is cleared on read, like EGL and GL.
    struct FakeSource {
        domain: ErrorDomain,
        strings: HashMap<u32, &'static str>,
        attributes: HashMap<u32, i32>,
        failure_code: u32,
        pending: Cell<u32>,
        calls: RefCell<Vec<&'static str>>,
    }

    impl FakeSource {
        fn new(domain: ErrorDomain, failure_code: u32) -> Self {
            Self {
                domain,
                strings: HashMap::new(),
                attributes: HashMap::new(),
                failure_code,
                pending: Cell::new(0),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl CapabilitySource for FakeSource {
        fn domain(&self) -> ErrorDomain {
            self.domain
        }

        fn query_string(&self, key: u32) -> Option<String> {
            self.calls.borrow_mut().push("query");
            let value = self.strings.get(&key).map(|s| s.to_string());
            self.pending
                .set(if value.is_some() { 0 } else { self.failure_code });
            value
        }

        fn take_error(&self) -> u32 {
            self.calls.borrow_mut().push("error");
            self.pending.replace(0)
        }
    }

    impl AttributeSource for FakeSource {
        fn query_attribute(&self, key: u32) -> Option<i32> {
            self.calls.borrow_mut().push("attribute");
            let value = self.attributes.get(&key).copied();
            self.pending
                .set(if value.is_some() { 0 } else { self.failure_code });
            value
        }
    }

    #[test]
    fn present_value_renders_label_equals_value() {
        let mut source = FakeSource::new(ErrorDomain::Egl, egl::BAD_DISPLAY as u32);
        source.strings.insert(egl::VERSION as u32, "1.5 Mesa");
        let line = query_string(&source, egl::VERSION as u32, "EGL_VERSION");
        assert_eq!(line.to_string(), "EGL_VERSION = 1.5 Mesa");
        assert!(line.is_present());
    }

    #[test]
    fn absent_egl_value_renders_error_code() {
        let source = FakeSource::new(ErrorDomain::Egl, egl::BAD_DISPLAY as u32);
        let line = query_string(&source, egl::VENDOR as u32, "EGL_VENDOR");
        assert_eq!(
            line.to_string(),
            "EGL_VENDOR = (null) ; EGLError=0x3008 (EGL_BAD_DISPLAY)"
        );
    }

    #[test]
    fn unknown_gl_code_still_printed() {
        let source = FakeSource::new(ErrorDomain::Gl, 0x0badu32);
        let line = query_string(&source, gl::RENDERER, "GL_RENDERER");
        assert_eq!(
            line.to_string(),
            "GL_RENDERER = (null) ; GLError=0x0bad (Unknown error)"
        );
    }

    #[test]
    fn error_is_read_immediately_after_failed_query() {
        let source = FakeSource::new(ErrorDomain::Gl, gl::INVALID_ENUM);
        let line = query_string(&source, gl::VERSION, "GL_VERSION");
        assert_eq!(*source.calls.borrow(), ["query", "error"]);
        assert_eq!(line.status, QueryStatus::Absent(ApiError::gl(gl::INVALID_ENUM)));
    }

    #[test]
    fn success_does_not_consume_error_register() {
        let mut source = FakeSource::new(ErrorDomain::Gl, gl::INVALID_ENUM);
        source.strings.insert(gl::VENDOR, "Mesa");
        query_string(&source, gl::VENDOR, "GL_VENDOR");
        assert_eq!(*source.calls.borrow(), ["query"]);
    }

    #[test]
    fn attribute_lines_render_integers() {
        let mut source = FakeSource::new(ErrorDomain::Gl, gl::INVALID_ENUM);
        source.attributes.insert(egl::CONTEXT_MAJOR_VERSION as u32, 3);
        let major = query_attribute(
            &source,
            egl::CONTEXT_MAJOR_VERSION as u32,
            "EGL_CONTEXT_MAJOR_VERSION",
        );
        assert_eq!(major.to_string(), "EGL_CONTEXT_MAJOR_VERSION = 3");

        let minor = query_attribute(
            &source,
            egl::CONTEXT_MINOR_VERSION as u32,
            "EGL_CONTEXT_MINOR_VERSION",
        );
        assert_eq!(
            minor.to_string(),
            "EGL_CONTEXT_MINOR_VERSION = (null) ; GLError=0x0500 (GL_INVALID_ENUM)"
        );
    }
}
