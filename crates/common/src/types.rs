use std::fmt;
use std::str::FromStr;

/// A client API version, either requested on the command line or granted by
/// the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlVersion {
    pub major: i32,
    pub minor: i32,
}

impl GlVersion {
    pub const fn new(major: i32, minor: i32) -> Self {
        Self { major, minor }
    }

    /// Version requested when `--glver` is not given.
    ///
    /// Program names containing `es2` ask for 2.0, everything else for 1.0.
    pub fn default_for_program(program: &str) -> Self {
        if program.contains("es2") {
            Self::new(2, 0)
        } else {
            Self::new(1, 0)
        }
    }
}

impl fmt::Display for GlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Errors from parsing a `MAJOR[.MINOR]` version string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseVersionError {
    #[error("version string is empty")]
    Empty,
    #[error("invalid major version '{0}'")]
    Major(String),
    #[error("invalid minor version '{0}'")]
    Minor(String),
}

impl FromStr for GlVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseVersionError::Empty);
        }
        let (major, minor) = match s.split_once('.') {
            Some((major, minor)) => (major, Some(minor)),
            None => (s, None),
        };
        let major = major
            .parse::<u16>()
            .map_err(|_| ParseVersionError::Major(major.to_string()))?;
        let minor = match minor {
            Some(minor) => minor
                .parse::<u16>()
                .map_err(|_| ParseVersionError::Minor(minor.to_string()))?,
            None => 0,
        };
        Ok(Self::new(i32::from(major), i32::from(minor)))
    }
}

/// Client API family bound on the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApiFamily {
    #[default]
    OpenGlEs,
    OpenGl,
}

impl ApiFamily {
    pub fn name(self) -> &'static str {
        match self {
            ApiFamily::OpenGlEs => "OpenGL ES",
            ApiFamily::OpenGl => "OpenGL",
        }
    }
}

impl fmt::Display for ApiFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
