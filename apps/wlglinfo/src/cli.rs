use clap::{Parser, ValueEnum};
use glinfo_common::{ApiFamily, GlVersion};
use glinfo_session::ContextRequest;

#[derive(Debug, Parser)]
#[command(
    name = "wlglinfo",
    version,
    about = "Print EGL and GL/GLES capabilities of the current Wayland session"
)]
pub struct Cli {
    /// Context version to request, as MAJOR.MINOR
    #[arg(long, value_name = "MAJOR.MINOR")]
    pub glver: Option<GlVersion>,

    /// Client API to bind
    #[arg(long, value_enum, default_value_t = Api::Gles)]
    pub api: Api,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Api {
    /// OpenGL ES
    Gles,
    /// Desktop OpenGL
    Gl,
}

impl From<Api> for ApiFamily {
    fn from(api: Api) -> Self {
        match api {
            Api::Gles => ApiFamily::OpenGlEs,
            Api::Gl => ApiFamily::OpenGl,
        }
    }
}

impl Cli {
    /// Context request for this invocation; `program` picks the default
    /// version when `--glver` is absent.
    pub fn request(&self, program: &str) -> ContextRequest {
        ContextRequest {
            family: self.api.into(),
            version: self
                .glver
                .unwrap_or_else(|| GlVersion::default_for_program(program)),
        }
    }
}
