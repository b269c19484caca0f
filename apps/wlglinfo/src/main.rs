mod cli;

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use clap::error::ErrorKind;
use glinfo_egl::{GlContext, load_egl};
use glinfo_report::{ReportRenderer, TextRenderer};
use glinfo_session::Session;
use glinfo_wayland::WaylandPlatform;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

fn main() -> ExitCode {
    let args: Vec<OsString> = std::env::args_os().collect();
    execute(args, |cli, program| {
        init_tracing(cli.verbose);
        match report(cli, program) {
            Ok(code) => code,
            Err(err) => {
                eprintln!("wlglinfo: {err:#}");
                ExitCode::FAILURE
            }
        }
    })
}

/// Parse `args` and hand the result to `start`. Argument errors never reach
/// `start`.
fn execute<F>(args: Vec<OsString>, start: F) -> ExitCode
where
    F: FnOnce(&Cli, &str) -> ExitCode,
{
    let program = args
        .first()
        .map(|arg| arg.to_string_lossy().into_owned())
        .unwrap_or_default();
    match Cli::try_parse_from(&args) {
        Ok(cli) => start(&cli, &program),
        Err(err) => argument_exit(&err),
    }
}

fn argument_exit(err: &clap::Error) -> ExitCode {
    // Help and version go to stdout, real errors to stderr.
    let _ = err.print();
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn report(cli: &Cli, program: &str) -> anyhow::Result<ExitCode> {
    let egl = load_egl().context("loading EGL")?;
    let request = cli.request(program);
    info!(
        library = egl.path(),
        family = %request.family,
        version = %request.version,
        "requesting context"
    );

    let mut session = Session::new(&egl);
    let outcome = session.run(request, WaylandPlatform::connect, |egl| {
        GlContext::load(egl).map_err(|e| e.to_string())
    });

    match outcome {
        Ok(report) => {
            let text = TextRenderer::default().render(&report);
            std::io::stdout()
                .lock()
                .write_all(text.as_bytes())
                .context("writing report")?;
            for diagnostic in report.diagnostics() {
                eprintln!("{diagnostic}");
            }
        }
        Err(err) => eprintln!("wlglinfo: {err}"),
    }

    Ok(ExitCode::from(session.exit_status()))
}
