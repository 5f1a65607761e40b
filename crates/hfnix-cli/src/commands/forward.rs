//! Forward command - render the helmfile and run helmfile on it

use std::io::Write;
use std::path::Path;

use console::style;
use hfnix_engine::{
    CleanupSet, Evaluator, PackageRequest, Packager, tempfiles, write_rendered,
};
use tracing::debug;

use super::{Options, render};
use crate::error::{CliError, Result};
use crate::exit_codes;

/// Run a helmfile command, returning the exit code for the process
///
/// With `render` as the last argument the rendered helmfile goes to `out`
/// instead. Chart directories are removed before returning, on success and
/// on failure.
pub fn run(
    options: &Options,
    evaluator: &dyn Evaluator,
    packager: &dyn Packager,
    out: &mut dyn Write,
) -> Result<i32> {
    if options.command().is_none() {
        eprintln!(
            "{} no command given, showing helmfile usage",
            style("helmfile-nix:").yellow().bold()
        );
        packager.package(&PackageRequest {
            document: None,
            base: Path::new("."),
            environment: &options.environment,
            args: &options.args,
        })?;
        return Ok(exit_codes::ERROR);
    }

    let mut cleanup = CleanupSet::new();
    let result = render_and_forward(options, evaluator, packager, out, &mut cleanup);
    cleanup.cleanup();
    result
}

fn render_and_forward(
    options: &Options,
    evaluator: &dyn Evaluator,
    packager: &dyn Packager,
    out: &mut dyn Write,
    cleanup: &mut CleanupSet,
) -> Result<i32> {
    let rendered = render::run(options, evaluator, cleanup)?;

    if options.is_render() {
        out.write_all(rendered.yaml.as_bytes())
            .and_then(|()| out.flush())
            .map_err(|e| CliError::Io {
                message: e.to_string(),
            })?;
        return Ok(exit_codes::SUCCESS);
    }

    let document = write_rendered(&rendered.file_name, &rendered.base, &rendered.yaml)?;
    debug!("Wrote {}", document.path().display());

    let code = packager.package(&PackageRequest {
        document: Some(document.path()),
        base: &rendered.base,
        environment: &options.environment,
        args: &options.args,
    });
    tempfiles::discard(document);

    Ok(code?)
}
