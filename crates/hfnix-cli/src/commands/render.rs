//! Render command - evaluate the helmfile and its nix charts

use std::path::PathBuf;

use hfnix_core::{environment, find_file_and_base, overrides};
use hfnix_engine::{CleanupSet, Evaluator, HELMFILE_ENTRIES, Renderer};
use tracing::debug;

use super::Options;
use crate::error::Result;

/// A rendered helmfile, ready to be printed or handed to helmfile
#[derive(Debug)]
pub struct Rendered {
    /// Entry file name, decides the rendered file extension
    pub file_name: String,
    pub base: PathBuf,
    pub yaml: String,
}

pub fn run(
    options: &Options,
    evaluator: &dyn Evaluator,
    cleanup: &mut CleanupSet,
) -> Result<Rendered> {
    // Reject malformed overrides before touching anything else
    overrides::parse(&options.state_values)?;

    let located = find_file_and_base(&options.file, HELMFILE_ENTRIES)?;
    debug!("Using {}", located.path().display());

    let values = environment::load_values(&located.base, &options.environment, &options.state_values)?;
    debug!("Loaded {} top-level values", values.inner().len());

    let yaml = Renderer::new(evaluator).render(
        &located.file_name,
        &located.base,
        &options.environment,
        &values,
        cleanup,
    )?;

    Ok(Rendered {
        file_name: located.file_name,
        base: located.base,
        yaml,
    })
}
