//! Top-level helmfile rendering

use std::path::Path;

use hfnix_core::{ConfigTree, ConfigValue};
use tracing::debug;

use crate::cleanup::CleanupSet;
use crate::error::Result;
use crate::evaluator::{EvalRequest, EvalTarget, Evaluator};
use crate::release::ReleaseRenderer;
use crate::transform::json_to_yaml_documents;

/// Accepted entry file names, in order of preference
pub const HELMFILE_ENTRIES: &[&str] = &["helmfile.nix", "helmfile.gotmpl.nix"];

/// Renders a helmfile entry into a YAML document stream
pub struct Renderer<'a> {
    evaluator: &'a dyn Evaluator,
}

impl<'a> Renderer<'a> {
    pub fn new(evaluator: &'a dyn Evaluator) -> Self {
        Self { evaluator }
    }

    /// Evaluate the entry and render every nix chart it references
    ///
    /// Chart directories land in `cleanup`, also when rendering fails part
    /// way through.
    pub fn render(
        &self,
        file_name: &str,
        base: &Path,
        environment: &str,
        values: &ConfigTree,
        cleanup: &mut CleanupSet,
    ) -> Result<String> {
        let request = EvalRequest {
            file_name,
            base,
            target: EvalTarget::Helmfile { environment },
            values,
        };
        let output = self.evaluator.evaluate(&request)?;
        debug!("Evaluated {} ({} bytes)", request.entry().display(), output.len());

        let releases = ReleaseRenderer::new(self.evaluator);
        json_to_yaml_documents(&output, |document: &mut ConfigValue| {
            if document.get("releases").is_some() {
                releases.render_releases(document, base, cleanup)?;
            }
            Ok(())
        })
    }
}
