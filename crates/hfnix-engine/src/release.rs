//! Rendering of releases that point at a nix chart
//!
//! A release carrying `nixChart` is rewritten into a plain helmfile release:
//! the chart is evaluated, its documents are written to `resources.yaml` in a
//! fresh directory, and `chart` is pointed at that directory.

use std::path::{Path, PathBuf};

use hfnix_core::{ConfigTree, ConfigValue, Mapping, find_file_and_base};
use tempfile::Builder;
use tracing::{debug, info, warn};

use crate::cleanup::CleanupSet;
use crate::error::{EngineError, Result};
use crate::evaluator::{EvalRequest, EvalTarget, Evaluator};
use crate::transform::json_to_yaml_documents;

/// Release key naming a nix chart
pub const NIX_CHART: &str = "nixChart";

/// Entry file expected inside a nix chart directory
pub const CHART_ENTRY: &str = "chart.nix";

/// File holding a rendered chart's documents
pub const RESOURCES_FILE: &str = "resources.yaml";

/// Renders the nix charts referenced by a helmfile document
pub struct ReleaseRenderer<'a> {
    evaluator: &'a dyn Evaluator,
}

impl<'a> ReleaseRenderer<'a> {
    pub fn new(evaluator: &'a dyn Evaluator) -> Self {
        Self { evaluator }
    }

    /// Render every `nixChart` release of a document in place
    ///
    /// Chart directories are appended to `cleanup` as soon as they exist, so
    /// they are tracked even when a later release fails.
    pub fn render_releases(
        &self,
        document: &mut ConfigValue,
        base: &Path,
        cleanup: &mut CleanupSet,
    ) -> Result<()> {
        let Some(releases) = document.as_mapping_mut().and_then(|m| m.get_mut("releases")) else {
            return Ok(());
        };

        let found = releases.type_name();
        let Some(releases) = releases.as_sequence_mut() else {
            return Err(EngineError::ReleasesNotSequence { found });
        };

        for (index, release) in releases.iter_mut().enumerate() {
            let found = release.type_name();
            let Some(release) = release.as_mapping_mut() else {
                return Err(EngineError::ReleaseNotMapping { index, found });
            };
            self.render_release(index, release, base, cleanup)?;
        }

        Ok(())
    }

    fn render_release(
        &self,
        index: usize,
        release: &mut Mapping,
        base: &Path,
        cleanup: &mut CleanupSet,
    ) -> Result<()> {
        let chart = match release.get(NIX_CHART) {
            None | Some(ConfigValue::Null) => return Ok(()),
            Some(ConfigValue::String(chart)) => chart.clone(),
            Some(other) => {
                return Err(EngineError::NixChartNotString {
                    index,
                    found: other.type_name(),
                });
            }
        };

        let name = release
            .get("name")
            .and_then(ConfigValue::as_str)
            .ok_or(EngineError::ReleaseNameMissing { index })?
            .to_string();

        let located = find_file_and_base(&base.join(&chart), &[CHART_ENTRY]).map_err(|source| {
            EngineError::ChartNotFound {
                release: name.clone(),
                source,
            }
        })?;

        let values = prepare_chart_values(&name, release)?;
        let namespace = release
            .get("namespace")
            .and_then(ConfigValue::as_str)
            .unwrap_or_default()
            .to_string();

        info!("Rendering chart {} for release {}", located.path().display(), name);

        let request = EvalRequest {
            file_name: &located.file_name,
            base: &located.base,
            target: EvalTarget::Chart,
            values: &values,
        };
        let output = self.evaluator.evaluate(&request)?;
        let resources = json_to_yaml_documents(&output, |_| Ok(()))?;

        let dir = materialize(&namespace, &name, &resources, cleanup)?;
        debug!("Rendered release {} into {}", name, dir.display());

        release.insert(
            "chart".to_string(),
            ConfigValue::String(dir.display().to_string()),
        );
        release.remove(NIX_CHART);
        Ok(())
    }
}

/// Build the values handed to a chart and strip `values` from the release
///
/// `values` may be a mapping or a list of mappings merged left to right. The
/// remaining release is injected under `release`, and a non-empty string
/// namespace under `namespace`.
pub fn prepare_chart_values(name: &str, release: &mut Mapping) -> Result<ConfigTree> {
    let invalid = |reason: String| EngineError::InvalidReleaseValues {
        release: name.to_string(),
        reason,
    };

    let mut values = match release.remove("values") {
        None | Some(ConfigValue::Null) => ConfigTree::new(),
        Some(ConfigValue::Mapping(map)) => ConfigTree::from(map),
        Some(ConfigValue::Sequence(layers)) => {
            let layers = layers
                .into_iter()
                .enumerate()
                .map(|(i, layer)| match layer {
                    ConfigValue::Mapping(map) => Ok(ConfigTree::from(map)),
                    other => Err(invalid(format!(
                        "entry {} is a {}, expected a mapping",
                        i,
                        other.type_name()
                    ))),
                })
                .collect::<Result<Vec<_>>>()?;
            ConfigTree::merge_all(layers)
        }
        Some(other) => {
            return Err(invalid(format!(
                "expected a mapping or a list of mappings, found {}",
                other.type_name()
            )));
        }
    };

    if let Some(previous) = values.insert("release", ConfigValue::Mapping(release.clone())) {
        if !previous.is_null() {
            warn!("Release {}: `release` in values is overwritten", name);
        }
    }

    if let Some(namespace) = release.get("namespace").and_then(ConfigValue::as_str) {
        if !namespace.is_empty() {
            let previous = values.insert("namespace", ConfigValue::from(namespace));
            if previous.is_some_and(|p| !p.is_null()) {
                warn!("Release {}: `namespace` in values is overwritten", name);
            }
        }
    }

    Ok(values)
}

/// Write rendered resources to a fresh chart directory
fn materialize(
    namespace: &str,
    name: &str,
    resources: &str,
    cleanup: &mut CleanupSet,
) -> Result<PathBuf> {
    let prefix = format!("nixChart-{}-{}-", sanitize(namespace), sanitize(name));
    let dir = Builder::new()
        .prefix(&prefix)
        .tempdir()
        .map_err(|e| EngineError::io(std::env::temp_dir(), e))?
        .keep();
    cleanup.push(&dir);

    let file = dir.join(RESOURCES_FILE);
    std::fs::write(&file, resources).map_err(|e| EngineError::io(&file, e))?;
    Ok(dir)
}

/// Keep directory names free of separators
fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
