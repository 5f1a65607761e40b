//! Short-lived temporary files
//!
//! Every file created here is a `NamedTempFile` and is removed when dropped.
//! Callers should hand them back through [`discard`] so a failed removal
//! shows up in the logs.

use std::io::Write;
use std::path::Path;

use hfnix_core::ConfigTree;
use tempfile::{Builder, NamedTempFile};
use tracing::warn;

use crate::error::{EngineError, Result};

/// Write the evaluator expression to `eval.*.nix` in the temp dir
pub fn write_eval_expression(content: &str) -> Result<NamedTempFile> {
    write(Builder::new().prefix("eval.").suffix(".nix"), None, content)
}

/// Write values as JSON to `val.*.json` in the temp dir
pub fn write_values(values: &ConfigTree) -> Result<NamedTempFile> {
    let json = values.to_json()?;
    write(Builder::new().prefix("val.").suffix(".json"), None, &json)
}

/// Write `content` to `<dir>/<prefix><random><suffix>`
pub fn write_in(dir: &Path, prefix: &str, suffix: &str, content: &str) -> Result<NamedTempFile> {
    write(Builder::new().prefix(prefix).suffix(suffix), Some(dir), content)
}

fn write(builder: &mut Builder<'_, '_>, dir: Option<&Path>, content: &str) -> Result<NamedTempFile> {
    let created = match dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    };
    let mut file = created.map_err(|e| {
        EngineError::io(dir.map_or_else(std::env::temp_dir, Path::to_path_buf), e)
    })?;

    file.write_all(content.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|e| EngineError::io(file.path(), e))?;

    Ok(file)
}

/// Remove a temporary file, logging instead of failing
pub fn discard(file: NamedTempFile) {
    let path = file.path().to_path_buf();
    if let Err(e) = file.close() {
        warn!("Failed to remove temporary file {}: {}", path.display(), e);
    }
}
