//! Hand-off of the rendered helmfile to the `helmfile` binary

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::tempfiles;

/// Entry suffix that marks a templated helmfile
pub const GOTMPL_ENTRY_SUFFIX: &str = ".gotmpl.nix";

/// A packager invocation
#[derive(Debug, Clone, Copy)]
pub struct PackageRequest<'a> {
    /// Rendered helmfile; `None` runs the packager without `--file`
    pub document: Option<&'a Path>,
    /// Working directory
    pub base: &'a Path,
    pub environment: &'a str,
    /// Command and arguments forwarded untouched
    pub args: &'a [String],
}

/// Runs the deployment tool on a rendered helmfile
pub trait Packager {
    /// Run the tool and return its exit code
    fn package(&self, request: &PackageRequest<'_>) -> Result<i32>;
}

/// Packager backed by the `helmfile` binary
#[derive(Debug, Clone)]
pub struct Helmfile {
    binary: PathBuf,
}

impl Default for Helmfile {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("helmfile"),
        }
    }
}

impl Helmfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Command line arguments for a request
    pub fn args(request: &PackageRequest<'_>) -> Vec<String> {
        let mut args = vec!["-e".to_string(), request.environment.to_string()];
        if let Some(document) = request.document {
            args.push("--file".to_string());
            args.push(document.display().to_string());
        }
        args.extend(request.args.iter().cloned());
        args
    }
}

impl Packager for Helmfile {
    fn package(&self, request: &PackageRequest<'_>) -> Result<i32> {
        let args = Self::args(request);
        debug!("Running {} {}", self.binary.display(), args.join(" "));

        let status = Command::new(&self.binary)
            .args(&args)
            .current_dir(request.base)
            .status()
            .map_err(|source| EngineError::Packager {
                program: self.binary.display().to_string(),
                source,
            })?;

        // Killed by a signal
        Ok(status.code().unwrap_or(1))
    }
}

/// Extension of the rendered file for an entry file name
pub fn rendered_extension(file_name: &str) -> &'static str {
    if file_name.ends_with(GOTMPL_ENTRY_SUFFIX) {
        ".yaml.gotmpl"
    } else {
        ".yaml"
    }
}

/// Write the rendered helmfile next to the entry file
///
/// The file is removed when the returned handle is dropped.
pub fn write_rendered(file_name: &str, base: &Path, content: &str) -> Result<NamedTempFile> {
    tempfiles::write_in(base, "helmfile.", rendered_extension(file_name), content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_rendered_extension() {
        assert_eq!(rendered_extension("helmfile.nix"), ".yaml");
        assert_eq!(rendered_extension("helmfile.gotmpl.nix"), ".yaml.gotmpl");
    }

    #[test]
    fn test_write_rendered() {
        let dir = TempDir::new().unwrap();
        let file = write_rendered("helmfile.gotmpl.nix", dir.path(), "releases: []\n").unwrap();

        assert_eq!(file.path().parent().unwrap(), dir.path());
        let name = file.path().file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("helmfile."));
        assert!(name.ends_with(".yaml.gotmpl"));
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "releases: []\n");

        let path = file.path().to_path_buf();
        drop(file);
        assert!(!path.exists());
    }

    #[test]
    fn test_args_with_document() {
        let args = vec!["diff".to_string(), "--context".to_string(), "3".to_string()];
        let request = PackageRequest {
            document: Some(Path::new("/work/helmfile.abc.yaml")),
            base: Path::new("/work"),
            environment: "prod",
            args: &args,
        };

        assert_eq!(
            Helmfile::args(&request),
            vec!["-e", "prod", "--file", "/work/helmfile.abc.yaml", "diff", "--context", "3"]
        );
    }

    #[test]
    fn test_args_without_document() {
        let request = PackageRequest {
            document: None,
            base: Path::new("/work"),
            environment: "dev",
            args: &[],
        };

        assert_eq!(Helmfile::args(&request), vec!["-e", "dev"]);
    }

    #[test]
    fn test_missing_binary() {
        let dir = TempDir::new().unwrap();
        let request = PackageRequest {
            document: None,
            base: dir.path(),
            environment: "dev",
            args: &[],
        };

        let err = Helmfile::new()
            .with_binary("/nonexistent/bin/helmfile")
            .package(&request)
            .unwrap_err();
        assert!(matches!(err, EngineError::Packager { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_code_is_returned() {
        let dir = TempDir::new().unwrap();
        let request = PackageRequest {
            document: None,
            base: dir.path(),
            environment: "dev",
            args: &[],
        };

        let code = Helmfile::new().with_binary("false").package(&request).unwrap();
        assert_eq!(code, 1);

        let code = Helmfile::new().with_binary("true").package(&request).unwrap();
        assert_eq!(code, 0);
    }
}
