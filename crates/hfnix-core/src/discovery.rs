//! Entry-file discovery
//!
//! A path given on the command line (or in a release's `nixChart`) may point
//! at the entry file itself or at the directory holding it.

use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};

/// A located entry file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    /// File name of the entry (one of the wanted names)
    pub file_name: String,
    /// Absolute directory containing the entry
    pub base: PathBuf,
}

impl Located {
    /// Full path to the entry file
    pub fn path(&self) -> PathBuf {
        self.base.join(&self.file_name)
    }
}

/// Find the entry file and its base directory
///
/// `wanted` lists acceptable file names in order of preference.
pub fn find_file_and_base(input: &Path, wanted: &[&str]) -> Result<Located> {
    let not_found = |path: &Path| CoreError::FileNotFound {
        path: path.to_path_buf(),
        expected: wanted.join(", "),
    };

    let path = std::path::absolute(input).map_err(|source| CoreError::Io {
        path: input.to_path_buf(),
        source,
    })?;

    if path.is_dir() {
        for name in wanted {
            if path.join(name).is_file() {
                return Ok(Located {
                    file_name: (*name).to_string(),
                    base: path,
                });
            }
        }
        return Err(not_found(&path));
    }

    if !path.exists() {
        return Err(not_found(&path));
    }

    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    match wanted.iter().find(|w| **w == file_name) {
        Some(name) => Ok(Located {
            file_name: (*name).to_string(),
            base: path.parent().map(Path::to_path_buf).unwrap_or_default(),
        }),
        None => Err(not_found(&path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HELMFILES: &[&str] = &["helmfile.nix", "helmfile.gotmpl.nix"];

    #[test]
    fn test_find_in_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("helmfile.nix"), "{ }").unwrap();

        let located = find_file_and_base(dir.path(), HELMFILES).unwrap();

        assert_eq!(located.file_name, "helmfile.nix");
        assert_eq!(located.base, dir.path());
        assert_eq!(located.path(), dir.path().join("helmfile.nix"));
    }

    #[test]
    fn test_find_templated_in_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("helmfile.gotmpl.nix"), "{ }").unwrap();

        let located = find_file_and_base(dir.path(), HELMFILES).unwrap();
        assert_eq!(located.file_name, "helmfile.gotmpl.nix");
    }

    #[test]
    fn test_find_direct_file() {
        let dir = TempDir::new().unwrap();
        let chart = dir.path().join("chart.nix");
        std::fs::write(&chart, "{ }").unwrap();

        let located = find_file_and_base(&chart, &["chart.nix"]).unwrap();

        assert_eq!(located.file_name, "chart.nix");
        assert_eq!(located.base, dir.path());
    }

    #[test]
    fn test_wrong_file_name() {
        let dir = TempDir::new().unwrap();
        let wrong = dir.path().join("other.nix");
        std::fs::write(&wrong, "{ }").unwrap();

        match find_file_and_base(&wrong, &["chart.nix"]).unwrap_err() {
            CoreError::FileNotFound { path, expected } => {
                assert_eq!(path, wrong);
                assert_eq!(expected, "chart.nix");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_directory_without_entry() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            find_file_and_base(dir.path(), HELMFILES).unwrap_err(),
            CoreError::FileNotFound { .. }
        ));
    }

    #[test]
    fn test_missing_path() {
        assert!(matches!(
            find_file_and_base(Path::new("/nonexistent/chart"), &["chart.nix"]).unwrap_err(),
            CoreError::FileNotFound { .. }
        ));
    }
}
