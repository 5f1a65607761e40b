//! Tracking of chart output directories
//!
//! Charts are rendered into directories that must outlive the render pass,
//! because helmfile reads them afterwards. They are collected here and removed
//! once the caller is done.

use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::{debug, warn};

/// Directories to remove when the run is over
#[derive(Debug, Default)]
#[must_use = "directories are only removed by calling `cleanup`"]
pub struct CleanupSet {
    dirs: Vec<PathBuf>,
}

impl CleanupSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a directory
    pub fn push(&mut self, dir: impl Into<PathBuf>) {
        self.dirs.push(dir.into());
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Remove every tracked directory
    ///
    /// Missing directories are skipped. Other failures are logged and the
    /// remaining directories are still removed.
    pub fn cleanup(self) {
        for dir in self.dirs {
            match std::fs::remove_dir_all(&dir) {
                Ok(()) => debug!("Removed {}", dir.display()),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!("Already gone: {}", dir.display());
                }
                Err(e) => warn!("Failed to remove {}: {}", dir.display(), e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_removes_directories_recursively() {
        let root = TempDir::new().unwrap();
        let chart = root.path().join("nixChart-ns-web");
        std::fs::create_dir_all(chart.join("nested")).unwrap();
        std::fs::write(chart.join("resources.yaml"), "a: 1\n").unwrap();

        let mut set = CleanupSet::new();
        set.push(&chart);
        assert_eq!(set.len(), 1);

        set.cleanup();
        assert!(!chart.exists());
    }

    #[test]
    fn test_missing_directory_is_skipped() {
        let root = TempDir::new().unwrap();
        let present = root.path().join("present");
        std::fs::create_dir(&present).unwrap();

        let mut set = CleanupSet::new();
        set.push(root.path().join("missing"));
        set.push(&present);
        set.cleanup();

        assert!(!present.exists());
    }

    #[test]
    fn test_empty_set() {
        let set = CleanupSet::new();
        assert!(set.is_empty());
        set.cleanup();
    }

    #[test]
    fn test_removal_failure_does_not_stop_the_pass() {
        let root = TempDir::new().unwrap();
        let not_a_dir = root.path().join("resources.yaml");
        std::fs::write(&not_a_dir, "a: 1\n").unwrap();
        let chart = root.path().join("nixChart-ns-web");
        std::fs::create_dir(&chart).unwrap();

        let mut set = CleanupSet::new();
        set.push(&not_a_dir);
        set.push(&chart);
        set.cleanup();

        assert!(not_a_dir.exists());
        assert!(!chart.exists());
    }
}
