//! In-memory evaluator and packager for tests
//!
//! `MockEvaluator` answers from canned JSON instead of running nix, and
//! `MockPackager` records what would have been handed to helmfile.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use hfnix_core::{ConfigTree, ConfigValue};

use crate::error::Result;
use crate::evaluator::{EvalRequest, EvalTarget, Evaluator};
use crate::packager::{PackageRequest, Packager};

/// A recorded evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct EvalCall {
    pub file_name: String,
    pub base: PathBuf,
    /// Set for helmfile evaluations, `None` for charts
    pub environment: Option<String>,
    pub values: ConfigTree,
}

/// Evaluator returning canned output
///
/// Chart output is looked up by `release.name` in the chart values.
#[derive(Clone, Default)]
pub struct MockEvaluator {
    helmfile: Option<Vec<u8>>,
    charts: HashMap<String, Vec<u8>>,
    calls: Arc<RwLock<Vec<EvalCall>>>,
}

impl MockEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Output for the top-level helmfile
    pub fn with_helmfile(mut self, json: &[u8]) -> Self {
        self.helmfile = Some(json.to_vec());
        self
    }

    /// Output for the chart of a release
    pub fn with_chart(mut self, release: &str, json: &[u8]) -> Self {
        self.charts.insert(release.to_string(), json.to_vec());
        self
    }

    /// All evaluations so far
    pub fn calls(&self) -> Vec<EvalCall> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

impl Evaluator for MockEvaluator {
    fn evaluate(&self, request: &EvalRequest<'_>) -> Result<Vec<u8>> {
        let environment = match request.target {
            EvalTarget::Helmfile { environment } => Some(environment.to_string()),
            EvalTarget::Chart => None,
        };
        self.calls.write().unwrap().push(EvalCall {
            file_name: request.file_name.to_string(),
            base: request.base.to_path_buf(),
            environment,
            values: request.values.clone(),
        });

        let output = match request.target {
            EvalTarget::Helmfile { .. } => self.helmfile.clone(),
            EvalTarget::Chart => request
                .values
                .get("release.name")
                .and_then(ConfigValue::as_str)
                .and_then(|name| self.charts.get(name).cloned()),
        };

        output.ok_or_else(|| request.failure("no canned output"))
    }
}

/// A recorded packager run
#[derive(Debug, Clone, PartialEq)]
pub struct PackageCall {
    pub document: Option<PathBuf>,
    /// Content of the document at the time of the call
    pub content: Option<String>,
    pub base: PathBuf,
    pub environment: String,
    pub args: Vec<String>,
}

/// Packager that records calls and returns a fixed exit code
#[derive(Clone, Default)]
pub struct MockPackager {
    exit_code: i32,
    calls: Arc<RwLock<Vec<PackageCall>>>,
}

impl MockPackager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    pub fn calls(&self) -> Vec<PackageCall> {
        self.calls.read().unwrap().clone()
    }
}

impl Packager for MockPackager {
    fn package(&self, request: &PackageRequest<'_>) -> Result<i32> {
        self.calls.write().unwrap().push(PackageCall {
            document: request.document.map(|p| p.to_path_buf()),
            content: request
                .document
                .and_then(|p| std::fs::read_to_string(p).ok()),
            base: request.base.to_path_buf(),
            environment: request.environment.to_string(),
            args: request.args.to_vec(),
        });
        Ok(self.exit_code)
    }
}
