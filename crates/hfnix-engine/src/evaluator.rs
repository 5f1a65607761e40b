//! Nix evaluation
//!
//! The evaluator turns an entry file plus a value tree into a JSON array of
//! documents. Production code shells out to `nix eval`; tests plug in
//! [`crate::mock::MockEvaluator`].

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use hfnix_core::ConfigTree;
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::tempfiles;

/// Expression file with the `render` and `renderChart` entry points
pub const EVAL_NIX: &str = include_str!("../nix/eval.nix");

/// What is being evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalTarget<'a> {
    /// A top-level helmfile for an environment
    Helmfile { environment: &'a str },
    /// A chart referenced by a release
    Chart,
}

/// A single evaluation request
#[derive(Debug, Clone, Copy)]
pub struct EvalRequest<'a> {
    /// Entry file name inside `base`
    pub file_name: &'a str,
    /// Directory holding the entry file
    pub base: &'a Path,
    pub target: EvalTarget<'a>,
    /// Values handed to the entry file
    pub values: &'a ConfigTree,
}

impl EvalRequest<'_> {
    /// Full path of the entry file
    pub fn entry(&self) -> PathBuf {
        self.base.join(self.file_name)
    }

    pub(crate) fn failure(&self, message: impl Into<String>) -> EngineError {
        EngineError::Evaluation {
            target: self.entry().display().to_string(),
            message: message.into(),
        }
    }
}

/// Evaluates entry files to JSON
pub trait Evaluator {
    /// Evaluate the request, returning the raw JSON output
    fn evaluate(&self, request: &EvalRequest<'_>) -> Result<Vec<u8>>;
}

/// Evaluator backed by the `nix` command line tool
#[derive(Debug, Clone)]
pub struct NixEvaluator {
    binary: PathBuf,
    show_trace: bool,
}

impl Default for NixEvaluator {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("nix"),
            show_trace: false,
        }
    }
}

impl NixEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different `nix` binary
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Pass `--show-trace` to nix
    pub fn with_show_trace(mut self, show_trace: bool) -> Self {
        self.show_trace = show_trace;
        self
    }

    /// Build the nix expression for a request
    pub fn expression(eval_file: &Path, request: &EvalRequest<'_>, values_file: &Path) -> String {
        let eval = eval_file.display().to_string();
        let base = request.base.display().to_string();
        let values = values_file.display().to_string();

        match request.target {
            EvalTarget::Helmfile { environment } => format!(
                "(import {}).render {} {} {} {}",
                nix_string(&eval),
                nix_string(request.file_name),
                nix_string(&base),
                nix_string(environment),
                nix_string(&values),
            ),
            EvalTarget::Chart => format!(
                "(import {}).renderChart {} {} {}",
                nix_string(&eval),
                nix_string(request.file_name),
                nix_string(&base),
                nix_string(&values),
            ),
        }
    }

    /// Command line arguments for `nix`
    pub fn args(&self, expression: &str) -> Vec<String> {
        let mut args: Vec<String> = [
            "--extra-experimental-features",
            "nix-command",
            "--extra-experimental-features",
            "flakes",
            "eval",
            "--json",
            "--impure",
            "--expr",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        args.push(expression.to_string());

        if self.show_trace {
            args.push("--show-trace".to_string());
        }
        args
    }
}

impl Evaluator for NixEvaluator {
    fn evaluate(&self, request: &EvalRequest<'_>) -> Result<Vec<u8>> {
        let eval_file = tempfiles::write_eval_expression(EVAL_NIX)?;
        let values_file = tempfiles::write_values(request.values)?;

        let expression = Self::expression(eval_file.path(), request, values_file.path());
        let args = self.args(&expression);
        debug!("Running {} {}", self.binary.display(), args.join(" "));

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output();

        tempfiles::discard(eval_file);
        tempfiles::discard(values_file);

        let output = output
            .map_err(|e| request.failure(format!("could not run {}: {}", self.binary.display(), e)))?;

        if !output.status.success() {
            return Err(request.failure(format!(
                "{} exited with {}\n{}",
                self.binary.display(),
                output.status,
                String::from_utf8_lossy(&output.stdout)
            )));
        }

        Ok(output.stdout)
    }
}

/// Quote a string as a nix string literal
fn nix_string(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace("${", "\\${");
    format!("\"{escaped}\"")
}
