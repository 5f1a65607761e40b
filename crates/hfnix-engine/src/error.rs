//! Engine error types

use std::path::PathBuf;

use hfnix_core::CoreError;
use thiserror::Error;

/// Main engine error type
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("`releases` is not a sequence (found {found})")]
    ReleasesNotSequence { found: &'static str },

    #[error("Release at index {index} is not a mapping (found {found})")]
    ReleaseNotMapping { index: usize, found: &'static str },

    #[error("Release at index {index}: expected `nixChart` to be a string, found {found}")]
    NixChartNotString { index: usize, found: &'static str },

    #[error("Release at index {index} has a `nixChart` but no string `name`")]
    ReleaseNameMissing { index: usize },

    #[error("Release '{release}': invalid `values`: {reason}")]
    InvalidReleaseValues { release: String, reason: String },

    #[error("Release '{release}': chart not found: {source}")]
    ChartNotFound {
        release: String,
        #[source]
        source: CoreError,
    },

    #[error("Evaluation of {target} failed: {message}")]
    Evaluation { target: String, message: String },

    #[error("Evaluator returned invalid output: {source}")]
    InvalidEvaluatorOutput {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize document: {0}")]
    Serialization(#[from] serde_yaml::Error),

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to run {program}: {source}")]
    Packager {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl EngineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
