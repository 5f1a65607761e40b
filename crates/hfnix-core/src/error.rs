//! Core error types

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("File not found: {path} (expected one of: {expected})")]
    FileNotFound { path: PathBuf, expected: String },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Document root of {path} is not a mapping")]
    RootNotMapping { path: PathBuf },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid state value: '{fragment}'. Expected key=value")]
    InvalidOverrideFormat { fragment: String },

    #[error("Failed to parse value for '{key}': {source}")]
    OverrideValueParse {
        key: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Cannot set '{path}': nested key '{segment}' is not a map")]
    NestedKeyNotMap { path: String, segment: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to serialize values: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
