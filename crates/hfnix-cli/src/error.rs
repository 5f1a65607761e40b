//! CLI error types with exit code handling
//!
//! Library errors are folded into a single diagnostic type whose variant
//! decides the process exit code.

use hfnix_core::CoreError;
use hfnix_engine::EngineError;
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Entry file, values or overrides are unusable
    #[error("Configuration error: {message}")]
    #[diagnostic(code(helmfile_nix::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Rendered documents could not be turned into a helmfile
    #[error("Render error: {message}")]
    #[diagnostic(code(helmfile_nix::cli::render))]
    Render {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// nix evaluation failed
    #[error("Evaluation failed: {message}")]
    #[diagnostic(
        code(helmfile_nix::cli::evaluation),
        help("Re-run with --show-trace for the full nix trace")
    )]
    Evaluation { message: String },

    /// helmfile could not be started
    #[error("{message}")]
    #[diagnostic(
        code(helmfile_nix::cli::packager),
        help("Is helmfile installed? Use --helmfile-bin to point at it")
    )]
    Packager { message: String },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(helmfile_nix::cli::io))]
    Io { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config { .. } => exit_codes::CONFIG_ERROR,
            CliError::Render { .. } => exit_codes::RENDER_ERROR,
            CliError::Evaluation { .. } => exit_codes::EVALUATION_ERROR,
            CliError::Packager { .. } => exit_codes::ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create a configuration error with help text
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a render error
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
            help: None,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::FileNotFound { .. } => CliError::config_with_help(
                err.to_string(),
                "Pass --file pointing at a helmfile.nix, a helmfile.gotmpl.nix or a directory holding one",
            ),
            CoreError::InvalidOverrideFormat { .. }
            | CoreError::OverrideValueParse { .. }
            | CoreError::NestedKeyNotMap { .. } => CliError::config_with_help(
                err.to_string(),
                "Use --state-values-set key=value[,other.key=value]",
            ),
            CoreError::Io { .. } => CliError::Io {
                message: err.to_string(),
            },
            _ => CliError::config(err.to_string()),
        }
    }
}

impl From<EngineError> for CliError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Core(core) => core.into(),
            EngineError::ChartNotFound { .. } => {
                let message = err.to_string();
                CliError::Render {
                    message,
                    help: Some("`nixChart` is resolved relative to the helmfile and must contain a chart.nix".to_string()),
                }
            }
            EngineError::Evaluation { .. } | EngineError::InvalidEvaluatorOutput { .. } => {
                CliError::Evaluation {
                    message: err.to_string(),
                }
            }
            EngineError::Packager { .. } => CliError::Packager {
                message: err.to_string(),
            },
            EngineError::Io { .. } => CliError::Io {
                message: err.to_string(),
            },
            _ => CliError::render(err.to_string()),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
