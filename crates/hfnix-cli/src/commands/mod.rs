//! CLI commands

pub mod forward;
pub mod render;

use std::path::PathBuf;

/// Last argument that prints the rendered helmfile instead of running helmfile
pub const RENDER_COMMAND: &str = "render";

/// Options shared by every command
#[derive(Debug, Clone)]
pub struct Options {
    /// Entry file or a directory holding one
    pub file: PathBuf,
    pub environment: String,
    /// Raw `--state-values-set` arguments
    pub state_values: Vec<String>,
    /// Command and arguments for helmfile
    pub args: Vec<String>,
}

impl Options {
    /// The helmfile command, i.e. the first argument that is not a flag
    pub fn command(&self) -> Option<&str> {
        self.args
            .iter()
            .map(String::as_str)
            .find(|arg| !arg.starts_with('-'))
    }

    /// Whether the rendered helmfile should be printed
    pub fn is_render(&self) -> bool {
        self.args.last().is_some_and(|arg| arg == RENDER_COMMAND)
    }
}
