//! Exit codes for helmfile-nix
//!
//! When helmfile runs, its own exit code is passed through instead.

/// Success - operation completed without errors
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure, or no command given
pub const ERROR: i32 = 1;

/// Configuration error - entry file, values files or state value overrides
pub const CONFIG_ERROR: i32 = 2;

/// Render error - malformed helmfile documents or releases
pub const RENDER_ERROR: i32 = 3;

/// Evaluation error - nix failed or returned something unusable
pub const EVALUATION_ERROR: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;
