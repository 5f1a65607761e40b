//! helmfile-nix Core - value types and configuration layering
//!
//! This crate provides the foundational types used throughout helmfile-nix:
//! - `ConfigValue`: A type-preserving YAML/JSON value
//! - `ConfigTree`: Configuration values with deep merge support
//! - `Override`: Command-line `key=value` overrides
//! - Environment value loading and entry-file discovery

pub mod discovery;
pub mod environment;
pub mod error;
pub mod overrides;
pub mod value;
pub mod values;

pub use discovery::{Located, find_file_and_base};
pub use error::{CoreError, Result};
pub use overrides::Override;
pub use value::{ConfigValue, Mapping};
pub use values::ConfigTree;
