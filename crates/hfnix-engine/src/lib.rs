//! helmfile-nix Engine - rendering nix helmfiles and charts
//!
//! This crate turns a `helmfile.nix` into a helmfile YAML stream:
//! - `Evaluator`: runs nix (or a test double) to get JSON documents
//! - `transform`: JSON document arrays to multi-document YAML
//! - `ReleaseRenderer`: renders `nixChart` releases into chart directories
//! - `CleanupSet`: tracks those directories until the run is over
//! - `Packager`: hands the rendered helmfile to the `helmfile` binary

pub mod cleanup;
pub mod error;
pub mod evaluator;
pub mod mock;
pub mod packager;
pub mod release;
pub mod renderer;
pub mod tempfiles;
pub mod transform;

pub use cleanup::CleanupSet;
pub use error::{EngineError, Result};
pub use evaluator::{EvalRequest, EvalTarget, Evaluator, NixEvaluator};
pub use packager::{Helmfile, PackageRequest, Packager, write_rendered};
pub use release::ReleaseRenderer;
pub use renderer::{HELMFILE_ENTRIES, Renderer};
pub use transform::json_to_yaml_documents;
