//! Environment values
//!
//! Values for an environment are layered as:
//! 1. `<base>/env/defaults.yaml`
//! 2. `<base>/env/<environment>.yaml`
//! 3. `--state-values-set` overrides
//!
//! Both files are optional.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::overrides;
use crate::values::ConfigTree;

/// Directory holding environment files, relative to the base
pub const ENV_DIR: &str = "env";

/// Name of the defaults file (without extension)
pub const DEFAULTS: &str = "defaults";

/// Path of the values file for `name` under `base`
pub fn values_path(base: &Path, name: &str) -> PathBuf {
    base.join(ENV_DIR).join(format!("{name}.yaml"))
}

/// Load, merge and override the values for an environment
pub fn load_values<S: AsRef<str>>(base: &Path, environment: &str, overrides: &[S]) -> Result<ConfigTree> {
    let defaults = ConfigTree::load(values_path(base, DEFAULTS))?;
    let env_values = ConfigTree::load(values_path(base, environment))?;

    overrides::apply(defaults.merged(&env_values), overrides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use tempfile::TempDir;

    fn write_env(dir: &TempDir, name: &str, content: &str) {
        let env_dir = dir.path().join(ENV_DIR);
        std::fs::create_dir_all(&env_dir).unwrap();
        std::fs::write(env_dir.join(format!("{name}.yaml")), content).unwrap();
    }

    #[test]
    fn test_missing_environment_files() {
        let dir = TempDir::new().unwrap();

        let values = load_values::<&str>(dir.path(), "dev", &[]).unwrap();

        assert!(values.is_empty());
        assert_eq!(values.to_json().unwrap(), "{}");
    }

    #[test]
    fn test_environment_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        write_env(&dir, "defaults", "replicas: 1\nimage:\n  tag: latest\n  repo: nginx\n");
        write_env(&dir, "prod", "replicas: 3\nimage:\n  tag: \"1.25\"\n");

        let values = load_values::<&str>(dir.path(), "prod", &[]).unwrap();

        assert_eq!(
            values.to_json().unwrap(),
            r#"{"image":{"repo":"nginx","tag":"1.25"},"replicas":3}"#
        );
    }

    #[test]
    fn test_multiple_overrides() {
        let dir = TempDir::new().unwrap();
        write_env(&dir, "defaults", "{}");

        let values = load_values(dir.path(), "dev", &["foo=1,bar=2,baz=3"]).unwrap();

        assert_eq!(values.to_json().unwrap(), r#"{"bar":2,"baz":3,"foo":1}"#);
    }

    #[test]
    fn test_invalid_defaults_yaml() {
        let dir = TempDir::new().unwrap();
        write_env(&dir, "defaults", "foo: bar\n- invalid\n");

        assert!(matches!(
            load_values::<&str>(dir.path(), "dev", &[]).unwrap_err(),
            CoreError::Parse { .. }
        ));
    }

    #[test]
    fn test_invalid_override_format() {
        let dir = TempDir::new().unwrap();
        write_env(&dir, "defaults", "{}");

        let err = load_values(dir.path(), "dev", &["no_equals_sign"]).unwrap_err();
        assert!(err.to_string().contains("Invalid state value"));
    }
}
