//! Values handling with deep merge support

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};
use crate::value::{ConfigValue, Mapping, merge_mappings};

/// Configuration tree with deep merge capability
///
/// The root is always a mapping. Merging returns new trees and never
/// touches its inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConfigTree(pub Mapping);

impl ConfigTree {
    /// Create empty values
    pub fn new() -> Self {
        Self(Mapping::new())
    }

    /// Load values from a YAML file
    ///
    /// A missing file is not an error: it yields an empty tree, so an
    /// environment without its own values file is legitimate.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(source) => {
                return Err(CoreError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        if content.trim().is_empty() {
            return Ok(Self::new());
        }

        let value = decode_yaml(&content).map_err(|source| CoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_value(value).ok_or_else(|| CoreError::RootNotMapping {
            path: path.to_path_buf(),
        })
    }

    /// Parse values from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let value = decode_yaml(yaml)?;
        Self::from_value(value).ok_or_else(|| CoreError::RootNotMapping {
            path: PathBuf::from("<inline>"),
        })
    }

    /// Wrap a decoded value; `None` unless it is a mapping or null
    pub fn from_value(value: ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Null => Some(Self::new()),
            ConfigValue::Mapping(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Deep merge another tree into this one
    ///
    /// Rules:
    /// - Scalars: overlay replaces base
    /// - Mappings: recursive merge
    /// - Sequences: overlay replaces base (not appended)
    pub fn merge(&mut self, overlay: &ConfigTree) {
        merge_mappings(&mut self.0, &overlay.0);
    }

    /// Deep merge into a new tree, leaving both inputs untouched
    #[must_use]
    pub fn merged(&self, overlay: &ConfigTree) -> ConfigTree {
        let mut result = self.clone();
        result.merge(overlay);
        result
    }

    /// Merge multiple trees in order (first has lowest priority)
    pub fn merge_all<I>(layers: I) -> Self
    where
        I: IntoIterator<Item = ConfigTree>,
    {
        let mut result = ConfigTree::new();
        for layer in layers {
            result.merge(&layer);
        }
        result
    }

    /// Set a value by path segments, creating intermediate mappings
    ///
    /// Fails with `NestedKeyNotMap` when an existing non-mapping value sits
    /// on the path.
    pub fn set(&mut self, segments: &[String], value: ConfigValue) -> Result<()> {
        let Some((last, parents)) = segments.split_last() else {
            return Err(CoreError::InvalidOverrideFormat {
                fragment: String::new(),
            });
        };

        let mut current = &mut self.0;
        for (depth, segment) in parents.iter().enumerate() {
            let entry = current
                .entry(segment.clone())
                .or_insert_with(ConfigValue::mapping);
            current = match entry {
                ConfigValue::Mapping(map) => map,
                _ => {
                    return Err(CoreError::NestedKeyNotMap {
                        path: segments.join("."),
                        segment: segments[..=depth].join("."),
                    });
                }
            };
        }

        current.insert(last.clone(), value);
        Ok(())
    }

    /// Insert a top-level key, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: ConfigValue) -> Option<ConfigValue> {
        self.0.insert(key.into(), value)
    }

    /// Get a value by dotted path
    pub fn get(&self, path: &str) -> Option<&ConfigValue> {
        let mut parts = path.split('.');
        let first = parts.next()?;
        parts.try_fold(self.0.get(first)?, |value, key| value.get(key))
    }

    /// Get the inner mapping
    pub fn inner(&self) -> &Mapping {
        &self.0
    }

    /// Convert to a mapping value
    pub fn into_value(self) -> ConfigValue {
        ConfigValue::Mapping(self.0)
    }

    /// Check if values are empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serialize as compact JSON, keys sorted
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }
}

/// Decode the first YAML document, resolving `<<` merge keys
///
/// Later documents in the stream are ignored.
fn decode_yaml(content: &str) -> serde_yaml::Result<ConfigValue> {
    let Some(document) = serde_yaml::Deserializer::from_str(content).next() else {
        return Ok(ConfigValue::Null);
    };
    let mut value = serde_yaml::Value::deserialize(document)?;
    value.apply_merge()?;
    serde_yaml::from_value(value)
}

impl From<Mapping> for ConfigTree {
    fn from(map: Mapping) -> Self {
        Self(map)
    }
}
