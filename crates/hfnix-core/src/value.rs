//! Type-preserving configuration values
//!
//! `ConfigValue` is decoded directly from YAML or JSON. Integers stay
//! integers on the way through, which matters for identifiers and counts
//! that are handed to the evaluator and back out to helmfile.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};
use serde_json::Number;

/// Mapping keyed by string, ordered by key for stable output
pub type Mapping = BTreeMap<String, ConfigValue>;

/// A YAML/JSON value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConfigValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<ConfigValue>),
    Mapping(Mapping),
}

impl ConfigValue {
    /// Create an empty mapping
    pub fn mapping() -> Self {
        ConfigValue::Mapping(Mapping::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, ConfigValue::Mapping(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Vec<ConfigValue>> {
        match self {
            ConfigValue::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Vec<ConfigValue>> {
        match self {
            ConfigValue::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            ConfigValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            ConfigValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key if this value is a mapping
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Short name of the variant, for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Bool(_) => "bool",
            ConfigValue::Number(_) => "number",
            ConfigValue::String(_) => "string",
            ConfigValue::Sequence(_) => "sequence",
            ConfigValue::Mapping(_) => "mapping",
        }
    }
}

/// Deep merge `overlay` into `base`
///
/// Rules:
/// - Mappings: recursive merge
/// - Everything else: overlay replaces base (sequences are not appended)
pub fn deep_merge(base: &mut ConfigValue, overlay: &ConfigValue) {
    match (base, overlay) {
        (ConfigValue::Mapping(base_map), ConfigValue::Mapping(overlay_map)) => {
            merge_mappings(base_map, overlay_map);
        }
        (base, overlay) => {
            *base = overlay.clone();
        }
    }
}

/// Deep merge two mappings, see [`deep_merge`]
pub fn merge_mappings(base: &mut Mapping, overlay: &Mapping) {
    for (key, overlay_value) in overlay {
        match base.get_mut(key) {
            Some(base_value) => deep_merge(base_value, overlay_value),
            None => {
                base.insert(key.clone(), overlay_value.clone());
            }
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        ConfigValue::Number(n.into())
    }
}

impl From<u64> for ConfigValue {
    fn from(n: u64) -> Self {
        ConfigValue::Number(n.into())
    }
}

impl From<i32> for ConfigValue {
    fn from(n: i32) -> Self {
        ConfigValue::Number(n.into())
    }
}

/// Non-finite floats become `Null`
impl From<f64> for ConfigValue {
    fn from(f: f64) -> Self {
        Number::from_f64(f).map_or(ConfigValue::Null, ConfigValue::Number)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(seq: Vec<ConfigValue>) -> Self {
        ConfigValue::Sequence(seq)
    }
}

impl From<Mapping> for ConfigValue {
    fn from(map: Mapping) -> Self {
        ConfigValue::Mapping(map)
    }
}

impl Serialize for ConfigValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ConfigValue::Null => serializer.serialize_unit(),
            ConfigValue::Bool(b) => serializer.serialize_bool(*b),
            ConfigValue::Number(n) => n.serialize(serializer),
            ConfigValue::String(s) => serializer.serialize_str(s),
            ConfigValue::Sequence(seq) => serializer.collect_seq(seq),
            ConfigValue::Mapping(map) => serializer.collect_map(map),
        }
    }
}

impl<'de> Deserialize<'de> for ConfigValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ConfigValueVisitor)
    }
}

struct ConfigValueVisitor;

impl<'de> Visitor<'de> for ConfigValueVisitor {
    type Value = ConfigValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a YAML or JSON value")
    }

    fn visit_bool<E>(self, v: bool) -> std::result::Result<ConfigValue, E> {
        Ok(ConfigValue::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> std::result::Result<ConfigValue, E> {
        Ok(ConfigValue::Number(v.into()))
    }

    fn visit_u64<E>(self, v: u64) -> std::result::Result<ConfigValue, E> {
        Ok(ConfigValue::Number(v.into()))
    }

    fn visit_f64<E>(self, v: f64) -> std::result::Result<ConfigValue, E>
    where
        E: de::Error,
    {
        Number::from_f64(v)
            .map(ConfigValue::Number)
            .ok_or_else(|| E::custom(format!("non-finite number {v} is not supported")))
    }

    fn visit_str<E>(self, v: &str) -> std::result::Result<ConfigValue, E> {
        Ok(ConfigValue::String(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> std::result::Result<ConfigValue, E> {
        Ok(ConfigValue::String(v))
    }

    fn visit_unit<E>(self) -> std::result::Result<ConfigValue, E> {
        Ok(ConfigValue::Null)
    }

    fn visit_none<E>(self) -> std::result::Result<ConfigValue, E> {
        Ok(ConfigValue::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> std::result::Result<ConfigValue, D::Error>
    where
        D: Deserializer<'de>,
    {
        ConfigValue::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<ConfigValue, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(ConfigValue::Sequence(items))
    }

    fn visit_map<A>(self, mut access: A) -> std::result::Result<ConfigValue, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = Mapping::new();
        while let Some(key) = access.next_key::<ConfigValue>()? {
            // YAML allows scalar keys of any type; they are stringified like
            // the evaluator would see them in JSON.
            let key = match key {
                ConfigValue::String(s) => s,
                ConfigValue::Number(n) => n.to_string(),
                ConfigValue::Bool(b) => b.to_string(),
                ConfigValue::Null => "null".to_string(),
                other => {
                    return Err(de::Error::custom(format!(
                        "{} is not supported as a mapping key",
                        other.type_name()
                    )));
                }
            };
            let value = access.next_value()?;
            map.insert(key, value);
        }
        Ok(ConfigValue::Mapping(map))
    }
}
