//! State value overrides (`--state-values-set`)
//!
//! Each argument holds one or more comma-joined `key=value` pairs. Keys may
//! be dotted paths (`a.b.c`). Values go through YAML inference, so `123` is
//! an integer, `true` a bool and `[1, 2]` a sequence.

use crate::error::{CoreError, Result};
use crate::value::ConfigValue;
use crate::values::ConfigTree;

/// A single `key=value` override
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Override {
    /// Key segments, never empty
    pub path: Vec<String>,
    /// Raw value, parsed when applied
    pub raw: String,
}

impl Override {
    /// Parse one `key=value` fragment
    pub fn parse(fragment: &str) -> Result<Self> {
        let invalid = || CoreError::InvalidOverrideFormat {
            fragment: fragment.to_string(),
        };

        let mut parts = fragment.split('=');
        let (Some(key), Some(raw), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };
        if key.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            path: key.split('.').map(str::to_string).collect(),
            raw: raw.to_string(),
        })
    }

    /// Dotted key, as given on the command line
    pub fn key(&self) -> String {
        self.path.join(".")
    }

    /// Infer the typed value from the raw string
    pub fn value(&self) -> Result<ConfigValue> {
        if self.raw.trim().is_empty() {
            return Ok(ConfigValue::Null);
        }
        serde_yaml::from_str(&self.raw).map_err(|source| CoreError::OverrideValueParse {
            key: self.key(),
            source,
        })
    }
}

/// Split override arguments on commas and parse every fragment
pub fn parse<S: AsRef<str>>(overrides: &[S]) -> Result<Vec<Override>> {
    overrides
        .iter()
        .flat_map(|arg| arg.as_ref().split(','))
        .map(Override::parse)
        .collect()
}

/// Apply overrides in order; a later override on the same path wins
pub fn apply<S: AsRef<str>>(mut tree: ConfigTree, overrides: &[S]) -> Result<ConfigTree> {
    for item in parse(overrides)? {
        let value = item.value()?;
        tree.set(&item.path, value)?;
    }
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(json: &str) -> ConfigTree {
        let value: ConfigValue = serde_json::from_str(json).unwrap();
        ConfigTree::from_value(value).unwrap()
    }

    #[test]
    fn test_value_inference() {
        let cases: Vec<(&str, ConfigValue)> = vec![
            (r#""foo""#, ConfigValue::from("foo")),
            ("hello", ConfigValue::from("hello")),
            ("123", ConfigValue::from(123)),
            ("1.5", ConfigValue::from(1.5)),
            ("true", ConfigValue::from(true)),
            ("false", ConfigValue::from(false)),
            ("null", ConfigValue::Null),
            ("", ConfigValue::Null),
            (
                "[1, 2, 3]",
                ConfigValue::Sequence(vec![1.into(), 2.into(), 3.into()]),
            ),
            (r#"{"a": 1}"#, tree(r#"{"a": 1}"#).into_value()),
        ];

        for (raw, expected) in cases {
            let item = Override::parse(&format!("key={raw}")).unwrap();
            assert_eq!(item.value().unwrap(), expected, "raw value {raw:?}");
        }
    }

    #[test]
    fn test_parse_dotted_key() {
        let item = Override::parse("foo.bar.baz=1").unwrap();
        assert_eq!(item.path, vec!["foo", "bar", "baz"]);
        assert_eq!(item.raw, "1");
        assert_eq!(item.key(), "foo.bar.baz");
    }

    #[test]
    fn test_parse_comma_joined() {
        let items = parse(&["foo=1,bar=2", "baz=3"]).unwrap();
        let keys: Vec<String> = items.iter().map(Override::key).collect();
        assert_eq!(keys, vec!["foo", "bar", "baz"]);
    }

    #[test]
    fn test_missing_equals() {
        match parse(&["nokey"]).unwrap_err() {
            CoreError::InvalidOverrideFormat { fragment } => assert_eq!(fragment, "nokey"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_multiple_equals() {
        assert!(matches!(
            parse(&["multiple=equals=signs"]).unwrap_err(),
            CoreError::InvalidOverrideFormat { .. }
        ));
    }

    #[test]
    fn test_empty_key() {
        assert!(matches!(
            parse(&["=value"]).unwrap_err(),
            CoreError::InvalidOverrideFormat { .. }
        ));
    }

    #[test]
    fn test_unclosed_sequence_value() {
        let err = apply(ConfigTree::new(), &["bad=[unclosed"]).unwrap_err();
        match err {
            CoreError::OverrideValueParse { key, .. } => assert_eq!(key, "bad"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_apply_creates_intermediate_maps() {
        let result = apply(ConfigTree::new(), &["a.b.c=deep"]).unwrap();
        assert_eq!(result, tree(r#"{"a": {"b": {"c": "deep"}}}"#));
    }

    #[test]
    fn test_apply_nested_into_existing() {
        let base = tree(r#"{"foo": {"bar": {"baz": "original", "keep": 1}}}"#);
        let result = apply(base, &["foo.bar.baz=updated"]).unwrap();

        assert_eq!(
            result,
            tree(r#"{"foo": {"bar": {"baz": "updated", "keep": 1}}}"#)
        );
    }

    #[test]
    fn test_apply_blocked_by_scalar() {
        let base = tree(r#"{"foo": "scalar"}"#);
        assert!(matches!(
            apply(base, &["foo.bar=1"]).unwrap_err(),
            CoreError::NestedKeyNotMap { .. }
        ));
    }

    #[test]
    fn test_apply_same_value_normalizes_type() {
        let base = tree(r#"{"count": 123}"#);
        let result = apply(base.clone(), &["count=123"]).unwrap();

        assert_eq!(result, base);
        assert_eq!(result.get("count").unwrap().as_i64(), Some(123));
    }

    #[test]
    fn test_apply_later_override_wins() {
        let result = apply(ConfigTree::new(), &["a.b=1", "a=2"]).unwrap();
        assert_eq!(result, tree(r#"{"a": 2}"#));

        let result = apply(ConfigTree::new(), &["a={x: 1}", "a={y: 2}"]).unwrap();
        assert_eq!(result, tree(r#"{"a": {"y": 2}}"#));
    }
}
