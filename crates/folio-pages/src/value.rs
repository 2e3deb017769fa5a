//! Field values carried by pages.
//!
//! Page metadata and section fields are open-ended key/value maps. [`Value`]
//! is the closed set of shapes those values can take once parsed from a page
//! file, a JSON patch or a command-line literal.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Open key/value map used for page metadata and section fields.
pub type Fields = BTreeMap<String, Value>;

/// A metadata value.
///
/// Serialized untagged, so `true`, `3`, `"text"`, `[..]` and `{..}` map onto
/// the matching variant in both JSON and YAML. Null is not a value: absent
/// keys and nulls are dropped by [`fields_from_nullable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Table(BTreeMap<String, Value>),
}

impl Value {
    /// Returns `true` for the empty string, empty list and empty table.
    ///
    /// `false` and `0` are values, not absence, and are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::String(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Table(map) => map.is_empty(),
            Self::Bool(_) | Self::Integer(_) | Self::Float(_) => false,
        }
    }

    /// Loose truthiness: `false`, `0`, `0.0`, `""`, `"0"` and empty
    /// collections are falsy, everything else is truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Integer(n) => *n != 0,
            Self::Float(f) => *f != 0.0,
            Self::String(s) => !s.is_empty() && s != "0",
            Self::List(items) => !items.is_empty(),
            Self::Table(map) => !map.is_empty(),
        }
    }

    /// Borrow the string if this is a [`Value::String`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Text form of a scalar value; `None` for lists and tables.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            Self::Integer(n) => Some(n.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::List(_) | Self::Table(_) => None,
        }
    }

    /// Parse a literal the way it would read in front matter.
    ///
    /// `42` becomes an integer, `true` a boolean, `[a, b]` a list. Anything
    /// that is not valid YAML, or parses to null, is kept as a plain string.
    #[must_use]
    pub fn parse_literal(input: &str) -> Self {
        match serde_yaml::from_str::<Option<Self>>(input) {
            Ok(Some(value)) => value,
            _ => Self::String(input.to_owned()),
        }
    }

    /// Total ordering used when sorting pages by a field.
    ///
    /// Numbers compare numerically across integer and float, strings
    /// lexically, lists element by element. Values of different shapes order
    /// by shape: booleans, numbers, strings, lists, tables.
    #[must_use]
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::String(a), Self::String(b)) => a.cmp(b),
            (Self::List(a), Self::List(b)) => a
                .iter()
                .zip(b)
                .map(|(x, y)| x.sort_cmp(y))
                .find(|o| o.is_ne())
                .unwrap_or_else(|| a.len().cmp(&b.len())),
            (Self::Table(a), Self::Table(b)) => a.len().cmp(&b.len()),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => a.rank().cmp(&b.rank()),
            },
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Integer(_) | Self::Float(_) => 1,
            Self::String(_) => 2,
            Self::List(_) => 3,
            Self::Table(_) => 4,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Some(text) => f.write_str(&text),
            None => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<Fields> for Value {
    fn from(map: Fields) -> Self {
        Self::Table(map)
    }
}

/// Drop null entries from a freshly deserialized map.
pub(crate) fn fields_from_nullable(map: BTreeMap<String, Option<Value>>) -> Fields {
    map.into_iter()
        .filter_map(|(k, v)| v.map(|v| (k, v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_empty_values() {
        assert!(Value::from("").is_empty());
        assert!(Value::List(vec![]).is_empty());
        assert!(Value::Table(Fields::new()).is_empty());

        assert!(!Value::from(false).is_empty());
        assert!(!Value::Integer(0).is_empty());
        assert!(!Value::from("x").is_empty());
    }

    #[test]
    fn test_truthiness() {
        for falsy in [
            Value::from(false),
            Value::Integer(0),
            Value::from(0.0),
            Value::from(""),
            Value::from("0"),
            Value::List(vec![]),
        ] {
            assert!(!falsy.is_truthy(), "{falsy:?} should be falsy");
        }
        for truthy in [
            Value::from(true),
            Value::Integer(1),
            Value::from("yes"),
            Value::from("false"),
            Value::List(vec![Value::Integer(1)]),
        ] {
            assert!(truthy.is_truthy(), "{truthy:?} should be truthy");
        }
    }

    #[test]
    fn test_parse_literal() {
        assert_eq!(Value::parse_literal("42"), Value::Integer(42));
        assert_eq!(Value::parse_literal("1.5"), Value::Float(1.5));
        assert_eq!(Value::parse_literal("true"), Value::Bool(true));
        assert_eq!(
            Value::parse_literal("[a, 2]"),
            Value::List(vec![Value::from("a"), Value::Integer(2)])
        );
        assert_eq!(Value::parse_literal("hello world"), Value::from("hello world"));
        assert_eq!(Value::parse_literal("~"), Value::from("~"));
        assert_eq!(Value::parse_literal("a: [b"), Value::from("a: [b"));
    }

    #[test]
    fn test_sort_cmp_numbers_across_variants() {
        assert_eq!(Value::Integer(2).sort_cmp(&Value::Integer(10)), Ordering::Less);
        assert_eq!(Value::from(2.5).sort_cmp(&Value::Integer(2)), Ordering::Greater);
        assert_eq!(Value::Integer(3).sort_cmp(&Value::from(3.0)), Ordering::Equal);
    }

    #[test]
    fn test_sort_cmp_mixed_shapes() {
        assert_eq!(Value::from("").sort_cmp(&Value::from("a")), Ordering::Less);
        assert_eq!(Value::from(true).sort_cmp(&Value::Integer(0)), Ordering::Less);
        assert_eq!(Value::Integer(99).sort_cmp(&Value::from("1")), Ordering::Less);
        assert_eq!(
            Value::List(vec![Value::Integer(1)])
                .sort_cmp(&Value::List(vec![Value::Integer(1), Value::Integer(0)])),
            Ordering::Less
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from("plain").to_string(), "plain");
        assert_eq!(Value::Integer(7).to_string(), "7");
        assert_eq!(
            Value::List(vec![Value::from("a"), Value::from(true)]).to_string(),
            r#"["a",true]"#
        );
    }

    #[test]
    fn test_untagged_json() {
        let map: BTreeMap<String, Option<Value>> =
            serde_json::from_str(r#"{"a": 1, "b": "x", "c": null, "d": [true]}"#).unwrap();
        let fields = fields_from_nullable(map);

        assert_eq!(fields.get("a"), Some(&Value::Integer(1)));
        assert_eq!(fields.get("b"), Some(&Value::from("x")));
        assert!(!fields.contains_key("c"));
        assert_eq!(fields.get("d"), Some(&Value::List(vec![Value::Bool(true)])));
    }
}
