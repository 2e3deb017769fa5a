//! Partial page updates.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::slug::normalize_slug;
use crate::value::{Fields, Value};

/// A set of field changes applied on top of a stored page.
///
/// `Some(value)` sets a field and `None` removes it. Setting a field to an
/// empty string, list or table is a no-op, so forms that submit blank inputs
/// leave existing values alone. Deserializes from a JSON or YAML object where
/// `null` means removal.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Patch {
    changes: BTreeMap<String, Option<Value>>,
}

impl Patch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.changes.insert(key.into(), Some(value.into()));
        self
    }

    #[must_use]
    pub fn unset(mut self, key: impl Into<String>) -> Self {
        self.changes.insert(key.into(), None);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.changes.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Apply the changes to a page field map.
    pub fn apply(&self, fields: &mut Fields) {
        for (key, change) in &self.changes {
            match change {
                None => {
                    fields.remove(key);
                }
                Some(value) if value.is_empty() => {}
                Some(value) => {
                    fields.insert(key.clone(), value.clone());
                }
            }
        }
    }

    /// Slug the page will have once patched, given its current slug.
    pub(crate) fn target_slug(&self, current: &str) -> String {
        self.changes
            .get("slug")
            .and_then(Option::as_ref)
            .filter(|value| !value.is_empty())
            .and_then(Value::to_text)
            .map_or_else(|| current.to_owned(), |s| normalize_slug(&s).into_owned())
    }
}

impl FromIterator<(String, Option<Value>)> for Patch {
    fn from_iter<I: IntoIterator<Item = (String, Option<Value>)>>(iter: I) -> Self {
        Self {
            changes: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn base() -> Fields {
        [
            ("title".to_owned(), Value::from("Old")),
            ("slug".to_owned(), Value::from("a")),
            ("tag".to_owned(), Value::from("x")),
            ("draft".to_owned(), Value::from(true)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_apply_sets_removes_and_ignores_empty() {
        let patch = Patch::new()
            .set("title", "New")
            .unset("tag")
            .set("draft", "")
            .set("count", Value::Integer(0))
            .set("flag", false);
        let mut fields = base();

        patch.apply(&mut fields);

        assert_eq!(fields.get("title"), Some(&Value::from("New")));
        assert!(!fields.contains_key("tag"));
        assert_eq!(fields.get("draft"), Some(&Value::from(true)));
        assert_eq!(fields.get("count"), Some(&Value::Integer(0)));
        assert_eq!(fields.get("flag"), Some(&Value::from(false)));
    }

    #[test]
    fn test_target_slug() {
        assert_eq!(Patch::new().target_slug("a"), "a");
        assert_eq!(Patch::new().set("slug", "/b/c/").target_slug("a"), "b/c");
        assert_eq!(Patch::new().set("slug", "").target_slug("a"), "a");
        assert_eq!(Patch::new().unset("slug").target_slug("a"), "a");
    }

    #[test]
    fn test_deserialize_null_as_removal() {
        let patch: Patch = serde_json::from_str(r#"{"title": "T", "tag": null}"#).unwrap();
        let changes: Vec<_> = patch.iter().collect();
        assert_eq!(
            changes,
            vec![("tag", None), ("title", Some(&Value::from("T")))]
        );
    }
}
