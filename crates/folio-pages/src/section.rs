//! Named sub-blocks of a page.

use serde::Serialize;

use crate::error::PageError;
use crate::value::{Fields, Value};

/// A named block of content attached to a page, such as a sidebar or footer.
///
/// Besides its name and body a section carries arbitrary fields, used by
/// templates to pick a component or pass it options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    name: String,
    content: String,
    #[serde(flatten)]
    fields: Fields,
}

impl Section {
    /// Create a section with a name and body and no extra fields.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            fields: Fields::new(),
        }
    }

    /// Attach an extra field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Look up a field; `name` and `content` resolve to the section's own
    /// name and body.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            "name" => Some(Value::String(self.name.clone())),
            "content" => Some(Value::String(self.content.clone())),
            _ => self.fields.get(key).cloned(),
        }
    }

    /// Table form used in page field maps: `name`, `content` and the extra
    /// fields side by side.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut table = self.fields.clone();
        table.insert("name".to_owned(), Value::String(self.name.clone()));
        table.insert("content".to_owned(), Value::String(self.content.clone()));
        Value::Table(table)
    }

    /// Inverse of [`Section::to_value`].
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Invalid`] if the value is not a table or lacks a
    /// non-empty string `name`.
    pub fn from_value(value: Value) -> Result<Self, PageError> {
        let Value::Table(mut table) = value else {
            return Err(PageError::Invalid("section must be a table".to_owned()));
        };
        let name = match table.remove("name") {
            Some(Value::String(name)) if !name.is_empty() => name,
            _ => return Err(PageError::Invalid("section needs a name".to_owned())),
        };
        let content = match table.remove("content") {
            None => String::new(),
            Some(Value::String(content)) => content,
            Some(_) => {
                return Err(PageError::Invalid(format!(
                    "content of section `{name}` must be a string"
                )));
            }
        };
        Ok(Self {
            name,
            content,
            fields: table,
        })
    }
}
