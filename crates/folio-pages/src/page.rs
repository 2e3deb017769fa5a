//! The page entity.
//!
//! A [`Page`] is a slug-identified document: a title, free-form metadata, a
//! body and named sections. Pages can point at a parent by slug and carry
//! children, either as a lazy [`Pages`] collection or as a plain list.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::PageError;
use crate::pages::Pages;
use crate::section::Section;
use crate::slug::{is_valid_slug, normalize_slug};
use crate::source::PageSource;
use crate::value::{Fields, Value};

/// Keys with a fixed meaning in a page field map.
const STRUCTURAL_KEYS: [&str; 3] = ["content", "sections", "children"];

/// Layouts accepted for a `date` without an offset.
const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Relations a page can resolve through a [`PageSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Relation {
    /// The page named by the `parent` field.
    Parent,
}

#[derive(Debug, Clone)]
enum ParentLink {
    None,
    Slug(String),
    Page(Arc<Page>),
}

#[derive(Debug, Clone)]
enum Children {
    Lazy(Pages),
    Loaded(Vec<Arc<Page>>),
}

/// A page document.
///
/// The slug is always normalized and valid, and the title is never empty;
/// both are checked at construction. Equality compares slugs only.
#[derive(Debug, Clone)]
pub struct Page {
    slug: String,
    title: String,
    content: String,
    sections: Vec<Section>,
    meta: Fields,
    parent: ParentLink,
    children: Option<Children>,
}

impl Page {
    /// Build a page from metadata, body and sections.
    ///
    /// `meta` must contain a non-empty `title` and a valid `slug`; slashes
    /// around the slug are stripped. An optional `parent` names the parent
    /// page by slug. All other keys are kept as free-form metadata.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Invalid`] if the title or slug is missing or
    /// malformed, the parent is not a valid slug, or `meta` contains one of
    /// the structural keys `content`, `sections` or `children`.
    pub fn new(
        mut meta: Fields,
        content: impl Into<String>,
        sections: Vec<Section>,
    ) -> Result<Self, PageError> {
        if let Some(key) = STRUCTURAL_KEYS.iter().find(|k| meta.contains_key(**k)) {
            return Err(PageError::Invalid(format!("`{key}` is not a metadata field")));
        }

        let title = take_text(&mut meta, "title")
            .ok_or_else(|| PageError::Invalid("page needs a title".to_owned()))?;
        let raw_slug = take_text(&mut meta, "slug")
            .ok_or_else(|| PageError::Invalid("page needs a slug".to_owned()))?;
        let slug = checked_slug(&raw_slug)?;

        let parent = match meta.remove("parent") {
            None => ParentLink::None,
            Some(value) => parent_link(&value)?,
        };

        Ok(Self {
            slug,
            title,
            content: content.into(),
            sections,
            meta,
            parent,
            children: None,
        })
    }

    /// Build a page from a single field map, as produced by a renderer or
    /// by [`Page::to_fields`].
    ///
    /// `content` and `sections` are taken out of the map; `children` is
    /// ignored since relations are not stored in page files.
    ///
    /// # Errors
    ///
    /// Same as [`Page::new`], plus [`PageError::Invalid`] if `content` is not
    /// a string or `sections` is not a list of section tables.
    pub fn from_fields(mut fields: Fields) -> Result<Self, PageError> {
        let content = match fields.remove("content") {
            None => String::new(),
            Some(Value::String(content)) => content,
            Some(_) => return Err(PageError::Invalid("content must be a string".to_owned())),
        };
        let sections = match fields.remove("sections") {
            None => Vec::new(),
            Some(Value::List(items)) => items
                .into_iter()
                .map(Section::from_value)
                .collect::<Result<_, _>>()?,
            Some(_) => return Err(PageError::Invalid("sections must be a list".to_owned())),
        };
        fields.remove("children");
        Self::new(fields, content, sections)
    }

    /// Every stored field in one map, the inverse of [`Page::from_fields`].
    ///
    /// Includes `_`-prefixed private fields and the parent slug; loaded
    /// children are left out.
    #[must_use]
    pub fn to_fields(&self) -> Fields {
        let mut fields = self.meta.clone();
        self.insert_identity(&mut fields);
        fields.insert("content".to_owned(), Value::String(self.content.clone()));
        if !self.sections.is_empty() {
            fields.insert(
                "sections".to_owned(),
                Value::List(self.sections.iter().map(Section::to_value).collect()),
            );
        }
        fields
    }

    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// First section with the given name.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name() == name)
    }

    /// Public metadata: title, slug, parent slug and every free-form field
    /// not starting with `_`.
    #[must_use]
    pub fn meta(&self) -> Fields {
        let mut fields: Fields = self
            .meta
            .iter()
            .filter(|(key, _)| !key.starts_with('_'))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        self.insert_identity(&mut fields);
        fields
    }

    /// A free-form metadata field, private ones included.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.meta.get(key)
    }

    /// Look up any field by name.
    ///
    /// Covers `title`, `slug`, `parent`, `content`, `sections` and the
    /// free-form metadata.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            "title" => Some(Value::String(self.title.clone())),
            "slug" => Some(Value::String(self.slug.clone())),
            "parent" => self.parent_slug().map(|s| Value::String(s.to_owned())),
            "content" => Some(Value::String(self.content.clone())),
            "sections" => Some(Value::List(
                self.sections.iter().map(Section::to_value).collect(),
            )),
            _ => self.meta.get(key).cloned(),
        }
    }

    /// Whether the page is hidden from listings.
    ///
    /// Hidden when the `hidden` field is truthy and is not the string
    /// `"false"`.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.meta
            .get("hidden")
            .is_some_and(|v| v.is_truthy() && v.as_str() != Some("false"))
    }

    /// The `date` field as a point in time.
    ///
    /// Accepts RFC 3339 (`2024-03-01T10:00:00+02:00`), a date and time
    /// without offset (`2024-03-01 10:00`) and a bare date (`2024-03-01`,
    /// read as midnight). Times without an offset are taken as UTC.
    /// `None` when the field is missing or does not parse.
    #[must_use]
    pub fn date_time(&self) -> Option<DateTime<Utc>> {
        let text = self.meta.get("date")?.to_text()?;
        parse_date_time(text.trim())
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), PageError> {
        let title = title.into();
        if title.is_empty() {
            return Err(PageError::Invalid("page needs a title".to_owned()));
        }
        self.title = title;
        Ok(())
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Set a free-form metadata field.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Invalid`] for `title`, `slug`, `parent` and the
    /// structural keys, which have dedicated setters.
    pub fn set_field(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<(), PageError> {
        let key = key.into();
        if is_reserved(&key) {
            return Err(PageError::Invalid(format!("`{key}` cannot be set as metadata")));
        }
        self.meta.insert(key, value.into());
        Ok(())
    }

    /// Remove a free-form metadata field.
    pub fn remove_field(&mut self, key: &str) -> Option<Value> {
        self.meta.remove(key)
    }

    #[must_use]
    pub fn has_parent(&self) -> bool {
        !matches!(self.parent, ParentLink::None)
    }

    /// Slug of the parent page, resolved or not.
    #[must_use]
    pub fn parent_slug(&self) -> Option<&str> {
        match &self.parent {
            ParentLink::None => None,
            ParentLink::Slug(slug) => Some(slug),
            ParentLink::Page(page) => Some(page.slug()),
        }
    }

    /// Point the page at a parent by slug; an empty slug clears the parent.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Invalid`] if the slug is malformed.
    pub fn set_parent(&mut self, slug: &str) -> Result<(), PageError> {
        self.parent = parent_link(&Value::from(slug))?;
        Ok(())
    }

    /// Attach an already loaded parent page.
    pub fn set_parent_page(&mut self, parent: Arc<Page>) {
        self.parent = ParentLink::Page(parent);
    }

    pub fn clear_parent(&mut self) {
        self.parent = ParentLink::None;
    }

    /// Resolve a relation through `source`.
    ///
    /// A parent attached with [`Page::set_parent_page`] is returned as is;
    /// a parent slug is read from the source. A slug naming no page yields
    /// `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Propagates errors from the source.
    pub fn resolve(
        &self,
        relation: Relation,
        source: &dyn PageSource,
    ) -> Result<Option<Arc<Page>>, PageError> {
        match relation {
            Relation::Parent => match &self.parent {
                ParentLink::None => Ok(None),
                ParentLink::Page(page) => Ok(Some(Arc::clone(page))),
                ParentLink::Slug(slug) => source.read_page(slug),
            },
        }
    }

    /// Shorthand for [`Page::resolve`] with [`Relation::Parent`].
    ///
    /// # Errors
    ///
    /// Propagates errors from the source.
    pub fn parent(&self, source: &dyn PageSource) -> Result<Option<Arc<Page>>, PageError> {
        self.resolve(Relation::Parent, source)
    }

    /// Ancestors of this page, root first, immediate parent last.
    ///
    /// The walk stops at the first page without a resolvable parent.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Invalid`] if the parent chain loops back on
    /// itself, and propagates errors from the source.
    pub fn breadcrumb(&self, source: &dyn PageSource) -> Result<Vec<Arc<Page>>, PageError> {
        let mut visited = HashSet::from([self.slug.clone()]);
        let mut ancestors = Vec::new();
        let mut current = self.parent(source)?;

        while let Some(page) = current {
            if !visited.insert(page.slug.clone()) {
                return Err(PageError::Invalid(format!(
                    "parent chain of `{}` loops at `{}`",
                    self.slug, page.slug
                )));
            }
            current = page.parent(source)?;
            ancestors.push(page);
        }

        ancestors.reverse();
        Ok(ancestors)
    }

    /// Append a child page.
    ///
    /// A child whose slug is already present is ignored.
    pub fn add_child(&mut self, child: Arc<Page>) {
        match self
            .children
            .get_or_insert_with(|| Children::Loaded(Vec::new()))
        {
            Children::Lazy(pages) => {
                pages.push(child);
            }
            Children::Loaded(list) => {
                if !list.iter().any(|c| c.slug == child.slug) {
                    list.push(child);
                }
            }
        }
    }

    /// Replace the children with a lazy collection.
    pub fn set_children(&mut self, children: Pages) {
        self.children = Some(Children::Lazy(children));
    }

    #[must_use]
    pub fn has_children(&self) -> bool {
        self.children.is_some()
    }

    /// Children as a list; a lazy collection is materialized.
    #[must_use]
    pub fn children(&self) -> Option<Vec<Arc<Page>>> {
        match &self.children {
            None => None,
            Some(Children::Lazy(pages)) => Some(pages.to_vec()),
            Some(Children::Loaded(list)) => Some(list.clone()),
        }
    }

    /// Children as the lazy collection, if that is how they are held.
    #[must_use]
    pub fn pages_children(&self) -> Option<&Pages> {
        match &self.children {
            Some(Children::Lazy(pages)) => Some(pages),
            _ => None,
        }
    }

    /// Copy of `page` whose children, at every depth, are plain lists.
    ///
    /// Pages without children are shared rather than copied.
    pub(crate) fn materialized(page: &Arc<Page>) -> Arc<Page> {
        let loaded = match &page.children {
            None => return Arc::clone(page),
            Some(Children::Lazy(pages)) => pages.to_vec(),
            Some(Children::Loaded(list)) => list.iter().map(Self::materialized).collect(),
        };
        let mut copy = Page::clone(page);
        copy.children = Some(Children::Loaded(loaded));
        Arc::new(copy)
    }

    /// The page as the repository keeps it: children dropped and a loaded
    /// parent reduced to its slug.
    pub(crate) fn into_stored(mut self) -> Self {
        self.children = None;
        if let ParentLink::Page(parent) = &self.parent {
            self.parent = ParentLink::Slug(parent.slug.clone());
        }
        self
    }

    fn insert_identity(&self, fields: &mut Fields) {
        fields.insert("title".to_owned(), Value::String(self.title.clone()));
        fields.insert("slug".to_owned(), Value::String(self.slug.clone()));
        if let Some(parent) = self.parent_slug() {
            fields.insert("parent".to_owned(), Value::String(parent.to_owned()));
        }
    }
}

impl PartialEq for Page {
    fn eq(&self, other: &Self) -> bool {
        self.slug == other.slug
    }
}

impl Eq for Page {}

impl Serialize for Page {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let children = self.children();
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in &self.meta() {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry("content", &self.content)?;
        if !self.sections.is_empty() {
            map.serialize_entry("sections", &self.sections)?;
        }
        if let Some(children) = &children {
            let children: Vec<&Page> = children.iter().map(AsRef::as_ref).collect();
            map.serialize_entry("children", &children)?;
        }
        map.end()
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

fn is_reserved(key: &str) -> bool {
    matches!(key, "title" | "slug" | "parent") || STRUCTURAL_KEYS.contains(&key)
}

fn take_text(meta: &mut Fields, key: &str) -> Option<String> {
    meta.remove(key)
        .and_then(|v| v.to_text())
        .filter(|s| !s.is_empty())
}

fn checked_slug(raw: &str) -> Result<String, PageError> {
    let slug = normalize_slug(raw);
    if is_valid_slug(&slug) {
        Ok(slug.into_owned())
    } else {
        Err(PageError::Invalid(format!("`{raw}` is not a valid slug")))
    }
}

fn parse_date_time(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Some(at.with_timezone(&Utc));
    }
    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|day| day.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

fn parent_link(value: &Value) -> Result<ParentLink, PageError> {
    let Some(text) = value.to_text() else {
        return Err(PageError::Invalid("parent must be a slug".to_owned()));
    };
    if normalize_slug(&text).is_empty() {
        return Ok(ParentLink::None);
    }
    checked_slug(&text).map(ParentLink::Slug)
}
