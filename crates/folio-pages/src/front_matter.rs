//! Front matter page format.
//!
//! ```text
//! ---
//! title: Hello
//! tags: [intro]
//! ---
//! Body of the page.
//! --- sidebar ---
//! Sidebar body.
//! --- footer {"component":"menu"} ---
//! Footer body.
//! ```
//!
//! The YAML block between the `---` lines holds the metadata and may be left
//! out. A line `--- name ---` starts a section running up to the next
//! section line; an optional JSON object before the closing dashes carries
//! the section's extra fields. The slug is not stored: it comes from the
//! file path.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::RenderError;
use crate::page::Page;
use crate::renderer::{PageRenderer, ParseContext};
use crate::section::Section;
use crate::value::{Fields, Value, fields_from_nullable};

/// Section start line: `--- name ---` or `--- name {json} ---`.
static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^--- (?P<name>[^\s{}]+)(?: (?P<fields>\{.*\}))? ---$").unwrap()
});

/// Markdown-style page files with YAML front matter and inline sections.
///
/// Dynamic evaluation is not supported; [`ParseContext::eval`] is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrontMatterRenderer;

impl FrontMatterRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl PageRenderer for FrontMatterRenderer {
    fn render(&self, page: &Page) -> Result<String, RenderError> {
        let render_err = |message: String| RenderError::Render {
            slug: page.slug().to_owned(),
            message,
        };

        let mut meta = page.to_fields();
        for key in ["slug", "content", "sections"] {
            meta.remove(key);
        }
        let yaml = serde_yaml::to_string(&meta).map_err(|e| render_err(e.to_string()))?;

        let mut out = String::with_capacity(yaml.len() + page.content().len() + 16);
        out.push_str("---\n");
        out.push_str(&yaml);
        out.push_str("---\n");
        out.push_str(page.content());
        out.push('\n');

        for section in page.sections() {
            let name = section.name();
            if name.contains(|c: char| c.is_whitespace() || c == '{' || c == '}') {
                return Err(render_err(format!("section name `{name}` cannot be stored")));
            }
            out.push_str("--- ");
            out.push_str(name);
            if !section.fields().is_empty() {
                let json = serde_json::to_string(section.fields())
                    .map_err(|e| render_err(e.to_string()))?;
                out.push(' ');
                out.push_str(&json);
            }
            out.push_str(" ---\n");
            out.push_str(section.content());
            out.push('\n');
        }

        Ok(out)
    }

    fn parse(&self, data: &str, context: &ParseContext<'_>) -> Result<Fields, RenderError> {
        let parse_err = |message: String| RenderError::Parse {
            slug: context.slug.to_owned(),
            message,
        };

        let text = data.replace("\r\n", "\n");
        let (yaml, body) = split_front_matter(&text)
            .ok_or_else(|| parse_err("front matter is not closed".to_owned()))?;

        let mut fields = if yaml.trim().is_empty() {
            Fields::new()
        } else {
            serde_yaml::from_str::<BTreeMap<String, Option<Value>>>(yaml)
                .map(fields_from_nullable)
                .map_err(|e| parse_err(e.to_string()))?
        };

        let (content, sections) = split_sections(body).map_err(parse_err)?;

        if let Some(stored) = fields.get("slug").and_then(Value::as_str)
            && stored.trim_matches('/') != context.slug
        {
            tracing::debug!(
                slug = %context.slug,
                stored = %stored,
                "Ignoring slug stored in page file"
            );
        }
        fields.insert("slug".to_owned(), Value::String(context.slug.to_owned()));
        fields.insert("content".to_owned(), Value::String(content));
        if sections.is_empty() {
            fields.remove("sections");
        } else {
            fields.insert(
                "sections".to_owned(),
                Value::List(sections.iter().map(Section::to_value).collect()),
            );
        }
        Ok(fields)
    }
}

/// Split text into front matter YAML and body.
///
/// Text without a leading `---` line is all body. Returns `None` when the
/// opening line is never closed.
fn split_front_matter(text: &str) -> Option<(&str, &str)> {
    let Some(rest) = text.strip_prefix("---\n") else {
        return Some(("", text));
    };
    if let Some(body) = rest.strip_prefix("---\n") {
        return Some(("", body));
    }
    if rest == "---" {
        return Some(("", ""));
    }
    if let Some(end) = rest.find("\n---\n") {
        return Some((&rest[..=end], &rest[end + 5..]));
    }
    rest.strip_suffix("\n---").map(|yaml| (yaml, ""))
}

/// Split a body into main content and sections.
fn split_sections(body: &str) -> Result<(String, Vec<Section>), String> {
    let headers: Vec<_> = SECTION_RE.captures_iter(body).collect();
    let content_end = headers
        .first()
        .and_then(|caps| caps.get(0))
        .map_or(body.len(), |m| m.start());
    let content = trim_block(&body[..content_end], false);

    let mut sections = Vec::with_capacity(headers.len());
    for (i, caps) in headers.iter().enumerate() {
        let (Some(line), Some(name)) = (caps.get(0), caps.name("name")) else {
            continue;
        };
        let end = headers
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(body.len(), |m| m.start());

        let mut section = Section::new(name.as_str(), trim_block(&body[line.end()..end], true));
        if let Some(json) = caps.name("fields") {
            let extra: BTreeMap<String, Option<Value>> = serde_json::from_str(json.as_str())
                .map_err(|e| format!("fields of section `{}`: {e}", name.as_str()))?;
            for (key, value) in fields_from_nullable(extra) {
                section = section.with_field(key, value);
            }
        }
        sections.push(section);
    }

    Ok((content, sections))
}

/// Drop the line break that separates a block from its neighbours.
fn trim_block(block: &str, after_header: bool) -> String {
    let block = if after_header {
        block.strip_prefix('\n').unwrap_or(block)
    } else {
        block
    };
    block.strip_suffix('\n').unwrap_or(block).to_owned()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn ctx(slug: &str) -> ParseContext<'_> {
        ParseContext { slug, eval: false }
    }

    fn parse_page(data: &str, slug: &str) -> Page {
        let fields = FrontMatterRenderer.parse(data, &ctx(slug)).unwrap();
        Page::from_fields(fields).unwrap()
    }

    #[test]
    fn test_parse_front_matter_and_body() {
        let page = parse_page(
            "---\ntitle: Hello\ntags: [a, b]\nhidden: false\n---\n# Hello\n\nWorld.\n",
            "blog/hello",
        );

        assert_eq!(page.slug(), "blog/hello");
        assert_eq!(page.title(), "Hello");
        assert_eq!(page.content(), "# Hello\n\nWorld.");
        assert_eq!(
            page.field("tags"),
            Some(&Value::List(vec!["a".into(), "b".into()]))
        );
        assert!(!page.is_hidden());
        assert!(page.sections().is_empty());
    }

    #[test]
    fn test_parse_sections() {
        let data = "---\ntitle: T\n---\nMain\n--- sidebar ---\nSide\nmore\n--- footer {\"component\":\"menu\",\"n\":2} ---\nFoot\n";
        let page = parse_page(data, "t");

        assert_eq!(page.content(), "Main");
        let sidebar = page.section("sidebar").unwrap();
        assert_eq!(sidebar.content(), "Side\nmore");
        let footer = page.section("footer").unwrap();
        assert_eq!(footer.content(), "Foot");
        assert_eq!(footer.get("component"), Some(Value::from("menu")));
        assert_eq!(footer.get("n"), Some(Value::Integer(2)));
    }

    #[test]
    fn test_context_slug_wins() {
        let page = parse_page("---\ntitle: T\nslug: elsewhere\n---\n", "real/slug");
        assert_eq!(page.slug(), "real/slug");
    }

    #[test]
    fn test_nulls_are_dropped() {
        let page = parse_page("---\ntitle: T\nparent: ~\nnote: null\n---\nx", "a");
        assert!(!page.has_parent());
        assert!(page.field("note").is_none());
    }

    #[test]
    fn test_no_front_matter_means_no_title() {
        let fields = FrontMatterRenderer.parse("Just text", &ctx("a")).unwrap();
        assert_eq!(fields.get("content"), Some(&Value::from("Just text")));
        assert!(Page::from_fields(fields).is_err());
    }

    #[test]
    fn test_crlf_line_endings() {
        let page = parse_page("---\r\ntitle: Win\r\n---\r\nLine one\r\nLine two\r\n", "w");
        assert_eq!(page.title(), "Win");
        assert_eq!(page.content(), "Line one\nLine two");
    }

    #[test]
    fn test_unclosed_front_matter() {
        let err = FrontMatterRenderer
            .parse("---\ntitle: T\nno end", &ctx("a"))
            .unwrap_err();
        assert!(matches!(err, RenderError::Parse { .. }));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = FrontMatterRenderer
            .parse("---\ntitle: [unclosed\n---\n", &ctx("a"))
            .unwrap_err();
        assert!(err.to_string().contains("`a`"));
    }

    #[test]
    fn test_horizontal_rule_in_body_is_content() {
        let page = parse_page("---\ntitle: T\n---\nAbove\n---\nBelow\n", "a");
        assert_eq!(page.content(), "Above\n---\nBelow");
    }

    #[test]
    fn test_render_then_parse_preserves_page() {
        let original = parse_page(
            "---\ntitle: Round\nparent: docs\n_note: private\norder: 3\n---\nBody\n\nwith blank line\n--- aside {\"wide\":true} ---\nAside\n",
            "docs/round",
        );

        let rendered = FrontMatterRenderer.render(&original).unwrap();
        let back = parse_page(&rendered, "docs/round");

        assert_eq!(back.to_fields(), original.to_fields());
        assert!(!rendered.contains("slug:"));
    }

    #[test]
    fn test_render_layout() {
        let page = parse_page("---\ntitle: Layout\n---\nText\n--- side ---\nS\n", "l");
        assert_eq!(
            FrontMatterRenderer.render(&page).unwrap(),
            "---\ntitle: Layout\n---\nText\n--- side ---\nS\n"
        );
    }

    #[test]
    fn test_render_rejects_unstorable_section_name() {
        let fields: Fields = [
            ("slug".to_owned(), Value::from("a")),
            ("title".to_owned(), Value::from("A")),
        ]
        .into_iter()
        .collect();
        let page = Page::new(fields, "", vec![Section::new("two words", "x")]).unwrap();

        let err = FrontMatterRenderer.render(&page).unwrap_err();
        assert!(matches!(err, RenderError::Render { .. }));
    }
}
