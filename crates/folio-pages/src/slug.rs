//! Slug normalization and validation.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Characters allowed in a slug: lowercase ASCII, digits, `-`, `_`, `+`
/// and `/` as the hierarchy separator.
static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z0-9\-_+/]+$").unwrap());

/// Strip leading and trailing slashes from an identifier and collapse
/// repeated ones.
///
/// `"/blog/hello/"`, `"blog//hello"` and `"blog/hello"` name the same page,
/// just as they name the same file. Borrows unless slashes were collapsed.
#[must_use]
pub fn normalize_slug(id: &str) -> Cow<'_, str> {
    let trimmed = id.trim_matches('/');
    if !trimmed.contains("//") {
        return Cow::Borrowed(trimmed);
    }
    let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
    Cow::Owned(segments.join("/"))
}

/// Check that a normalized slug is well formed.
///
/// Rejects empty slugs, characters outside the allowed set and empty path
/// segments. Run [`normalize_slug`] first to fold stray slashes away.
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_RE.is_match(slug) && slug.split('/').all(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_slashes() {
        assert_eq!(normalize_slug("/blog/hello/"), "blog/hello");
        assert_eq!(normalize_slug("index"), "index");
        assert_eq!(normalize_slug("///"), "");
    }

    #[test]
    fn test_normalize_collapses_repeated_slashes() {
        assert_eq!(normalize_slug("a//b"), "a/b");
        assert_eq!(normalize_slug("/blog///2024//post/"), "blog/2024/post");
        assert!(matches!(normalize_slug("/blog/hello/"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_every_pattern_match_normalizes_to_valid() {
        for slug in ["a//b", "/a", "a/", "//x//y//", "c++/_d"] {
            assert!(is_valid_slug(&normalize_slug(slug)), "{slug}");
        }
    }

    #[test]
    fn test_valid_slugs() {
        for slug in ["index", "blog/hello-world", "_drafts/wip", "c++", "2024/01/a_b"] {
            assert!(is_valid_slug(slug), "{slug} should be valid");
        }
    }

    #[test]
    fn test_invalid_slugs() {
        for slug in ["", "Blog", "a b", "a//b", "/a", "a/", "../etc", "a.md", "é"] {
            assert!(!is_valid_slug(slug), "{slug} should be invalid");
        }
    }
}
