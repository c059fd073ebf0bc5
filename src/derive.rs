use chrono::NaiveDateTime;

use crate::error::ValidationKind;
use crate::text_utils::parse_date_time;

const INDEX_STEM: &str = "index";

/// Canonical slug of a document: the explicit one when given, otherwise one derived from its path.
pub fn derive_slug(explicit: Option<&str>, source_path: &str) -> Result<String, ValidationKind> {
    match explicit {
        Some(slug) => {
            let slug = slug.trim().trim_matches('/');
            if slug.is_empty() {
                return Err(ValidationKind::InvalidField { field: "slug", reason: "slug is empty".to_string() });
            }
            Ok(slug.to_string())
        }
        None => {
            let slug = slug_from_path(source_path);
            if slug.is_empty() {
                return Err(ValidationKind::InvalidField {
                    field: "slug",
                    reason: format!("no slug can be derived from {}", source_path),
                });
            }
            Ok(slug)
        }
    }
}

/// `Blog/2021/My First Post.md` -> `blog/2021/my-first-post`, `talks/rust/index.mdx` -> `talks/rust`
pub fn slug_from_path(source_path: &str) -> String {
    let mut segments: Vec<&str> = source_path.split(['/', '\\'])
        .filter(|s| !s.is_empty())
        .collect();

    if let Some(last) = segments.pop() {
        let stem = match last.rfind('.') {
            Some(pos) if pos > 0 => &last[..pos],
            _ => last,
        };
        if !(stem.eq_ignore_ascii_case(INDEX_STEM) && !segments.is_empty()) {
            segments.push(stem);
        }
    }

    segments.iter()
        .map(|s| slugify(s))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

pub fn slugify(text: &str) -> String {
    let ascii = unidecode::unidecode(text).to_lowercase();

    let mut slug = String::with_capacity(ascii.len());
    let mut prev_char = None;
    for c in ascii.chars() {
        let c = if c.is_ascii_alphanumeric() || c == '_' { c } else { '-' };
        if c != '-' || prev_char != Some('-') {
            slug.push(c);
        }
        prev_char = Some(c);
    }

    slug.trim_matches('-').to_string()
}

/// Front matter date first, file modification time second. Anything else cannot be ordered.
pub fn resolve_date(explicit: Option<&str>, modified_at: Option<NaiveDateTime>) -> Result<NaiveDateTime, ValidationKind> {
    match (explicit, modified_at) {
        (Some(date), _) => parse_date_time(date).map_err(|_| ValidationKind::InvalidDate(date.to_string())),
        (None, Some(mtime)) => Ok(mtime),
        (None, None) => Err(ValidationKind::MissingDate),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_data::date;

    use super::*;

    #[test]
    fn test_slug_from_path() {
        assert_eq!(slug_from_path("my-post.md"), "my-post");
        assert_eq!(slug_from_path("Blog/2021/My First Post.md"), "blog/2021/my-first-post");
        assert_eq!(slug_from_path("talks/rust/index.mdx"), "talks/rust");
        assert_eq!(slug_from_path("index.md"), "index");
        assert_eq!(slug_from_path("What's new?  (part 2).mdx"), "what-s-new-part-2");
        assert_eq!(slug_from_path("Ábaco -- dir2.md"), "abaco-dir2");
        assert_eq!(slug_from_path("snake_case_name.md"), "snake_case_name");
        assert_eq!(slug_from_path("notes/.hidden"), "notes/hidden");
    }

    #[test]
    fn test_explicit_slug_is_verbatim() {
        assert_eq!(derive_slug(Some("My_Custom-Slug"), "a/b.md").unwrap(), "My_Custom-Slug");
        assert_eq!(derive_slug(Some("/my-post/"), "a/b.md").unwrap(), "my-post");
        assert_eq!(derive_slug(None, "a/b c.md").unwrap(), "a/b-c");
        assert!(derive_slug(Some(" / "), "a/b.md").is_err());
        assert!(derive_slug(None, "???.md").is_err());
    }

    #[test]
    fn test_resolve_date() {
        let mtime = date("2020-05-22 10:54:25");
        assert_eq!(resolve_date(Some("2021-01-01"), Some(mtime)).unwrap(), date("2021-01-01"));
        assert_eq!(resolve_date(None, Some(mtime)).unwrap(), mtime);
        assert_eq!(resolve_date(None, None), Err(ValidationKind::MissingDate));
        assert_eq!(resolve_date(Some("someday"), Some(mtime)), Err(ValidationKind::InvalidDate("someday".to_string())));
    }
}
