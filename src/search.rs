use std::sync::Arc;

use crate::content::{normalize_key, Record};

/// What a listing page asks for. Every part is optional; absent parts match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: Option<String>,
    pub tag: Option<String>,
    pub category: Option<String>,
}

impl SearchQuery {
    pub fn text(text: &str) -> Self {
        SearchQuery { text: Some(text.to_string()), ..Default::default() }
    }

    pub fn tag(tag: &str) -> Self {
        SearchQuery { tag: Some(tag.to_string()), ..Default::default() }
    }

    pub fn category(category: &str) -> Self {
        SearchQuery { category: Some(category.to_string()), ..Default::default() }
    }
}

struct Matcher {
    text: Option<String>,
    tag: Option<String>,
    category: Option<String>,
}

impl Matcher {
    fn new(query: &SearchQuery) -> Self {
        let prepare = |s: &Option<String>| s.as_deref()
            .map(normalize_key)
            .filter(|s| !s.is_empty());

        // Text is matched as typed, whitespace included
        Matcher {
            text: query.text.as_deref().map(str::to_lowercase).filter(|s| !s.is_empty()),
            tag: prepare(&query.tag),
            category: prepare(&query.category),
        }
    }

    fn matches(&self, record: &Record) -> bool {
        if let Some(ref text) = self.text {
            if !record.title.to_lowercase().contains(text.as_str()) {
                return false;
            }
        }
        if let Some(ref tag) = self.tag {
            if !record.has_tag(tag) {
                return false;
            }
        }
        if let Some(ref category) = self.category {
            if !record.has_category(category) {
                return false;
            }
        }
        true
    }
}

/// Records matching every part of `query`, in the order they were given.
///
/// Text matches a case-insensitive substring of the title only. Tags and
/// categories match case-insensitively. An empty result simply means nothing
/// matched.
pub fn search(records: &[Arc<Record>], query: &SearchQuery) -> Vec<Arc<Record>> {
    let matcher = Matcher::new(query);
    records.iter()
        .filter(|r| matcher.matches(r))
        .cloned()
        .collect()
}
