use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::Serialize;

use crate::content::{Record, Term};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermEntry {
    pub display: String,
    pub slugs: BTreeSet<String>,
}

impl TermEntry {
    pub fn count(&self) -> usize {
        self.slugs.len()
    }
}

/// One facet for navigation: a term and how many records carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facet {
    pub term: String,
    pub key: String,
    pub count: usize,
}

/// Normalized term key -> records carrying it. Used for both tags and categories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermIndex {
    entries: BTreeMap<String, TermEntry>,
}

impl TermIndex {
    /// `records` are expected newest first: the first spelling seen for a key is
    /// the one displayed.
    pub fn build<F>(records: &[Arc<Record>], terms_of: F) -> TermIndex
    where
        F: Fn(&Record) -> &[Term],
    {
        let mut entries: BTreeMap<String, TermEntry> = BTreeMap::new();
        for record in records {
            for term in terms_of(record.as_ref()) {
                entries.entry(term.key.clone())
                    .or_insert_with(|| TermEntry { display: term.display.clone(), slugs: BTreeSet::new() })
                    .slugs
                    .insert(record.slug.clone());
            }
        }
        TermIndex { entries }
    }

    pub fn tags(records: &[Arc<Record>]) -> TermIndex {
        Self::build(records, |r| r.tags.as_slice())
    }

    pub fn categories(records: &[Arc<Record>]) -> TermIndex {
        Self::build(records, |r| r.categories.as_slice())
    }

    /// Lookup is case-insensitive.
    pub fn get(&self, term: &str) -> Option<&TermEntry> {
        self.entries.get(&crate::content::normalize_key(term))
    }

    pub fn count(&self, term: &str) -> usize {
        self.get(term).map(|e| e.count()).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorted by count descending, then by key.
    pub fn facets(&self) -> Vec<Facet> {
        let mut facets: Vec<Facet> = self.entries.iter()
            .map(|(key, entry)| Facet {
                term: entry.display.clone(),
                key: key.clone(),
                count: entry.count(),
            })
            .collect();

        facets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
        facets
    }
}
