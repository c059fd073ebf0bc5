use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use crate::content::Record;
use crate::error::{CollisionError, SlugCollision};
use crate::taxonomy::TermIndex;

/// Read-only aggregation over one run's records. Built in one go, never updated.
#[derive(Debug, Clone)]
pub struct ContentIndex {
    // Newest first
    records: Vec<Arc<Record>>,
    slug_to_pos: HashMap<String, usize>,
    publishable: Vec<Arc<Record>>,
    tags: TermIndex,
    categories: TermIndex,
}

impl ContentIndex {
    pub fn build(records: Vec<Record>) -> Result<ContentIndex, CollisionError> {
        let mut first_path: HashMap<&str, &str> = HashMap::with_capacity(records.len());
        let mut collisions = vec![];
        for record in records.iter() {
            match first_path.get(record.slug.as_str()) {
                Some(first) => collisions.push(SlugCollision {
                    slug: record.slug.clone(),
                    first: first.to_string(),
                    second: record.source_path.clone(),
                }),
                None => {
                    first_path.insert(record.slug.as_str(), record.source_path.as_str());
                }
            }
        }
        if !collisions.is_empty() {
            return Err(CollisionError { collisions });
        }

        let mut records: Vec<Arc<Record>> = records.into_iter().map(Arc::new).collect();
        sort_chronologically(&mut records);

        let slug_to_pos = records.iter()
            .enumerate()
            .map(|(pos, r)| (r.slug.clone(), pos))
            .collect();
        let publishable: Vec<Arc<Record>> = records.iter()
            .filter(|r| r.is_publishable())
            .cloned()
            .collect();
        let tags = TermIndex::tags(&records);
        let categories = TermIndex::categories(&records);

        Ok(ContentIndex {
            records,
            slug_to_pos,
            publishable,
            tags,
            categories,
        })
    }

    pub fn records(&self) -> &[Arc<Record>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn by_slug(&self, slug: &str) -> Option<&Arc<Record>> {
        self.slug_to_pos.get(slug).map(|pos| &self.records[*pos])
    }

    /// Posts only, newest first. This is what feeds and public listings show.
    pub fn publishable(&self) -> &[Arc<Record>] {
        &self.publishable
    }

    pub fn tags(&self) -> &TermIndex {
        &self.tags
    }

    pub fn categories(&self) -> &TermIndex {
        &self.categories
    }

    pub fn publishable_tags(&self) -> TermIndex {
        TermIndex::tags(&self.publishable)
    }

    pub fn publishable_categories(&self) -> TermIndex {
        TermIndex::categories(&self.publishable)
    }
}

/// Date descending, slug ascending on ties.
pub fn chronological(a: &Record, b: &Record) -> Ordering {
    b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug))
}

pub fn sort_chronologically(records: &mut [Arc<Record>]) {
    records.sort_by(|a, b| chronological(a, b));
}
