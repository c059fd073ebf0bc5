use std::sync::Arc;

use serde::Serialize;

use crate::content::Record;
use crate::content_index::ContentIndex;
use crate::paginator::{PageInfo, Paginator};
use crate::search::{search, SearchQuery};
use crate::taxonomy::Facet;

/// Data handed to the browsing pages: publishable posts and their facets.
#[derive(Serialize)]
pub struct Listing<'a> {
    pub post_count: usize,
    pub posts: Vec<&'a Record>,
    pub tags: Vec<Facet>,
    pub categories: Vec<Facet>,
}

impl<'a> Listing<'a> {
    pub fn from_index(index: &'a ContentIndex) -> Listing<'a> {
        let posts: Vec<&Record> = index.publishable().iter().map(|r| r.as_ref()).collect();
        Listing {
            post_count: posts.len(),
            posts,
            tags: index.publishable_tags().facets(),
            categories: index.publishable_categories().facets(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// One page of search results over the publishable posts.
pub struct ListingPage {
    pub posts: Vec<Arc<Record>>,
    pub total: usize,
    pub page: PageInfo,
}

impl ListingPage {
    /// An empty result is a valid page with no posts. Asking past the last page is an error.
    pub fn query(index: &ContentIndex, query: &SearchQuery, page: u32, page_size: u32) -> Result<ListingPage, String> {
        let found = search(index.publishable(), query);
        let paginator = Paginator::from(&found, page_size);

        if found.is_empty() && page == 1 {
            return Ok(ListingPage {
                posts: vec![],
                total: 0,
                page: paginator.page_info(1),
            });
        }

        let posts = paginator.get_page(page)?.to_vec();
        Ok(ListingPage {
            posts,
            total: found.len(),
            page: paginator.page_info(page),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::content::{Template, Term};
    use crate::content_index::tests::plain_record;

    use super::*;

    fn index() -> ContentIndex {
        let mut about = plain_record("about", "2021-06-01", &["me"]);
        about.template = Template::Page;
        let mut tutorial = plain_record("hooks", "2021-03-01", &["react"]);
        tutorial.categories = vec![Term::new("Tutorials")];

        ContentIndex::build(vec![
            about,
            tutorial,
            plain_record("testing", "2021-02-01", &["React", "testing"]),
            plain_record("grid", "2021-01-01", &["css"]),
        ]).unwrap()
    }

    #[test]
    fn test_listing_json() {
        let index = index();
        let listing = Listing::from_index(&index);
        assert_eq!(listing.post_count, 3);
        assert_eq!(listing.tags[0], Facet { term: "react".to_string(), key: "react".to_string(), count: 2 });

        let json: serde_json::Value = serde_json::from_str(&listing.to_json().unwrap()).unwrap();
        assert_eq!(json["posts"][0]["slug"], "hooks");
        assert_eq!(json["posts"][0]["date"], "2021-03-01T00:00:00Z");
        assert_eq!(json["posts"][0]["categories"][0], "Tutorials");
        assert_eq!(json["posts"][0]["template"], "post");
        assert!(json["posts"][0].get("body").is_none());
        assert_eq!(json["categories"][0]["term"], "Tutorials");
        assert_eq!(json["posts"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_listing_page() {
        let index = index();
        let page = ListingPage::query(&index, &SearchQuery::tag("react"), 2, 1).unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.posts[0].slug, "testing");
        assert!(page.page.has_previous);
        assert!(!page.page.has_next);

        let empty = ListingPage::query(&index, &SearchQuery::text("nothing here"), 1, 10).unwrap();
        assert!(empty.posts.is_empty());
        assert_eq!(empty.total, 0);

        assert!(ListingPage::query(&index, &SearchQuery::default(), 5, 10).is_err());
    }
}
