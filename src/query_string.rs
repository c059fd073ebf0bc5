use std::collections::HashMap;

use crate::search::SearchQuery;

#[derive(PartialEq, Debug)]
pub struct QueryString {
    items: HashMap<String, String>,
}

impl QueryString {
    pub fn from(buf: &str) -> Self {
        let buf = buf.strip_prefix('?').unwrap_or(buf);
        let vs: Vec<(String, String)> = serde_urlencoded::from_str(buf).unwrap_or_else(|_| vec![]);
        let items: HashMap<String, String> = vs.into_iter().collect();

        QueryString {
            items,
        }
    }

    pub fn get_page(&self) -> u32 {
        let one = "1".to_string();
        let val = self.items.get("page").unwrap_or(&one);
        let val = val.parse().unwrap_or(1);
        if val == 0 { return 1; }
        val
    }

    fn get_non_empty(&self, key: &str) -> Option<String> {
        self.items.get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// `q` (or `text`), `tag` and `category` parameters as a search query.
    pub fn to_search_query(&self) -> SearchQuery {
        SearchQuery {
            text: self.get_non_empty("q").or_else(|| self.get_non_empty("text")),
            tag: self.get_non_empty("tag"),
            category: self.get_non_empty("category"),
        }
    }
}

impl SearchQuery {
    pub fn from_query_string(buf: &str) -> SearchQuery {
        QueryString::from(buf).to_search_query()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_page() {
        assert_eq!(QueryString::from("page=3").get_page(), 3);
        assert_eq!(QueryString::from("page=0").get_page(), 1);
        assert_eq!(QueryString::from("page=-2").get_page(), 1);
        assert_eq!(QueryString::from("page=abc").get_page(), 1);
        assert_eq!(QueryString::from("").get_page(), 1);
    }

    #[test]
    fn test_parse_query_str() {
        let buf = "bread=baguette&cheese=comt%C3%A9&meat=ham&fat=butter";
        let meal = vec![
            ("bread".to_owned(), "baguette".to_owned()),
            ("cheese".to_owned(), "comté".to_owned()),
            ("meat".to_owned(), "ham".to_owned()),
            ("fat".to_owned(), "butter".to_owned()),
        ].into_iter().collect::<HashMap<_, _>>();

        let expected = QueryString {
            items: meal,
        };

        assert_eq!(QueryString::from(buf), expected);
    }

    #[test]
    fn test_parse_invalid_query_str() {
        let buf = "";
        let expected = QueryString {
            items: Default::default(),
        };
        assert_eq!(QueryString::from(buf), expected);
    }

    #[test]
    fn test_search_query() {
        let query = SearchQuery::from_query_string("?q=React+Hooks&tag=Testing&category=");
        assert_eq!(query, SearchQuery {
            text: Some("React Hooks".to_string()),
            tag: Some("Testing".to_string()),
            category: None,
        });

        let query = SearchQuery::from_query_string("text=%20css%20");
        assert_eq!(query, SearchQuery::text("css"));
        assert_eq!(SearchQuery::from_query_string(""), SearchQuery::default());
    }
}
