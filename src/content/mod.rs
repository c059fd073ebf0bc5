use std::collections::BTreeMap;
use std::fmt;
use std::fmt::{Display, Formatter};

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

pub mod content_renderer;
pub mod front_matter;
pub mod markdown_renderer;
pub mod parsing_utils;
pub mod raw_document;

/// One normalized document. Built once per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub title: String,
    pub slug: String,
    #[serde(serialize_with = "serialize_date")]
    pub date: NaiveDateTime,
    pub tags: Vec<Term>,
    pub categories: Vec<Term>,
    pub excerpt: String,
    pub time_to_read: u32,
    pub thumbnail: Option<Thumbnail>,
    pub template: Template,
    #[serde(skip)]
    pub body: RenderedBody,
    pub source_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Record {
    pub fn is_publishable(&self) -> bool {
        self.template == Template::Post
    }

    pub fn has_tag(&self, key: &str) -> bool {
        self.tags.iter().any(|t| t.key == key)
    }

    pub fn has_category(&self, key: &str) -> bool {
        self.categories.iter().any(|t| t.key == key)
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "slug={}, date={}, template={}\ntitle={}\nexcerpt:\n{}",
               self.slug,
               self.date,
               self.template,
               self.title,
               self.excerpt
        )
    }
}

fn serialize_date<S: Serializer>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&date.format("%Y-%m-%dT%H:%M:%SZ").to_string())
}

/// A tag or a category. `key` is what matching uses, `display` keeps the author's casing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Term {
    pub display: String,
    pub key: String,
}

impl Term {
    pub fn new(display: &str) -> Self {
        let display = display.trim().to_string();
        let key = normalize_key(&display);
        Term { display, key }
    }
}

impl Serialize for Term {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.display)
    }
}

pub fn normalize_key(term: &str) -> String {
    term.trim().to_lowercase()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Template {
    #[default]
    Post,
    Page,
    Other(String),
}

impl Template {
    pub fn from_name(name: &str) -> Template {
        match normalize_key(name).as_str() {
            "" | "post" => Template::Post,
            "page" => Template::Page,
            other => Template::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Template::Post => "post",
            Template::Page => "page",
            Template::Other(name) => name.as_str(),
        }
    }
}

impl Display for Template {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Template {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Image reference as written in front matter. Resolution is left to the asset pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Thumbnail(pub String);

/// Rendered body, carried through to the feed untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedBody(pub String);

impl RenderedBody {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}
