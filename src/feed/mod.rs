use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::config::Config;
use crate::content::Record;
use crate::error::SerializationError;
use crate::feed::rss_renderer::RssChannel;
use crate::text_utils::truncate_excerpt;

pub mod rss_renderer;

/// Everything the feed needs from the site configuration.
#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub site_url: Option<String>,
    pub path_prefix: String,
    pub title: String,
    pub description: String,
    pub output_path: String,
    pub logo: Option<String>,
    pub generator: String,
    pub author: String,
    pub item_limit: usize,
    pub excerpt_max_length: usize,
}

impl FeedSettings {
    pub fn from_config(config: &Config) -> FeedSettings {
        FeedSettings {
            site_url: config.site.site_url.clone(),
            path_prefix: config.site.path_prefix.clone(),
            title: config.feed.title.clone().unwrap_or_else(|| config.site.title.clone()),
            description: config.site.description.clone(),
            output_path: config.feed.output_path.clone(),
            logo: config.site.logo.clone(),
            generator: config.feed.generator.clone(),
            author: config.site.author.clone().unwrap_or_else(default_author),
            item_limit: config.feed.item_limit,
            excerpt_max_length: config.defaults.excerpt_max_length,
        }
    }

    fn base_url(&self) -> Result<&str, SerializationError> {
        match self.site_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(SerializationError::MissingSiteUrl),
        }
    }

    /// Site url joined with the path prefix.
    pub fn site_link(&self) -> Result<String, SerializationError> {
        Ok(join_url(self.base_url()?, &[self.path_prefix.as_str()]))
    }

    pub fn link_to(&self, path: &str) -> Result<String, SerializationError> {
        Ok(join_url(self.base_url()?, &[self.path_prefix.as_str(), path]))
    }
}

/// Author used when neither the record nor the site names one: the OS user's real name.
fn default_author() -> String {
    let name = whoami::realname();
    if name.trim().is_empty() {
        return whoami::username();
    }
    name
}

/// One record as the feed sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub categories: Vec<String>,
    pub date: NaiveDateTime,
    pub title: String,
    pub description: String,
    pub url: String,
    pub guid: String,
    pub encoded_content: String,
    pub author: String,
}

/// Joins url parts with exactly one `/` between them, whatever slashes the parts carry.
pub fn join_url(base: &str, parts: &[&str]) -> String {
    let mut url = base.trim().trim_end_matches('/').to_string();
    for part in parts {
        let part = part.trim().trim_matches('/');
        if part.is_empty() {
            continue;
        }
        url.push('/');
        url.push_str(part);
    }
    url
}

pub fn project_record(record: &Record, settings: &FeedSettings) -> Result<FeedItem, SerializationError> {
    let url = settings.link_to(&record.slug)?;
    Ok(FeedItem {
        categories: record.tags.iter().map(|t| t.display.clone()).collect(),
        date: record.date,
        title: record.title.clone(),
        description: truncate_excerpt(&record.excerpt, settings.excerpt_max_length),
        guid: url.clone(),
        url,
        encoded_content: record.body.as_str().to_string(),
        author: record.author.clone().unwrap_or_else(|| settings.author.clone()),
    })
}

/// Feed items for `records`, which are expected to be the publishable subset in
/// chronological order. At most `item_limit` items are produced.
pub fn project(records: &[Arc<Record>], settings: &FeedSettings) -> Result<Vec<FeedItem>, SerializationError> {
    settings.base_url()?;
    records.iter()
        .filter(|r| r.is_publishable())
        .take(settings.item_limit)
        .map(|r| project_record(r, settings))
        .collect()
}

/// Projection and serialization in one call.
pub fn render_feed(records: &[Arc<Record>], settings: &FeedSettings) -> Result<Vec<u8>, SerializationError> {
    let items = project(records, settings)?;
    let channel = RssChannel::from_settings(settings)?;
    channel.render(&items)
}
