use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use spdlog::{error, info, warn};

use crate::config::Config;
use crate::content::content_renderer::ContentRenderer;
use crate::content::front_matter::{normalize_all, NormalizeOptions};
use crate::content::markdown_renderer::MarkdownRenderer;
use crate::content::raw_document::RawDocument;
use crate::content_index::ContentIndex;
use crate::error::{CollisionError, SerializationError, SourceError, ValidationReport};
use crate::feed::{render_feed, FeedSettings};
use crate::listing::Listing;
use crate::source::DocumentSource;

pub const LISTING_FILE: &str = "listing.json";

/// Result of one pass over the documents. Nothing here has touched the disk yet.
pub struct PipelineOutput {
    pub index: ContentIndex,
    pub validation: ValidationReport,
    pub feed: Result<Vec<u8>, SerializationError>,
}

impl PipelineOutput {
    pub fn listing(&self) -> Listing<'_> {
        Listing::from_index(&self.index)
    }
}

/// Normalizes, indexes and serializes. Rejected documents end up in the report;
/// a slug collision stops the run.
pub fn run(documents: &[RawDocument], settings: &FeedSettings, options: &NormalizeOptions,
           renderer: &dyn ContentRenderer) -> Result<PipelineOutput, CollisionError> {
    let (records, validation) = normalize_all(documents, renderer, options);
    let index = ContentIndex::build(records)?;
    let feed = render_feed(index.publishable(), settings);

    Ok(PipelineOutput {
        index,
        validation,
        feed,
    })
}

/// What a build produced on disk and what went wrong on the way.
#[derive(Debug)]
pub struct BuildReport {
    pub documents: usize,
    pub records: usize,
    pub published: usize,
    pub validation: ValidationReport,
    pub feed_path: Option<PathBuf>,
    pub feed_error: Option<SerializationError>,
    pub listing_path: PathBuf,
}

impl BuildReport {
    pub fn has_errors(&self) -> bool {
        !self.validation.is_empty() || self.feed_error.is_some()
    }
}

pub fn feed_path(config: &Config) -> PathBuf {
    config.paths.output_dir.join(config.feed.output_path.trim_start_matches('/'))
}

/// Documents of the content directory. Files whose front matter cannot even be split are reported.
pub fn load_documents(config: &Config) -> Result<(Vec<RawDocument>, ValidationReport), SourceError> {
    let source = DocumentSource::new(&config.paths.content_dir);
    let files = source.load()?;
    info!("Loaded {} documents from {}", files.len(), config.paths.content_dir.display());

    let mut validation = ValidationReport::default();
    let mut documents = Vec::with_capacity(files.len());
    for file in files {
        match file.into_raw_document() {
            Ok(doc) => documents.push(doc),
            Err(e) => validation.extend(vec![e]),
        }
    }
    Ok((documents, validation))
}

/// Index of the content directory without writing anything.
pub fn load_index(config: &Config) -> anyhow::Result<(ContentIndex, ValidationReport)> {
    let (documents, mut validation) = load_documents(config)?;
    let (records, report) = normalize_all(&documents, &MarkdownRenderer::default(), &config.normalize_options());
    validation.extend(report.errors);
    let index = ContentIndex::build(records)?;
    Ok((index, validation))
}

/// Reads the content directory and writes the feed and listing into the output directory.
pub fn build_site(config: &Config) -> anyhow::Result<BuildReport> {
    let (documents, mut validation) = load_documents(config)?;
    let document_count = documents.len() + validation.len();

    let settings = FeedSettings::from_config(config);
    let output = match run(&documents, &settings, &config.normalize_options(), &MarkdownRenderer::default()) {
        Ok(output) => output,
        Err(e) => {
            error!("Nothing written: {}", e);
            return Err(e.into());
        }
    };
    validation.extend(output.validation.errors.clone());
    for err in validation.errors.iter() {
        warn!("Skipped {}", err);
    }

    let output_dir = &config.paths.output_dir;
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Error creating output directory {}", output_dir.display()))?;

    let listing_path = output_dir.join(LISTING_FILE);
    let listing = output.listing().to_json().context("Error serializing listing")?;
    write_file(&listing_path, listing.as_bytes())?;

    let (feed_path, feed_error) = match output.feed {
        Ok(xml) => {
            let path = feed_path(config);
            write_file(&path, &xml)?;
            info!("Feed written to {}", path.display());
            (Some(path), None)
        }
        Err(e) => {
            error!("Feed not written: {}", e);
            (None, Some(e))
        }
    };

    let report = BuildReport {
        documents: document_count,
        records: output.index.len(),
        published: output.index.publishable().len(),
        validation,
        feed_path,
        feed_error,
        listing_path,
    };
    info!("Built {} records, {} published", report.records, report.published);

    Ok(report)
}

fn write_file(path: &Path, content: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Error creating directory {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Error writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::str;

    use crate::config::parse_config;
    use crate::error::ValidationKind;
    use crate::feed::tests::settings;
    use crate::search::{search, SearchQuery};
    use crate::test_data::{post_doc, raw_doc};

    use super::*;

    fn pipeline(documents: &[RawDocument], settings: &FeedSettings) -> Result<PipelineOutput, CollisionError> {
        run(documents, settings, &NormalizeOptions::default(), &MarkdownRenderer::default())
    }

    fn blog() -> Vec<RawDocument> {
        vec![
            post_doc("first.md", "First", "2021-01-01", &["css"], "post"),
            post_doc("hooks/index.md", "Testing React hooks", "2021-03-01", &["React", "testing"], "post"),
            post_doc("grid.md", "Grid layouts", "2021-02-01", &["css", "react"], "post"),
            post_doc("about.md", "About me", "2021-04-01", &["react"], "page"),
        ]
    }

    #[test]
    fn test_feed_is_newest_first_without_pages() {
        let output = pipeline(&blog(), &settings()).unwrap();
        assert!(output.validation.is_empty());
        assert_eq!(output.index.len(), 4);

        let xml = output.feed.unwrap();
        let xml = str::from_utf8(&xml).unwrap();
        let hooks = xml.find("<link>https://example.com/blog/hooks</link>").unwrap();
        let grid = xml.find("<link>https://example.com/blog/grid</link>").unwrap();
        let first = xml.find("<link>https://example.com/blog/first</link>").unwrap();
        assert!(hooks < grid && grid < first);
        assert!(!xml.contains("blog/about"));
        assert_eq!(xml.matches("<item>").count(), 3);
        assert!(xml.contains("<lastBuildDate>Mon, 01 Mar 2021 00:00:00 +0000</lastBuildDate>"));
    }

    #[test]
    fn test_tag_filter_is_case_insensitive() {
        let output = pipeline(&blog(), &settings()).unwrap();
        let found = search(output.index.publishable(), &SearchQuery::tag("REACT"));
        let slugs: Vec<&str> = found.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, vec!["hooks", "grid"]);
    }

    #[test]
    fn test_rebuild_is_byte_identical() {
        let first = pipeline(&blog(), &settings()).unwrap();
        let second = pipeline(&blog(), &settings()).unwrap();
        assert_eq!(first.listing().to_json().unwrap(), second.listing().to_json().unwrap());
        assert_eq!(first.feed.unwrap(), second.feed.unwrap());
    }

    #[test]
    fn test_invalid_documents_are_skipped() {
        let mut docs = blog();
        docs.push(raw_doc("drafts/untitled.md", "---\ndate: 2021-05-01\n---\nNo title.\n", None));

        let output = pipeline(&docs, &settings()).unwrap();
        assert_eq!(output.index.len(), 4);
        assert_eq!(output.validation.errors.len(), 1);
        assert_eq!(output.validation.errors[0].path, "drafts/untitled.md");
        assert_eq!(output.validation.errors[0].kind, ValidationKind::MissingField("title"));
        assert!(output.feed.is_ok());
    }

    #[test]
    fn test_collision_aborts() {
        let mut docs = blog();
        docs.push(post_doc("archive/first.md", "First again", "2020-01-01", &[], "post"));
        docs.push(raw_doc("other.md", "---\ntitle: Other\nslug: first\ndate: 2020-01-01\n---\n", None));

        let err = pipeline(&docs, &settings()).err().unwrap();
        assert_eq!(err.collisions.len(), 1);
        assert_eq!(err.collisions[0].first, "first.md");
        assert_eq!(err.collisions[0].second, "other.md");
    }

    #[test]
    fn test_missing_site_url_still_lists() {
        let no_url = FeedSettings { site_url: None, ..settings() };
        let output = pipeline(&blog(), &no_url).unwrap();
        assert!(matches!(output.feed, Err(SerializationError::MissingSiteUrl)));
        assert_eq!(output.listing().post_count, 3);
    }

    fn config_for(root: &Path, site_url: Option<&str>) -> Config {
        let site_url = site_url.map(|u| format!("site_url = \"{}\"\n", u)).unwrap_or_default();
        parse_config(&format!(r#"
[site]
{}title = "My blog"
author = "me@example.com"

[paths]
content_dir = "{}"
output_dir = "{}"
"#, site_url, root.join("content").display(), root.join("public").display())).unwrap()
    }

    fn write_doc(root: &Path, rel: &str, text: &str) {
        let path = root.join("content").join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    #[test]
    fn test_build_site_writes_artifacts() {
        let root = tempfile::tempdir().unwrap();
        write_doc(root.path(), "hello.md", "---\ntitle: Hello\ndate: 2021-01-01\ntags: [rust]\n---\nHello world.\n");
        write_doc(root.path(), "broken.md", "---\ntitle: Broken\n");

        let config = config_for(root.path(), Some("https://example.com"));
        let report = build_site(&config).unwrap();
        assert_eq!(report.records, 1);
        assert_eq!(report.published, 1);
        assert_eq!(report.validation.paths(), vec!["broken.md"]);
        assert!(report.has_errors());

        let feed = fs::read_to_string(root.path().join("public/rss.xml")).unwrap();
        assert!(feed.contains("<link>https://example.com/hello</link>"));
        let listing = fs::read_to_string(root.path().join("public").join(LISTING_FILE)).unwrap();
        let listing: serde_json::Value = serde_json::from_str(&listing).unwrap();
        assert_eq!(listing["posts"][0]["slug"], "hello");
        assert_eq!(listing["tags"][0]["key"], "rust");
    }

    #[test]
    fn test_build_site_without_site_url() {
        let root = tempfile::tempdir().unwrap();
        write_doc(root.path(), "hello.md", "---\ntitle: Hello\ndate: 2021-01-01\n---\nHello world.\n");

        let report = build_site(&config_for(root.path(), None)).unwrap();
        assert!(matches!(report.feed_error, Some(SerializationError::MissingSiteUrl)));
        assert!(report.feed_path.is_none());
        assert!(report.listing_path.exists());
        assert!(!root.path().join("public/rss.xml").exists());
    }

    #[test]
    fn test_load_index() {
        let root = tempfile::tempdir().unwrap();
        write_doc(root.path(), "posts/hello.md", "---\ntitle: Hello\ndate: 2021-01-01\n---\nHello world.\n");
        write_doc(root.path(), "posts/bad-date.md", "---\ntitle: Bad\ndate: someday\n---\n");

        let (index, validation) = load_index(&config_for(root.path(), None)).unwrap();
        assert_eq!(index.len(), 1);
        assert!(index.by_slug("posts/hello").is_some());
        assert_eq!(validation.errors[0].kind, ValidationKind::InvalidDate("someday".to_string()));
    }

    #[test]
    fn test_build_site_collision_writes_nothing() {
        let root = tempfile::tempdir().unwrap();
        write_doc(root.path(), "a.md", "---\ntitle: A\nslug: same\ndate: 2021-01-01\n---\n");
        write_doc(root.path(), "b.md", "---\ntitle: B\nslug: same\ndate: 2021-01-02\n---\n");

        let err = build_site(&config_for(root.path(), Some("https://example.com"))).unwrap_err();
        assert!(err.downcast_ref::<CollisionError>().is_some());
        assert!(!root.path().join("public").exists());
    }
}
