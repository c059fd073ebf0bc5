use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;

use crate::content::front_matter::{NormalizeOptions, DEFAULT_EXCERPT_MAX_LENGTH, DEFAULT_WORDS_PER_MINUTE};

pub const DEFAULT_FEED_ITEM_LIMIT: usize = 1000;

#[derive(Deserialize, Debug, Clone)]
pub struct Site {
    pub site_url: Option<String>,
    #[serde(default)]
    pub path_prefix: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub author: Option<String>,
    pub logo: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Paths {
    pub content_dir: PathBuf,
    pub output_dir: PathBuf,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Feed {
    pub output_path: String,
    pub title: Option<String>,
    pub generator: String,
    pub item_limit: usize,
}

impl Default for Feed {
    fn default() -> Self {
        Feed {
            output_path: "/rss.xml".to_string(),
            title: None,
            generator: "folio".to_string(),
            item_limit: DEFAULT_FEED_ITEM_LIMIT,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Defaults {
    pub excerpt_max_length: usize,
    pub words_per_minute: u32,
    pub page_size: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            excerpt_max_length: DEFAULT_EXCERPT_MAX_LENGTH,
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            page_size: 10,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub site: Site,
    pub paths: Paths,
    #[serde(default)]
    pub feed: Feed,
    #[serde(default)]
    pub defaults: Defaults,
    pub log: Option<Log>,
}

impl Config {
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            excerpt_max_length: self.defaults.excerpt_max_length,
            words_per_minute: self.defaults.words_per_minute,
        }
    }
}

fn parse_path(path: PathBuf) -> PathBuf {
    let Some(str_path) = path.to_str() else {
        return path;
    };
    if !str_path.starts_with("${exe_dir}") {
        return path;
    }

    match env::current_exe().ok().as_deref().and_then(Path::parent).and_then(Path::to_str) {
        Some(exe_dir) => PathBuf::from(str_path.replace("${exe_dir}", exe_dir)),
        None => path,
    }
}

pub fn parse_config(cfg_content: &str) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    cfg.paths = Paths {
        content_dir: parse_path(cfg.paths.content_dir),
        output_dir: parse_path(cfg.paths.output_dir),
    };

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    parse_config(&cfg_content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_CONFIG: &str = r##"
[site]
site_url = "https://example.com"
path_prefix = "/blog"
title = "My blog"
description = "Writing about things"
author = "me@example.com"
logo = "images/logo.png"

[paths]
content_dir = "content"
output_dir = "public"

[feed]
output_path = "/feed.xml"
title = "My blog - RSS Feed"
item_limit = 20

[defaults]
excerpt_max_length = 120

[log]
level = "Debug"
log_to_console = true
"##;

    #[test]
    fn test_full_config() {
        let cfg = parse_config(FULL_CONFIG).unwrap();
        assert_eq!(cfg.site.site_url.as_deref(), Some("https://example.com"));
        assert_eq!(cfg.site.path_prefix, "/blog");
        assert_eq!(cfg.feed.output_path, "/feed.xml");
        assert_eq!(cfg.feed.generator, "folio");
        assert_eq!(cfg.feed.item_limit, 20);
        assert_eq!(cfg.defaults.excerpt_max_length, 120);
        assert_eq!(cfg.defaults.words_per_minute, 265);
        assert_eq!(cfg.log.unwrap().level, LogLevel::Debug);
    }

    #[test]
    fn test_defaults() {
        let cfg = parse_config(r#"
[site]
title = "Minimal"

[paths]
content_dir = "${exe_dir}/content"
output_dir = "public"
"#).unwrap();
        assert!(cfg.site.site_url.is_none());
        assert_eq!(cfg.site.path_prefix, "");
        assert_eq!(cfg.feed.output_path, "/rss.xml");
        assert_eq!(cfg.feed.item_limit, 1000);
        assert_eq!(cfg.normalize_options().excerpt_max_length, 180);
        assert!(cfg.log.is_none());
        assert!(!cfg.paths.content_dir.to_string_lossy().contains("${exe_dir}"));
    }

    #[test]
    fn test_invalid_config() {
        let err = parse_config("[site]\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }
}
