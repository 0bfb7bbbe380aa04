// src/config.rs
// =============================================================================
// Loads the crawler configuration from a JSON file.
//
// Example file:
//   {
//     "startPages": ["https://example.com/"],
//     "ignoredUrls": ["https://example.com/private/.*"],
//     "ignoredWords": ["^.{1,3}$"],
//     "parallelism": 4,
//     "implementationOverride": "parallel",
//     "maxDepth": 3,
//     "timeoutSeconds": 5,
//     "popularWordCount": 10,
//     "resultPath": "out/result.json",
//     "profileOutputPath": "out/profile.txt"
//   }
//
// Every key is optional. Patterns are compiled once here, so a bad regex is
// reported before any crawling starts.
// =============================================================================

use crate::crawl::{available_parallelism, CrawlSettings, PatternError, PatternFilter};
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("unknown crawler implementation '{0}' (expected \"parallel\" or \"sequential\")")]
    UnknownImplementation(String),
}

// Which WebCrawler to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrawlerKind {
    #[default]
    Parallel,
    Sequential,
}

// The file as written by the user, before validation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawConfig {
    start_pages: Vec<String>,
    ignored_urls: Vec<String>,
    ignored_words: Vec<String>,
    parallelism: Option<usize>,
    implementation_override: String,
    max_depth: usize,
    timeout_seconds: u64,
    popular_word_count: usize,
    result_path: String,
    profile_output_path: String,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            start_pages: Vec::new(),
            ignored_urls: Vec::new(),
            ignored_words: Vec::new(),
            parallelism: None,
            implementation_override: String::new(),
            max_depth: 0,
            timeout_seconds: 1,
            popular_word_count: 0,
            result_path: String::new(),
            profile_output_path: String::new(),
        }
    }
}

// A validated configuration, ready to build crawlers from
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    pub start_pages: Vec<String>,
    pub crawler: CrawlerKind,
    pub settings: CrawlSettings,
    /// None = write the JSON result to stdout
    pub result_path: Option<PathBuf>,
    /// None = write the profile report to stdout
    pub profile_output_path: Option<PathBuf>,
}

impl CrawlerConfig {
    /// Reads and validates the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_reader(reader)?;
        Self::from_raw(raw)
    }

    #[cfg(test)]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let crawler = match raw.implementation_override.trim() {
            "" | "parallel" => CrawlerKind::Parallel,
            "sequential" => CrawlerKind::Sequential,
            other => return Err(ConfigError::UnknownImplementation(other.to_string())),
        };

        let settings = CrawlSettings {
            timeout: Duration::from_secs(raw.timeout_seconds),
            max_depth: raw.max_depth,
            popular_word_count: raw.popular_word_count,
            parallelism: raw.parallelism.unwrap_or_else(available_parallelism),
            ignored_urls: PatternFilter::new(&raw.ignored_urls)?,
            ignored_words: PatternFilter::new(&raw.ignored_words)?,
        };

        Ok(Self {
            start_pages: raw.start_pages,
            crawler,
            settings,
            result_path: non_empty_path(raw.result_path),
            profile_output_path: non_empty_path(raw.profile_output_path),
        })
    }
}

// An empty path string means "no destination given"
fn non_empty_path(path: String) -> Option<PathBuf> {
    if path.trim().is_empty() {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let config = CrawlerConfig::from_json(
            r#"{
                "startPages": ["http://a.com/", "http://b.com/"],
                "ignoredUrls": ["http://a\\.com/skip.*"],
                "ignoredWords": ["^.{1,3}$"],
                "parallelism": 3,
                "implementationOverride": "sequential",
                "maxDepth": 4,
                "timeoutSeconds": 7,
                "popularWordCount": 5,
                "resultPath": "out/result.json",
                "profileOutputPath": ""
            }"#,
        )
        .unwrap();

        assert_eq!(config.start_pages, vec!["http://a.com/", "http://b.com/"]);
        assert_eq!(config.crawler, CrawlerKind::Sequential);
        assert_eq!(config.settings.timeout, Duration::from_secs(7));
        assert_eq!(config.settings.max_depth, 4);
        assert_eq!(config.settings.popular_word_count, 5);
        assert_eq!(config.settings.parallelism, 3);
        assert!(config.settings.ignored_urls.matches("http://a.com/skip/me"));
        assert!(!config.settings.ignored_urls.matches("http://a.com/"));
        assert!(config.settings.ignored_words.matches("the"));
        assert!(!config.settings.ignored_words.matches("crawler"));
        assert_eq!(config.result_path, Some(PathBuf::from("out/result.json")));
        assert_eq!(config.profile_output_path, None);
    }

    #[test]
    fn test_defaults() {
        let config = CrawlerConfig::from_json("{}").unwrap();
        assert!(config.start_pages.is_empty());
        assert_eq!(config.crawler, CrawlerKind::Parallel);
        assert_eq!(config.settings.timeout, Duration::from_secs(1));
        assert_eq!(config.settings.max_depth, 0);
        assert_eq!(config.settings.parallelism, available_parallelism());
        assert!(config.settings.ignored_urls.is_empty());
        assert_eq!(config.result_path, None);
    }

    #[test]
    fn test_bad_pattern_is_named() {
        let err = CrawlerConfig::from_json(r#"{"ignoredWords": ["ok", "[oops"]}"#).unwrap_err();
        match err {
            ConfigError::Pattern(e) => {
                assert_eq!(e.pattern, "[oops");
                assert!(e.to_string().contains("[oops"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_unknown_implementation() {
        let err = CrawlerConfig::from_json(r#"{"implementationOverride": "quantum"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownImplementation(ref s) if s == "quantum"));
    }

    #[test]
    fn test_negative_depth_is_rejected() {
        let err = CrawlerConfig::from_json(r#"{"maxDepth": -1}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
