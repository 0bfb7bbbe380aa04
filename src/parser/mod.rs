// src/parser/mod.rs
// =============================================================================
// This module turns a URL into the two things the crawler cares about:
// - how often each word appears on the page
// - which links the page points to
//
// Submodules:
// - html: Pulls words and links out of an HTML document
// - http: Fetches pages over HTTP(S) or from file:// URLs
//
// The crawler only ever talks to the PageParser trait, so tests can plug in
// a fake parser that describes a link graph in memory.
// =============================================================================

mod html;
mod http;

pub use html::parse_html;
pub use http::HttpPageParser;

use crate::profiler::{Contract, Fulfills, Operation};
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

// Everything we learned from one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContent {
    /// word -> number of occurrences on this page
    pub word_counts: HashMap<String, u64>,
    /// Absolute URLs linked from this page, in document order
    pub links: Vec<String>,
}

// Why a page could not be parsed
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("could not read page: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("unsupported URL scheme '{0}'")]
    UnsupportedScheme(String),
}

/// Fetches and parses a single page.
///
/// Implementations may be slow (network bound) and may fail; the crawler
/// treats a failure as "this page contributed nothing".
#[async_trait]
pub trait PageParser: Send + Sync {
    async fn parse(&self, url: &str) -> Result<PageContent, ParseError>;
}

impl Contract for dyn PageParser {
    const NAME: &'static str = "PageParser";
    const OPERATIONS: &'static [Operation] = &[Operation::profiled("parse")];
}

impl<P: PageParser> Fulfills<dyn PageParser> for P {}
