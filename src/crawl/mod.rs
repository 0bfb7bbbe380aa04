// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Parallel crawling: every page becomes its own tokio task
// - Configurable depth limit and a global deadline
// - URL and word exclusion patterns
// - Word counting across every visited page, ranked into a top-K list
//
// Submodules:
// - parallel: The concurrent crawler (the default)
// - sequential: A simple one-page-at-a-time crawler with the same rules
// - filter: Full-string regex filters for URLs and words
// - words: Popular word ranking
// - result: The CrawlResult returned by every crawler
// =============================================================================

mod filter;
mod parallel;
mod result;
mod sequential;
mod words;

pub use filter::{PatternError, PatternFilter};
pub use parallel::{available_parallelism, effective_parallelism, ParallelCrawler};
pub use result::CrawlResult;
pub use sequential::SequentialCrawler;
pub use words::popular_words;

use crate::profiler::{Contract, Fulfills, Operation};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;

// Deadlines further out than this are clamped to it
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// The instant `timeout` from now.
///
/// Huge timeouts (e.g. `u64::MAX` seconds) would overflow the clock, so the
/// deadline is clamped to roughly thirty years away.
pub(crate) fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout.min(FAR_FUTURE)).unwrap_or(now)
}

/// A crawler: visits pages starting from some URLs and reports what it found.
#[async_trait]
pub trait WebCrawler: Send + Sync {
    /// Crawls from `starting_urls` until the depth limit or deadline is hit.
    ///
    /// Always returns a result, even if only part of the site was covered.
    async fn crawl(&self, starting_urls: &[String]) -> CrawlResult;

    /// Most threads this crawler can make use of on this machine.
    fn max_parallelism(&self) -> usize;
}

impl Contract for dyn WebCrawler {
    const NAME: &'static str = "WebCrawler";
    const OPERATIONS: &'static [Operation] = &[
        Operation::profiled("crawl"),
        Operation::passthrough("max_parallelism"),
    ];
}

impl<W: WebCrawler> Fulfills<dyn WebCrawler> for W {}

// The knobs shared by every crawler implementation
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Wall-clock budget for one crawl, measured from its start
    pub timeout: Duration,
    /// How many link hops to follow (1 = only the starting pages)
    pub max_depth: usize,
    /// K in "top-K popular words"
    pub popular_word_count: usize,
    /// Requested number of parallel workers (capped by the machine)
    pub parallelism: usize,
    pub ignored_urls: PatternFilter,
    pub ignored_words: PatternFilter,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(1),
            max_depth: 0,
            popular_word_count: 0,
            parallelism: available_parallelism(),
            ignored_urls: PatternFilter::empty(),
            ignored_words: PatternFilter::empty(),
        }
    }
}
