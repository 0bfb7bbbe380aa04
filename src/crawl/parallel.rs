// src/crawl/parallel.rs
// =============================================================================
// This module implements the parallel crawler.
//
// How it works:
// 1. Compute the deadline once: now + timeout
// 2. Drop ignored starting URLs, then crawl the remaining ones at full depth
// 3. For each URL in a frontier:
//    - claim it in the shared visited set (only the first claimer wins)
//    - spawn a task that parses the page, adds its words to the shared
//      counts, and crawls its links one level deeper
// 4. A frontier is done once all the tasks it spawned are done
// 5. Rank the accumulated word counts into the top-K list
//
// A frontier stops immediately (before doing anything) when:
// - it is empty
// - no depth is left
// - the deadline has passed
//
// Depth and deadline together guarantee we stop even on sites whose links
// go round in circles or never end. Pages already being parsed when the
// deadline passes are allowed to finish and still count.
//
// A claimed page may still be waiting for a parse permit when the deadline
// passes. It is then dropped unparsed and released from the visited set, so
// urlsVisited only counts pages whose parse actually started.
//
// Shared state (one per crawl):
// - visited: DashSet<String>, insert() is an atomic "claim if absent"
// - word_counts: DashMap<String, u64>, updated with an atomic add
// =============================================================================

use super::{deadline_after, popular_words, CrawlResult, CrawlSettings, PatternFilter, WebCrawler};
use crate::parser::PageParser;
use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use futures::future::{BoxFuture, FutureExt};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Number of CPU cores available to this process (at least 1).
pub fn available_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// The worker count actually used: the requested count, capped by the
/// machine to avoid oversubscription, and never below 1.
pub fn effective_parallelism(requested: usize) -> usize {
    requested.min(available_parallelism()).max(1)
}

pub struct ParallelCrawler {
    parser: Arc<dyn PageParser>,
    settings: CrawlSettings,
    parallelism: usize,
    // Bounds how many pages are being parsed at once
    permits: Arc<Semaphore>,
}

// Everything the tasks of one crawl share
struct CrawlContext {
    deadline: Instant,
    visited: DashSet<String>,
    word_counts: DashMap<String, u64>,
    parser: Arc<dyn PageParser>,
    ignored_urls: PatternFilter,
    ignored_words: PatternFilter,
    permits: Arc<Semaphore>,
}

impl ParallelCrawler {
    pub fn new(parser: Arc<dyn PageParser>, settings: CrawlSettings) -> Self {
        let parallelism = effective_parallelism(settings.parallelism);

        Self {
            parser,
            settings,
            parallelism,
            permits: Arc::new(Semaphore::new(parallelism)),
        }
    }

    /// Number of pages this crawler parses at the same time.
    #[cfg(test)]
    pub fn parallelism(&self) -> usize {
        self.parallelism
    }
}

#[async_trait]
impl WebCrawler for ParallelCrawler {
    async fn crawl(&self, starting_urls: &[String]) -> CrawlResult {
        if starting_urls.is_empty() {
            return CrawlResult::empty();
        }

        let deadline = deadline_after(self.settings.timeout);
        let frontier = self
            .settings
            .ignored_urls
            .retain_unmatched(starting_urls.to_vec());

        let ctx = Arc::new(CrawlContext {
            deadline,
            visited: DashSet::new(),
            word_counts: DashMap::new(),
            parser: Arc::clone(&self.parser),
            ignored_urls: self.settings.ignored_urls.clone(),
            ignored_words: self.settings.ignored_words.clone(),
            permits: Arc::clone(&self.permits),
        });

        info!(
            start_pages = frontier.len(),
            max_depth = self.settings.max_depth,
            parallelism = self.parallelism,
            "starting parallel crawl"
        );

        crawl_frontier(Arc::clone(&ctx), frontier, self.settings.max_depth).await;

        let urls_visited = ctx.visited.len();
        let counts = ctx
            .word_counts
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()));
        let word_counts = popular_words(counts, self.settings.popular_word_count);

        info!(
            urls_visited,
            distinct_words = ctx.word_counts.len(),
            "crawl finished"
        );

        CrawlResult::new(word_counts, urls_visited)
    }

    fn max_parallelism(&self) -> usize {
        available_parallelism()
    }
}

// Crawls one frontier: forks a task per newly claimed URL, then joins them
//
// Boxed because it recurses through visit_page()
fn crawl_frontier(
    ctx: Arc<CrawlContext>,
    frontier: Vec<String>,
    depth: usize,
) -> BoxFuture<'static, ()> {
    async move {
        if frontier.is_empty() || depth == 0 || Instant::now() >= ctx.deadline {
            return;
        }

        let mut children = JoinSet::new();
        for url in ctx.ignored_urls.retain_unmatched(frontier) {
            // insert() returns false if another task already claimed this URL
            if !ctx.visited.insert(url.clone()) {
                continue;
            }
            children.spawn(visit_page(Arc::clone(&ctx), url, depth));
        }

        while let Some(joined) = children.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "crawl task did not complete");
            }
        }
    }
    .boxed()
}

// Parses one claimed page, merges its words, and crawls its links
async fn visit_page(ctx: Arc<CrawlContext>, url: String, depth: usize) {
    let parsed = {
        let Ok(_permit) = ctx.permits.acquire().await else {
            return;
        };
        // The wait for a permit may have outlasted the deadline
        if Instant::now() >= ctx.deadline {
            ctx.visited.remove(&url);
            debug!(url = %url, "deadline passed before parsing, skipped");
            return;
        }
        ctx.parser.parse(&url).await
    };

    let page = match parsed {
        Ok(page) => page,
        Err(e) => {
            // The page stays claimed but contributes no words and no links
            warn!(url = %url, error = %e, "failed to parse page");
            return;
        }
    };

    debug!(
        url = %url,
        depth,
        words = page.word_counts.len(),
        links = page.links.len(),
        "parsed page"
    );

    for (word, count) in ctx.ignored_words.filter_counts(page.word_counts) {
        *ctx.word_counts.entry(word).or_insert(0) += count;
    }

    let next = ctx.ignored_urls.retain_unmatched(page.links);
    crawl_frontier(ctx, next, depth - 1).await;
}
