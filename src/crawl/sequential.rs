// src/crawl/sequential.rs
// =============================================================================
// A crawler that visits one page at a time, depth-first.
//
// Same rules as the parallel crawler (depth limit, deadline, ignored URLs
// and words, each URL parsed at most once) but no concurrency at all. It is
// selected with "implementationOverride": "sequential" and doubles as a
// reference when checking the parallel crawler's results.
// =============================================================================

use super::{deadline_after, popular_words, CrawlResult, CrawlSettings, WebCrawler};
use crate::parser::PageParser;
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{info, warn};

pub struct SequentialCrawler {
    parser: Arc<dyn PageParser>,
    settings: CrawlSettings,
}

// Mutable state of one crawl, owned by the single running task
#[derive(Default)]
struct Visit {
    visited: HashSet<String>,
    word_counts: HashMap<String, u64>,
}

impl SequentialCrawler {
    pub fn new(parser: Arc<dyn PageParser>, settings: CrawlSettings) -> Self {
        Self { parser, settings }
    }

    fn crawl_page<'a>(
        &'a self,
        url: &'a str,
        deadline: Instant,
        depth: usize,
        visit: &'a mut Visit,
    ) -> BoxFuture<'a, ()> {
        async move {
            if depth == 0 || Instant::now() >= deadline {
                return;
            }
            if self.settings.ignored_urls.matches(url) {
                return;
            }
            if !visit.visited.insert(url.to_string()) {
                return;
            }

            let page = match self.parser.parse(url).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(url, error = %e, "failed to parse page");
                    return;
                }
            };

            for (word, count) in self.settings.ignored_words.filter_counts(page.word_counts) {
                *visit.word_counts.entry(word).or_insert(0) += count;
            }
            for link in &page.links {
                self.crawl_page(link, deadline, depth - 1, visit).await;
            }
        }
        .boxed()
    }
}

#[async_trait]
impl WebCrawler for SequentialCrawler {
    async fn crawl(&self, starting_urls: &[String]) -> CrawlResult {
        if starting_urls.is_empty() {
            return CrawlResult::empty();
        }

        let deadline = deadline_after(self.settings.timeout);
        let mut visit = Visit::default();

        info!(
            start_pages = starting_urls.len(),
            max_depth = self.settings.max_depth,
            "starting sequential crawl"
        );

        for url in starting_urls {
            self.crawl_page(url, deadline, self.settings.max_depth, &mut visit)
                .await;
        }

        let word_counts = popular_words(visit.word_counts, self.settings.popular_word_count);
        CrawlResult::new(word_counts, visit.visited.len())
    }

    fn max_parallelism(&self) -> usize {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::testing::FakeSite;
    use crate::crawl::PatternFilter;
    use std::time::Duration;

    fn settings(max_depth: usize) -> CrawlSettings {
        CrawlSettings {
            timeout: Duration::from_secs(60),
            max_depth,
            popular_word_count: 3,
            ..CrawlSettings::default()
        }
    }

    #[tokio::test]
    async fn test_visits_depth_first_once_each() {
        let site = Arc::new(
            FakeSite::new()
                .page("a", &[("one", 1)], &["b", "c"])
                .page("b", &[("two", 2)], &["a", "c"])
                .page("c", &[("three", 3)], &["a"]),
        );
        let crawler = SequentialCrawler::new(Arc::clone(&site) as Arc<dyn PageParser>, settings(5));

        let result = crawler.crawl(&["a".to_string()]).await;

        assert_eq!(site.calls(), vec!["a", "b", "c"]);
        assert_eq!(result.urls_visited, 3);
        assert_eq!(
            result.word_counts,
            vec![
                ("three".to_string(), 3),
                ("two".to_string(), 2),
                ("one".to_string(), 1),
            ]
        );
        assert_eq!(crawler.max_parallelism(), 1);
    }

    #[tokio::test]
    async fn test_filters_apply() {
        let site = Arc::new(
            FakeSite::new()
                .page("a", &[("keep", 1), ("drop", 5)], &["skip", "b"])
                .page("skip", &[("hidden", 9)], &[])
                .page("b", &[("keep", 1)], &[]),
        );
        let mut s = settings(5);
        s.ignored_urls = PatternFilter::new(["skip"]).unwrap();
        s.ignored_words = PatternFilter::new(["drop"]).unwrap();

        let result = SequentialCrawler::new(Arc::clone(&site) as Arc<dyn PageParser>, s)
            .crawl(&["a".to_string()])
            .await;

        assert_eq!(site.calls(), vec!["a", "b"]);
        assert_eq!(result.word_counts, vec![("keep".to_string(), 2)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_timeout_still_crawls() {
        let site = Arc::new(FakeSite::new().page("a", &[("only", 1)], &["a"]));
        let mut s = settings(5);
        s.timeout = Duration::from_secs(u64::MAX);

        let result = SequentialCrawler::new(Arc::clone(&site) as Arc<dyn PageParser>, s)
            .crawl(&["a".to_string()])
            .await;

        assert_eq!(result.urls_visited, 1);
        assert_eq!(result.word_counts, vec![("only".to_string(), 1)]);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let site = Arc::new(FakeSite::new());
        let result = SequentialCrawler::new(Arc::clone(&site) as Arc<dyn PageParser>, settings(5))
            .crawl(&[])
            .await;
        assert_eq!(result, CrawlResult::empty());
        assert!(site.calls().is_empty());
    }
}
