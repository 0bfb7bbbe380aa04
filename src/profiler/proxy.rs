// src/profiler/proxy.rs
// =============================================================================
// Profiled<T>: a decorator that implements the same trait as T.
//
// For every profiled operation it:
// 1. Notes the start time
// 2. Forwards the call to the wrapped value
// 3. Records the elapsed time under (type of T, operation name)
//
// Step 3 lives in a Drop guard, so the time is recorded however the call
// ends: Ok, Err, a panic, or the future being dropped half way. Results and
// errors are handed back exactly as the wrapped value produced them.
//
// Whether an operation is profiled is looked up in the trait's Contract
// table on every call. Non-profiled operations are plain forwarding calls
// and never touch the profiling state.
// =============================================================================

use super::{Contract, ProfiledOperationKey, ProfilingState};
use crate::crawl::{CrawlResult, WebCrawler};
use crate::parser::{PageContent, PageParser, ParseError};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tokio::time::Instant;

pub struct Profiled<T> {
    delegate: T,
    state: Arc<ProfilingState>,
}

impl<T> Profiled<T> {
    pub(super) fn new(delegate: T, state: Arc<ProfilingState>) -> Self {
        Self { delegate, state }
    }

    /// The wrapped value.
    #[cfg(test)]
    pub fn inner(&self) -> &T {
        &self.delegate
    }

    /// Key under which calls to `operation` are recorded.
    pub fn key(operation: &'static str) -> ProfiledOperationKey {
        ProfiledOperationKey::new(std::any::type_name::<T>(), operation)
    }

    // None when contract C does not profile `operation`
    fn start<C: Contract + ?Sized>(&self, operation: &'static str) -> Option<CallTimer<'_>> {
        if !C::is_profiled(operation) {
            return None;
        }
        Some(CallTimer {
            state: &self.state,
            key: Self::key(operation),
            started: Instant::now(),
        })
    }
}

// Shows the delegate by type name, so T need not be Debug
impl<T> fmt::Debug for Profiled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profiled")
            .field("delegate", &std::any::type_name::<T>())
            .field("recorded", &self.state.len())
            .finish()
    }
}

// Records the elapsed time when dropped
struct CallTimer<'a> {
    state: &'a ProfilingState,
    key: ProfiledOperationKey,
    started: Instant,
}

impl Drop for CallTimer<'_> {
    fn drop(&mut self) {
        self.state.record(self.key, self.started.elapsed());
    }
}

#[async_trait]
impl<P: PageParser> PageParser for Profiled<P> {
    async fn parse(&self, url: &str) -> Result<PageContent, ParseError> {
        let _timer = self.start::<dyn PageParser>("parse");
        self.delegate.parse(url).await
    }
}

#[async_trait]
impl<C: WebCrawler> WebCrawler for Profiled<C> {
    async fn crawl(&self, starting_urls: &[String]) -> CrawlResult {
        let _timer = self.start::<dyn WebCrawler>("crawl");
        self.delegate.crawl(starting_urls).await
    }

    fn max_parallelism(&self) -> usize {
        let _timer = self.start::<dyn WebCrawler>("max_parallelism");
        self.delegate.max_parallelism()
    }
}
