// src/profiler/mod.rs
// =============================================================================
// This module measures how much wall-clock time selected operations take.
//
// How it fits together:
// - A trait (PageParser, WebCrawler, ...) describes itself with the Contract
//   trait: its name and which of its operations are "profiled"
// - Fulfills<C> ties an implementation to the contract of its trait, so
//   wrap() only accepts a parser under the PageParser contract and so on
// - Profiler::wrap() puts the implementation inside a Profiled<T> decorator
// - Profiled<T> implements the same trait, timing the operations the
//   contract marks as profiled and forwarding everything else untouched
// - All timings land in one shared ProfilingState, which writes the report
//
// Report format:
//   Run at Sun, 18 Oct 2026 09:30:00 GMT
//   word_crawler::parser::http::HttpPageParser#parse took 0m 3s 412ms
//   ...
// =============================================================================

mod proxy;
mod state;

pub use proxy::Profiled;
pub use state::{ProfiledOperationKey, ProfilingState};

use chrono::{DateTime, Utc};
use std::io::{self, Write};
use std::sync::Arc;
use thiserror::Error;

/// One operation of a contract and whether calls to it are timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub name: &'static str,
    pub profiled: bool,
}

impl Operation {
    pub const fn profiled(name: &'static str) -> Self {
        Self {
            name,
            profiled: true,
        }
    }

    pub const fn passthrough(name: &'static str) -> Self {
        Self {
            name,
            profiled: false,
        }
    }
}

/// Static description of a trait that can be wrapped by the profiler.
///
/// Implemented for the trait object type, e.g. `impl Contract for dyn PageParser`.
pub trait Contract {
    const NAME: &'static str;
    const OPERATIONS: &'static [Operation];

    fn has_profiled_operation() -> bool {
        Self::OPERATIONS.iter().any(|op| op.profiled)
    }

    fn is_profiled(operation: &str) -> bool {
        Self::OPERATIONS
            .iter()
            .any(|op| op.profiled && op.name == operation)
    }
}

/// Implemented by every type that implements the trait contract `C` describes.
///
/// Each contract provides a blanket impl next to its trait, e.g.
/// `impl<P: PageParser> Fulfills<dyn PageParser> for P {}`.
pub trait Fulfills<C: Contract + ?Sized> {}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfilerError {
    #[error("{contract} has no profiled operations")]
    NoProfiledOperations { contract: &'static str },
}

#[derive(Debug, Clone)]
pub struct Profiler {
    state: Arc<ProfilingState>,
    started_at: DateTime<Utc>,
}

impl Profiler {
    /// Starts a profiler; the report's "Run at" line uses this moment.
    pub fn new() -> Self {
        Self::started_at(Utc::now())
    }

    pub fn started_at(started_at: DateTime<Utc>) -> Self {
        Self {
            state: Arc::new(ProfilingState::new()),
            started_at,
        }
    }

    /// Wraps `delegate` so the profiled operations of contract `C` are timed.
    ///
    /// Wrapping a contract with nothing to profile is a programming mistake
    /// and is rejected up front.
    pub fn wrap<C, T>(&self, delegate: T) -> Result<Profiled<T>, ProfilerError>
    where
        C: Contract + ?Sized,
        T: Fulfills<C>,
    {
        if !C::has_profiled_operation() {
            return Err(ProfilerError::NoProfiledOperations {
                contract: C::NAME,
            });
        }

        tracing::debug!(
            contract = C::NAME,
            delegate = std::any::type_name::<T>(),
            "wrapping for profiling"
        );
        Ok(Profiled::new(delegate, Arc::clone(&self.state)))
    }

    pub fn state(&self) -> &ProfilingState {
        &self.state
    }

    /// Writes the "Run at" line, one line per profiled operation and a blank line.
    pub fn write_data<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "Run at {}", format_rfc1123(&self.started_at))?;
        self.state.write(writer)?;
        writeln!(writer)?;
        Ok(())
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}

// RFC 1123 as HTTP uses it: "Sun, 18 Oct 2026 09:30:00 GMT"
fn format_rfc1123(at: &DateTime<Utc>) -> String {
    at.format("%a, %-d %b %Y %H:%M:%S GMT").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::time::Duration;

    trait Greeter {
        fn greet(&self) -> String;
    }

    impl Contract for dyn Greeter {
        const NAME: &'static str = "Greeter";
        const OPERATIONS: &'static [Operation] = &[Operation::passthrough("greet")];
    }

    impl<G: Greeter> Fulfills<dyn Greeter> for G {}

    struct English;

    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    #[test]
    fn test_wrap_rejects_contract_without_profiled_operations() {
        let profiler = Profiler::new();
        let err = profiler.wrap::<dyn Greeter, _>(English).unwrap_err();
        assert_eq!(err, ProfilerError::NoProfiledOperations { contract: "Greeter" });
        assert!(profiler.state().is_empty());
        assert_eq!(English.greet(), "hello");
    }

    #[test]
    fn test_contract_lookup() {
        assert!(!<dyn Greeter as Contract>::has_profiled_operation());
        assert!(<dyn crate::parser::PageParser as Contract>::is_profiled("parse"));
        assert!(<dyn crate::crawl::WebCrawler as Contract>::is_profiled("crawl"));
        assert!(!<dyn crate::crawl::WebCrawler as Contract>::is_profiled("max_parallelism"));
    }

    #[test]
    fn test_write_data_format() {
        let started = Utc.with_ymd_and_hms(2026, 10, 4, 9, 5, 7).unwrap();
        let profiler = Profiler::started_at(started);
        profiler.state().record(
            ProfiledOperationKey::new("demo::Parser", "parse"),
            Duration::from_millis(1_500),
        );

        let mut out = Vec::new();
        profiler.write_data(&mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Run at Sun, 4 Oct 2026 09:05:07 GMT\ndemo::Parser#parse took 0m 1s 500ms\n\n"
        );
    }

    #[test]
    fn test_write_data_with_nothing_recorded() {
        let started = Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap();
        let mut out = Vec::new();
        Profiler::started_at(started).write_data(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Run at Thu, 15 Jan 2026 00:00:00 GMT\n\n"
        );
    }
}
