// src/profiler/state.rs
// =============================================================================
// Where profiled call durations accumulate.
//
// Every call to a profiled operation adds its elapsed time to the entry for
// (type, operation). The map is shared by every wrapped object in the
// process, and many crawl tasks write to it at the same time.
//
// DashMap shards its locks, so two tasks recording different keys rarely
// contend, and two tasks recording the SAME key are serialized by the entry
// lock: no update is ever lost.
// =============================================================================

use dashmap::DashMap;
use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

// Identifies one operation of one concrete type
//
// Ordering is by type name, then operation name, which is the order the
// report uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProfiledOperationKey {
    pub type_name: &'static str,
    pub operation: &'static str,
}

impl ProfiledOperationKey {
    pub fn new(type_name: &'static str, operation: &'static str) -> Self {
        Self {
            type_name,
            operation,
        }
    }
}

impl fmt::Display for ProfiledOperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.type_name, self.operation)
    }
}

#[derive(Debug, Default)]
pub struct ProfilingState {
    durations: DashMap<ProfiledOperationKey, Duration>,
}

impl ProfilingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `elapsed` to the running total for `key`.
    pub fn record(&self, key: ProfiledOperationKey, elapsed: Duration) {
        *self.durations.entry(key).or_insert(Duration::ZERO) += elapsed;
    }

    /// Total recorded for `key`, if it was ever recorded.
    #[cfg(test)]
    pub fn total(&self, key: &ProfiledOperationKey) -> Option<Duration> {
        self.durations.get(key).map(|entry| *entry.value())
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Sorted copy of every (key, total) pair.
    ///
    /// Each total is read under its entry lock; the snapshot as a whole is
    /// not atomic with respect to concurrent `record` calls.
    pub fn snapshot(&self) -> Vec<(ProfiledOperationKey, Duration)> {
        let mut entries: Vec<_> = self
            .durations
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Writes one "<type>#<operation> took <duration>" line per key.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for (key, total) in self.snapshot() {
            writeln!(writer, "{} took {}", key, format_duration(total))?;
        }
        Ok(())
    }
}

// 75_250ms -> "1m 15s 250ms"
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!(
        "{}m {}s {}ms",
        secs / 60,
        secs % 60,
        duration.subsec_millis()
    )
}
