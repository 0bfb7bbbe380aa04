// src/crawl/filter.rs
// =============================================================================
// Pattern filters for URLs and words.
//
// The configuration gives us two lists of regular expressions:
// - ignoredUrls: pages we must never visit
// - ignoredWords: words we must never count
//
// A pattern only counts as a match when it matches the WHOLE string, not just
// a piece of it. "foo" ignores the word "foo" but not "food".
// =============================================================================

use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;

// A pattern that is not a valid regular expression
#[derive(Debug, Error)]
#[error("invalid pattern '{pattern}': {source}")]
pub struct PatternError {
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

// An ordered list of full-string patterns
#[derive(Debug, Clone, Default)]
pub struct PatternFilter {
    patterns: Vec<Regex>,
}

impl PatternFilter {
    /// Compiles each pattern into a full-string matcher.
    ///
    /// Stops at the first pattern that fails to compile.
    pub fn new<I, S>(patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiled = Vec::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            // Anchoring turns "find anywhere" into "match everything"
            let anchored = format!("^(?:{})$", pattern);
            let regex = Regex::new(&anchored).map_err(|source| PatternError {
                pattern: pattern.to_string(),
                source,
            })?;
            compiled.push(regex);
        }
        Ok(Self { patterns: compiled })
    }

    /// A filter that matches nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when any pattern matches the whole input.
    pub fn matches(&self, input: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(input))
    }

    /// Keeps the URLs that no pattern matches, preserving their order.
    pub fn retain_unmatched(&self, urls: Vec<String>) -> Vec<String> {
        if self.is_empty() {
            return urls;
        }
        urls.into_iter().filter(|url| !self.matches(url)).collect()
    }

    /// Drops the words that a pattern matches from one page's word counts.
    pub fn filter_counts(&self, counts: HashMap<String, u64>) -> HashMap<String, u64> {
        if self.is_empty() {
            return counts;
        }
        counts
            .into_iter()
            .filter(|(word, _)| !self.matches(word))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_string_match_only() {
        let filter = PatternFilter::new(["foo"]).unwrap();
        assert!(filter.matches("foo"));
        assert!(!filter.matches("food"));
        assert!(!filter.matches("a foo"));
    }

    #[test]
    fn test_alternation_is_anchored_as_a_whole() {
        // Without the (?:...) group "^a|b$" would match "bx"
        let filter = PatternFilter::new(["a|b"]).unwrap();
        assert!(filter.matches("b"));
        assert!(!filter.matches("bx"));
        assert!(!filter.matches("xa"));
    }

    #[test]
    fn test_retain_unmatched_keeps_order() {
        let filter = PatternFilter::new([r"http://example\.com/private/.*"]).unwrap();
        let urls = vec![
            "http://example.com/b".to_string(),
            "http://example.com/private/x".to_string(),
            "http://example.com/a".to_string(),
        ];
        assert_eq!(
            filter.retain_unmatched(urls),
            vec!["http://example.com/b", "http://example.com/a"]
        );
    }

    #[test]
    fn test_filter_counts_drops_ignored_words() {
        let filter = PatternFilter::new([r"^.{1,3}$", "the"]).unwrap();
        let counts = HashMap::from([
            ("the".to_string(), 10),
            ("a".to_string(), 3),
            ("crawler".to_string(), 2),
        ]);
        let kept = filter.filter_counts(counts);
        assert_eq!(kept, HashMap::from([("crawler".to_string(), 2)]));
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let err = PatternFilter::new(["ok", "(unclosed"]).unwrap_err();
        assert_eq!(err.pattern, "(unclosed");
        assert!(err.to_string().starts_with("invalid pattern '(unclosed': "));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_empty_filter_matches_nothing() {
        let filter = PatternFilter::empty();
        assert!(filter.is_empty());
        assert!(!filter.matches(""));
        assert!(!filter.matches("anything"));
    }
}
