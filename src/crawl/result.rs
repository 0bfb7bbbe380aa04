// src/crawl/result.rs
// =============================================================================
// The output of one crawl.
//
// JSON shape (keys in camelCase):
//   {
//     "wordCounts": { "most": 12, "popular": 9, ... },
//     "urlsVisited": 4
//   }
//
// wordCounts is written as a JSON object, but in ranking order. A HashMap
// would scramble the order, so we keep a Vec of pairs and serialize it as
// a map ourselves.
// =============================================================================

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlResult {
    /// Top-K popular words, most popular first
    #[serde(serialize_with = "serialize_ranked")]
    pub word_counts: Vec<(String, u64)>,
    /// Number of distinct URLs claimed during the crawl
    pub urls_visited: usize,
}

impl CrawlResult {
    pub fn new(word_counts: Vec<(String, u64)>, urls_visited: usize) -> Self {
        Self {
            word_counts,
            urls_visited,
        }
    }

    /// The result of a crawl that did no work.
    pub fn empty() -> Self {
        Self::default()
    }
}

fn serialize_ranked<S>(pairs: &[(String, u64)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(pairs.len()))?;
    for (word, count) in pairs {
        map.serialize_entry(word, count)?;
    }
    map.end()
}
