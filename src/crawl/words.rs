// src/crawl/words.rs
// =============================================================================
// Picks the most popular words out of the accumulated word counts.
//
// Ordering (most popular first):
// 1. Higher count wins
// 2. On equal counts, the longer word wins
// 3. On equal count and length, alphabetical order decides
//
// The last rule makes the ranking fully deterministic, so the same crawl
// always produces the same top-K list no matter how the tasks interleaved.
// =============================================================================

use std::cmp::Ordering;

// Returns the top `k` (word, count) pairs, most popular first
//
// If there are fewer than `k` distinct words, all of them are returned.
// k = 0 returns an empty list.
pub fn popular_words<I>(counts: I, k: usize) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = (String, u64)>,
{
    if k == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<(String, u64)> = counts.into_iter().collect();
    ranked.sort_by(compare_popularity);
    ranked.truncate(k);
    ranked
}

fn compare_popularity(a: &(String, u64), b: &(String, u64)) -> Ordering {
    b.1.cmp(&a.1)
        .then_with(|| b.0.chars().count().cmp(&a.0.chars().count()))
        .then_with(|| a.0.cmp(&b.0))
}
