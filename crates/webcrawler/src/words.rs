use std::collections::HashMap;

use dashmap::DashMap;

/// Word totals across every page fetched in one crawl.
#[derive(Debug, Default)]
pub struct WordAggregator {
    counts: DashMap<String, u64>,
}

impl WordAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `count` to `word`. The read and the write happen under the word's shard lock.
    pub fn add(&self, word: impl Into<String>, count: u64) {
        *self.counts.entry(word.into()).or_default() += count;
    }

    pub fn merge(&self, page: HashMap<String, u64>) {
        for (word, count) in page {
            self.add(word, count);
        }
    }

    pub fn get(&self, word: &str) -> Option<u64> {
        self.counts.get(word).map(|total| *total)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn snapshot(&self) -> HashMap<String, u64> {
        self.counts
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }
}
