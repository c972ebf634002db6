use std::cmp::Ordering;
use std::collections::HashMap;

use itertools::Itertools;
use serde::ser::{Serialize, Serializer};

/// The most popular words of a crawl, most frequent first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopWords(Vec<(String, u64)>);

impl TopWords {
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(word, count)| (word.as_str(), *count))
    }

    pub fn get(&self, word: &str) -> Option<u64> {
        self.iter().find(|(w, _)| *w == word).map(|(_, count)| count)
    }

    pub fn words(&self) -> Vec<&str> {
        self.iter().map(|(word, _)| word).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<(String, u64)> {
        self.0
    }
}

// Serialized as a JSON object whose keys keep the ranking order.
impl Serialize for TopWords {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Ranks `counts` and keeps the `popular_word_count` best entries.
///
/// Higher counts come first; equal counts prefer longer words, then alphabetical order.
pub fn sort(counts: HashMap<String, u64>, popular_word_count: usize) -> TopWords {
    TopWords(
        counts
            .into_iter()
            .sorted_by(|a, b| compare(a, b))
            .take(popular_word_count)
            .collect(),
    )
}

fn compare((a_word, a_count): &(String, u64), (b_word, b_count): &(String, u64)) -> Ordering {
    b_count
        .cmp(a_count)
        .then_with(|| b_word.len().cmp(&a_word.len()))
        .then_with(|| a_word.cmp(b_word))
}
