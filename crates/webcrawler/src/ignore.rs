use regex_lite::Regex;

use crate::error::CrawlError;

/// A set of regular expressions that must match an entire string.
///
/// Used for both ignored URLs and ignored words.
#[derive(Debug, Clone, Default)]
pub struct IgnoreFilter {
    patterns: Vec<Regex>,
}

impl IgnoreFilter {
    pub fn new<I, S>(patterns: I) -> Result<Self, CrawlError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(&format!("^(?:{})$", pattern))
                    .map_err(|e| CrawlError::invalid_pattern(pattern, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// Returns `true` if any pattern matches the whole of `value`.
    pub fn should_ignore(&self, value: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(value))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
