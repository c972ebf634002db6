use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Crawl settings, read from a JSON document with camelCase keys.
///
/// ```json
/// {
///   "startPages": ["https://example.com/"],
///   "ignoredUrls": [".*\\.pdf"],
///   "ignoredWords": ["^.{1,3}$"],
///   "parallelism": 4,
///   "maxDepth": 3,
///   "timeoutSeconds": 10,
///   "popularWordCount": 5,
///   "resultPath": "crawl-results.json",
///   "profileOutputPath": "profile.txt"
/// }
/// ```
///
/// Every key is optional; missing keys take the [`Default`] value, which crawls nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CrawlConfig {
    pub start_pages: Vec<String>,
    /// Regular expressions; a URL matching one of them in full is never crawled.
    pub ignored_urls: Vec<String>,
    /// Regular expressions; a word matching one of them in full is not counted.
    pub ignored_words: Vec<String>,
    /// Requested worker count, capped by the host. `0` means "as many as the host has".
    pub parallelism: usize,
    pub max_depth: usize,
    pub timeout_seconds: u64,
    pub popular_word_count: usize,
    pub result_path: Option<PathBuf>,
    pub profile_output_path: Option<PathBuf>,
}

impl CrawlConfig {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        tracing::debug!("Reading crawl configuration");
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Loads the configuration at `path`, falling back to [`CrawlConfig::default`] when it is
    /// missing or malformed.
    ///
    /// Prefer [`CrawlConfig::from_path`] when the caller needs to know about the failure.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::from_path(path).unwrap_or_else(|e| {
            tracing::error!("{}", e);
            tracing::warn!(
                "Using default crawl configuration instead of {}",
                path.display()
            );
            Self::default()
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
