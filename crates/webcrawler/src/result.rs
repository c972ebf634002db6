use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::word_counts::TopWords;

/// Outcome of one crawl.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlResult {
    /// At most `popularWordCount` words, most popular first.
    #[serde(rename = "wordCounts")]
    pub top_words: TopWords,
    /// Number of distinct URLs handed to the page parser.
    pub urls_visited: usize,
}

/// Writes a [`CrawlResult`] as JSON.
#[derive(Debug)]
pub struct CrawlResultWriter<'a> {
    result: &'a CrawlResult,
}

impl<'a> CrawlResultWriter<'a> {
    pub fn new(result: &'a CrawlResult) -> Self {
        Self { result }
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), serde_json::Error> {
        serde_json::to_writer(&mut *writer, self.result)?;
        writeln!(writer).map_err(serde_json::Error::io)?;
        writer.flush().map_err(serde_json::Error::io)
    }

    /// Appends the result to the file at `path`, creating it if needed.
    ///
    /// Failures are logged and otherwise ignored.
    pub fn write_path(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        tracing::info!("Writing crawl result to {}", path.display());

        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(serde_json::Error::io)
            .and_then(|file| self.write_to(&mut BufWriter::new(file)));

        if let Err(e) = result {
            tracing::error!("Failed to write crawl result to {}: {}", path.display(), e);
        }
    }
}
