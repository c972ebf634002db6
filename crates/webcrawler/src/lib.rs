//! Concurrent, depth-bounded web crawler that ranks the most popular words.
//!
//! Starting from a set of seed URLs, the [`Crawler`] follows links up to a maximum depth and
//! until a deadline passes, fetching every URL at most once across all of its workers. Word
//! counts from every fetched page are summed and the most frequent ones are returned together
//! with the number of visited URLs.
//!
//! # Features
//!
//! - Fork/join crawling on tokio with a fixed number of concurrently fetching tasks
//! - Atomic URL claiming, so a page discovered through several paths is fetched once
//! - Full-match regular expressions for ignored URLs and ignored words
//! - Pluggable [`PageParser`], with an HTTP/HTML implementation in [`HtmlPageParser`]
//! - Both [`PageParser`] and [`WebCrawler`] are profiling capabilities, see
//!   [`webcrawler_profiler`]
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use webcrawler::{CrawlConfig, Crawler, HtmlPageParser, PageParser, WebCrawler};
//! use webcrawler_profiler::Profiler;
//!
//! #[tokio::main]
//! async fn main() -> miette::Result<()> {
//!     let config = CrawlConfig::from_path("crawl.json")?;
//!     let profiler = Profiler::default();
//!
//!     let parser = profiler.wrap::<dyn PageParser, _>(HtmlPageParser::from_config(&config)?)?;
//!     let crawler = Crawler::new(&config, Arc::new(parser))?;
//!     let result = crawler.crawl(&config.start_pages).await;
//!
//!     println!("Visited {} pages", result.urls_visited);
//!     Ok(())
//! }
//! ```
//!
//! # Failure handling
//!
//! A page that cannot be fetched or parsed is logged and skipped. Its URL still counts as
//! visited, and the rest of the crawl carries on.
pub mod config;
pub mod crawler;
pub mod error;
pub mod html;
pub mod ignore;
pub mod parser;
pub mod result;
mod task;
pub mod visited;
pub mod word_counts;
pub mod words;

pub use config::CrawlConfig;
pub use crawler::{Crawler, WebCrawler};
pub use error::{ConfigError, CrawlError, ParseError};
pub use html::HtmlPageParser;
pub use ignore::IgnoreFilter;
pub use parser::{PageContent, PageParser};
pub use result::{CrawlResult, CrawlResultWriter};
pub use visited::VisitedRegistry;
pub use word_counts::TopWords;
pub use words::WordAggregator;
