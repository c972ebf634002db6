use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use webcrawler_profiler::{Capability, Profiled};

use crate::error::ParseError;

/// What a single page contributed to the crawl.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContent {
    pub word_counts: HashMap<String, u64>,
    /// Outgoing links in the order they appear on the page.
    pub links: Vec<String>,
}

/// Fetches a page and extracts its words and links.
#[async_trait]
pub trait PageParser: Send + Sync {
    async fn parse(&self, url: &str) -> Result<PageContent, ParseError>;
}

impl Capability for dyn PageParser {
    fn profiled_operations() -> &'static [&'static str] {
        &["parse"]
    }
}

#[async_trait]
impl<P: PageParser> PageParser for Profiled<P> {
    async fn parse(&self, url: &str) -> Result<PageContent, ParseError> {
        self.intercept_async("parse", |parser| parser.parse(url)).await
    }
}

#[async_trait]
impl<P: PageParser + ?Sized> PageParser for Arc<P> {
    async fn parse(&self, url: &str) -> Result<PageContent, ParseError> {
        (**self).parse(url).await
    }
}
