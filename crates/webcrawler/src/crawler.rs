use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use webcrawler_profiler::{Capability, Clock, Profiled, SystemClock};

use crate::config::CrawlConfig;
use crate::error::CrawlError;
use crate::ignore::IgnoreFilter;
use crate::parser::PageParser;
use crate::result::CrawlResult;
use crate::task::{CrawlContext, CrawlTask, TaskOutcome};
use crate::visited::VisitedRegistry;
use crate::word_counts;
use crate::words::WordAggregator;

/// Something that turns seed URLs into a [`CrawlResult`].
#[async_trait]
pub trait WebCrawler: Send + Sync {
    async fn crawl(&self, seeds: &[String]) -> CrawlResult;

    /// Hardware concurrency of the host.
    fn max_parallelism(&self) -> usize;
}

impl Capability for dyn WebCrawler {
    fn profiled_operations() -> &'static [&'static str] {
        &["crawl"]
    }
}

#[async_trait]
impl<W: WebCrawler> WebCrawler for Profiled<W> {
    async fn crawl(&self, seeds: &[String]) -> CrawlResult {
        self.intercept_async("crawl", |crawler| crawler.crawl(seeds)).await
    }

    fn max_parallelism(&self) -> usize {
        self.intercept("max_parallelism", |crawler| crawler.max_parallelism())
    }
}

/// Crawls pages concurrently on a bounded pool of workers.
///
/// Every call to [`WebCrawler::crawl`] starts from empty visited and word state, computes its
/// own deadline, and returns only after every task it spawned has finished.
pub struct Crawler<P: ?Sized> {
    parser: Arc<P>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
    max_depth: usize,
    popular_word_count: usize,
    parallelism: usize,
    ignored_urls: IgnoreFilter,
}

impl<P> Crawler<P>
where
    P: PageParser + ?Sized + 'static,
{
    pub fn new(config: &CrawlConfig, parser: Arc<P>) -> Result<Self, CrawlError> {
        Ok(Self {
            parser,
            clock: Arc::new(SystemClock),
            timeout: config.timeout(),
            max_depth: config.max_depth,
            popular_word_count: config.popular_word_count,
            parallelism: config.parallelism,
            ignored_urls: IgnoreFilter::new(&config.ignored_urls)?,
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Number of tasks allowed to fetch at the same time: the configured parallelism capped by
    /// the host. A configured value of `0` uses the host value.
    pub fn parallelism(&self) -> usize {
        let host = host_parallelism();
        match self.parallelism {
            0 => host,
            configured => configured.min(host),
        }
    }

    fn context(&self) -> Arc<CrawlContext<P>> {
        let now = self.clock.now();
        let deadline = TimeDelta::from_std(self.timeout)
            .ok()
            .and_then(|timeout| now.checked_add_signed(timeout))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Arc::new(CrawlContext {
            parser: Arc::clone(&self.parser),
            clock: Arc::clone(&self.clock),
            deadline,
            ignored_urls: self.ignored_urls.clone(),
            visited: VisitedRegistry::new(),
            words: WordAggregator::new(),
            workers: Semaphore::new(self.parallelism()),
        })
    }
}

#[async_trait]
impl<P> WebCrawler for Crawler<P>
where
    P: PageParser + ?Sized + 'static,
{
    async fn crawl(&self, seeds: &[String]) -> CrawlResult {
        let ctx = self.context();
        tracing::info!(
            "Crawling {} seed(s) with {} worker(s), max depth {}, deadline {}",
            seeds.len(),
            self.parallelism(),
            self.max_depth,
            ctx.deadline
        );

        let mut roots = JoinSet::new();
        for seed in seeds {
            if !ctx.should_visit(seed) {
                tracing::debug!("Skipping seed {}", seed);
                continue;
            }
            roots.spawn(CrawlTask::new(seed.clone(), self.max_depth).run(Arc::clone(&ctx)));
        }

        while let Some(joined) = roots.join_next().await {
            match joined {
                Ok(TaskOutcome::Failed) | Ok(TaskOutcome::Done) | Ok(TaskOutcome::Expired) => {}
                Ok(TaskOutcome::AlreadyVisited) => {
                    tracing::debug!("Seed was already visited by another task");
                }
                Err(e) => tracing::error!("Crawl task failed: {}", e),
            }
        }

        let urls_visited = ctx.visited.len();
        let top_words = word_counts::sort(ctx.words.snapshot(), self.popular_word_count);
        tracing::info!(
            "Crawl finished: {} URL(s) visited, {} distinct word(s)",
            urls_visited,
            ctx.words.len()
        );

        CrawlResult {
            top_words,
            urls_visited,
        }
    }

    fn max_parallelism(&self) -> usize {
        host_parallelism()
    }
}

fn host_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use crate::parser::PageContent;
    use std::collections::HashMap;
    use webcrawler_profiler::{FakeClock, Profiler};

    struct Echo;

    #[async_trait]
    impl PageParser for Echo {
        async fn parse(&self, url: &str) -> Result<PageContent, ParseError> {
            Ok(PageContent {
                word_counts: HashMap::from([(url.to_string(), 1)]),
                links: Vec::new(),
            })
        }
    }

    fn config(parallelism: usize) -> CrawlConfig {
        CrawlConfig {
            parallelism,
            max_depth: 1,
            timeout_seconds: 10,
            popular_word_count: 10,
            ..Default::default()
        }
    }

    #[test]
    fn test_parallelism_is_capped_by_host() {
        let host = host_parallelism();

        let crawler = Crawler::new(&config(usize::MAX), Arc::new(Echo)).unwrap();
        assert_eq!(crawler.parallelism(), host);
        assert_eq!(crawler.max_parallelism(), host);

        let crawler = Crawler::new(&config(1), Arc::new(Echo)).unwrap();
        assert_eq!(crawler.parallelism(), 1);

        let crawler = Crawler::new(&config(0), Arc::new(Echo)).unwrap();
        assert_eq!(crawler.parallelism(), host);
    }

    #[test]
    fn test_invalid_ignored_url_is_rejected() {
        let config = CrawlConfig {
            ignored_urls: vec!["[".to_string()],
            ..config(1)
        };
        assert!(matches!(
            Crawler::new(&config, Arc::new(Echo)),
            Err(CrawlError::InvalidPattern { .. })
        ));
    }

    #[tokio::test]
    async fn test_profiled_crawler_times_crawl_only() {
        let profiler = Profiler::new(Arc::new(FakeClock::default()));
        let crawler = Crawler::new(&config(1), Arc::new(Echo))
            .unwrap()
            .with_clock(Arc::new(FakeClock::default()));
        let crawler = profiler.wrap::<dyn WebCrawler, _>(crawler).unwrap();

        let result = crawler.crawl(&["http://example.com".to_string()]).await;
        assert_eq!(result.urls_visited, 1);
        assert_eq!(crawler.max_parallelism(), host_parallelism());

        let key = std::any::type_name::<Crawler<Echo>>();
        assert!(profiler.state().get(key, "crawl").is_some());
        assert!(profiler.state().get(key, "max_parallelism").is_none());
    }
}
