use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use webcrawler_profiler::Clock;

use crate::ignore::IgnoreFilter;
use crate::parser::PageParser;
use crate::visited::VisitedRegistry;
use crate::words::WordAggregator;

/// State shared by every task of one crawl.
pub(crate) struct CrawlContext<P: ?Sized> {
    pub(crate) parser: Arc<P>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) deadline: DateTime<Utc>,
    pub(crate) ignored_urls: IgnoreFilter,
    pub(crate) visited: VisitedRegistry,
    pub(crate) words: WordAggregator,
    /// One permit per worker; held while a task claims, fetches and merges.
    pub(crate) workers: Semaphore,
}

impl<P: ?Sized> CrawlContext<P> {
    pub(crate) fn is_past_deadline(&self) -> bool {
        self.clock.now() >= self.deadline
    }

    /// Whether a discovered URL is worth dispatching a task for.
    pub(crate) fn should_visit(&self, url: &str) -> bool {
        !self.ignored_urls.should_ignore(url) && !self.visited.contains(url)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TaskOutcome {
    /// Out of depth or out of time; nothing was fetched.
    Expired,
    /// Another task claimed the URL first.
    AlreadyVisited,
    /// The URL was claimed but the parser failed.
    Failed,
    /// The page was merged and all children finished.
    Done,
}

/// A single URL to crawl with the depth still available below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CrawlTask {
    url: String,
    remaining_depth: usize,
}

impl CrawlTask {
    pub(crate) fn new(url: impl Into<String>, remaining_depth: usize) -> Self {
        Self {
            url: url.into(),
            remaining_depth,
        }
    }

    /// Runs the task and, transitively, every child it spawns.
    ///
    /// A worker permit is held only for claim, fetch and merge. It is released before waiting on
    /// the children, so a parent never occupies a worker its descendants need.
    pub(crate) fn run<P>(self, ctx: Arc<CrawlContext<P>>) -> BoxFuture<'static, TaskOutcome>
    where
        P: PageParser + ?Sized + 'static,
    {
        async move {
            if self.remaining_depth == 0 {
                return TaskOutcome::Expired;
            }

            let Ok(permit) = ctx.workers.acquire().await else {
                return TaskOutcome::Expired;
            };

            if ctx.is_past_deadline() {
                tracing::debug!("Deadline passed, skipping {}", self.url);
                return TaskOutcome::Expired;
            }

            if !ctx.visited.claim(&self.url) {
                tracing::trace!("Already visited {}", self.url);
                return TaskOutcome::AlreadyVisited;
            }

            tracing::info!(
                "Crawling {} (remaining depth {})",
                self.url,
                self.remaining_depth
            );
            let page = match ctx.parser.parse(&self.url).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!("{}", e);
                    return TaskOutcome::Failed;
                }
            };

            ctx.words.merge(page.word_counts);

            let mut children = JoinSet::new();
            if !ctx.is_past_deadline() {
                for link in page.links {
                    if ctx.should_visit(&link) {
                        children.spawn(
                            CrawlTask::new(link, self.remaining_depth - 1).run(Arc::clone(&ctx)),
                        );
                    }
                }
            }
            drop(permit);

            while let Some(joined) = children.join_next().await {
                if let Err(e) = joined {
                    tracing::error!("Crawl task under {} failed: {}", self.url, e);
                }
            }
            TaskOutcome::Done
        }
        .boxed()
    }
}
