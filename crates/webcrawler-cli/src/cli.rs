use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use miette::IntoDiagnostic;
use webcrawler::{
    CrawlConfig, CrawlResult, CrawlResultWriter, Crawler, HtmlPageParser, PageParser, WebCrawler,
};
use webcrawler_profiler::Profiler;

#[derive(Parser, Debug)]
#[command(name = "webcrawler")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(after_help = "# Examples:\n\n\
    ## To crawl with a JSON configuration:\n\
    webcrawler crawl.json\n\n\
    ## To see which pages are fetched:\n\
    RUST_LOG=webcrawler=info webcrawler crawl.json")]
#[command(
    about = "Crawls web pages in parallel and reports the most popular words.",
    long_about = None
)]
pub struct Cli {
    /// Path to the JSON crawl configuration
    #[arg(value_name = "CONFIG")]
    config: PathBuf,
}

impl Cli {
    pub fn run(&self) -> miette::Result<()> {
        tracing::info!("Loading crawl configuration from {}", self.config.display());
        let config = CrawlConfig::from_path(&self.config)?;
        let profiler = Profiler::default();

        let parser = profiler.wrap::<dyn PageParser, _>(HtmlPageParser::from_config(&config)?)?;
        let crawler = Crawler::new(&config, Arc::new(parser))?;
        let crawler = profiler.wrap::<dyn WebCrawler, _>(crawler)?;
        let workers = crawler.delegate().parallelism();
        tracing::info!(
            "Starting runtime with {} worker thread(s) for {} start page(s)",
            workers,
            config.start_pages.len()
        );

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(workers)
            .enable_all()
            .build()
            .into_diagnostic()?;
        let result = runtime.block_on(crawler.crawl(&config.start_pages));

        self.write_result(&config, &result)?;
        self.write_profile(&config, &profiler)
    }

    fn write_result(&self, config: &CrawlConfig, result: &CrawlResult) -> miette::Result<()> {
        tracing::debug!("Writing result for {} visited URL(s)", result.urls_visited);
        let writer = CrawlResultWriter::new(result);
        match &config.result_path {
            Some(path) => {
                writer.write_path(path);
                Ok(())
            }
            None => writer.write_to(&mut io::stdout().lock()).into_diagnostic(),
        }
    }

    fn write_profile(&self, config: &CrawlConfig, profiler: &Profiler) -> miette::Result<()> {
        tracing::debug!("Writing {} profiled call(s)", profiler.state().len());
        match &config.profile_output_path {
            Some(path) => {
                profiler.write_path(path);
                Ok(())
            }
            None => {
                let mut stdout = io::stdout().lock();
                profiler.write_to(&mut stdout).into_diagnostic()?;
                stdout.flush().into_diagnostic()
            }
        }
    }
}
