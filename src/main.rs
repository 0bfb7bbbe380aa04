// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Load the JSON crawler configuration
// 3. Start a tokio runtime with as many worker threads as we may use
// 4. Wrap the page parser and the crawler in the profiler, then crawl
// 5. Write the crawl result and the profile report
// 6. Exit with proper code (0 = success, 2 = error)
//
// There is no dependency-injection container: every piece is built right
// here from the configuration and handed to the next one.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - JSON configuration
mod crawl; // src/crawl/ - crawlers, filters, word ranking
mod output; // src/output.rs - result and profile sinks
mod parser; // src/parser/ - page fetching and HTML parsing
mod profiler; // src/profiler/ - method timing

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use config::{CrawlerConfig, CrawlerKind};
use crawl::{ParallelCrawler, SequentialCrawler, WebCrawler};
use parser::{HttpPageParser, PageParser};
use profiler::Profiler;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() {
    // Run our application logic and capture the exit code
    let exit_code = match run() {
        Ok(()) => 0,
        Err(e) => {
            // {:#} prints the whole context chain: "Failed to ...: cause"
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = CrawlerConfig::load(&cli.config_path).with_context(|| {
        format!(
            "Failed to load configuration from {}",
            cli.config_path.display()
        )
    })?;

    // We can't use #[tokio::main] here: the number of worker threads comes
    // from the configuration we just read
    let workers = crawl::effective_parallelism(config.settings.parallelism);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(workers)
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    runtime.block_on(crawl_and_report(config))
}

async fn crawl_and_report(config: CrawlerConfig) -> Result<()> {
    let profiler = Profiler::new();

    let parser = HttpPageParser::new(config.settings.timeout)
        .context("Failed to create HTTP client")?;
    let parser: Arc<dyn PageParser> = Arc::new(profiler.wrap::<dyn PageParser, _>(parser)?);

    let crawler: Box<dyn WebCrawler> = match config.crawler {
        CrawlerKind::Parallel => Box::new(
            profiler.wrap::<dyn WebCrawler, _>(ParallelCrawler::new(
                parser,
                config.settings.clone(),
            ))?,
        ),
        CrawlerKind::Sequential => Box::new(
            profiler.wrap::<dyn WebCrawler, _>(SequentialCrawler::new(
                parser,
                config.settings.clone(),
            ))?,
        ),
    };

    eprintln!(
        "🔍 Crawling {} start page(s), max depth {}, timeout {:?}",
        config.start_pages.len(),
        config.settings.max_depth,
        config.settings.timeout
    );

    let result = crawler.crawl(&config.start_pages).await;

    eprintln!("📄 Visited {} page(s)", result.urls_visited);

    output::write_result(&result, config.result_path.as_deref())?;
    output::write_profile(&profiler, config.profile_output_path.as_deref())?;

    Ok(())
}

// Diagnostics go to stderr so the JSON on stdout stays machine-readable
fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why Box<dyn WebCrawler>?
//    - The two crawlers are different types, but main only needs "something
//      that can crawl"
//    - A trait object lets one variable hold either of them
//
// 2. Why wrap both the parser AND the crawler?
//    - The parser's "parse" is timed once per page (summed across all tasks)
//    - The crawler's "crawl" is timed once for the whole run
//    - The report shows both, so you can compare total fetch time with
//      wall-clock time and see how much parallelism helped
//
// 3. What does block_on do?
//    - It runs an async function to completion on the runtime and blocks
//      the calling (main) thread until it is done
// -----------------------------------------------------------------------------
