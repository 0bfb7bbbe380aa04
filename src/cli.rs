// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Almost everything about a crawl lives in the JSON configuration file, so
// the command line only needs to say where that file is.
//
// Example:
//   word-crawler crawl.json
//   word-crawler crawl.json --log-level debug
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "word-crawler",
    version,
    about = "Crawls websites in parallel and reports their most popular words",
    long_about = "word-crawler follows links from a set of starting pages, up to a maximum depth \
                  and within a time limit, counts the words on every page it visits, and writes \
                  the most popular ones as JSON together with a timing profile."
)]
pub struct Cli {
    /// Path to the JSON crawler configuration
    pub config_path: PathBuf,

    /// Log filter for diagnostics on stderr (e.g. "info", "word_crawler=debug")
    ///
    /// RUST_LOG takes precedence when it is set.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_path() {
        let cli = Cli::parse_from(["word-crawler", "crawl.json"]);
        assert_eq!(cli.config_path, PathBuf::from("crawl.json"));
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_parse_log_level() {
        let cli = Cli::parse_from(["word-crawler", "crawl.json", "--log-level", "debug"]);
        assert_eq!(cli.log_level, "debug");
    }

    #[test]
    fn test_config_path_is_required() {
        assert!(Cli::try_parse_from(["word-crawler"]).is_err());
    }
}
