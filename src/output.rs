// src/output.rs
// =============================================================================
// Writes the crawl result (JSON) and the profile report (text).
//
// Each goes either to a file or, when no path is configured, to stdout.
// Files are opened in append mode: running the crawler twice with the same
// resultPath keeps the first run's output and adds the second one after it.
// =============================================================================

use crate::crawl::CrawlResult;
use crate::profiler::Profiler;
use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Appends `result` as JSON to `path`, or prints it to stdout.
pub fn write_result(result: &CrawlResult, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let mut writer = BufWriter::new(open_append(path)?);
            write_result_json(result, &mut writer)
                .with_context(|| format!("Failed to write crawl result to {}", path.display()))?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_result_json(result, &mut writer)?;
            writer.flush()?;
        }
    }
    Ok(())
}

/// Appends the profiler's report to `path`, or prints it to stdout.
pub fn write_profile(profiler: &Profiler, path: Option<&Path>) -> Result<()> {
    if profiler.state().is_empty() {
        tracing::warn!("no profiled calls were recorded");
    }

    match path {
        Some(path) => {
            let mut writer = BufWriter::new(open_append(path)?);
            profiler
                .write_data(&mut writer)
                .with_context(|| format!("Failed to write profile data to {}", path.display()))?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            profiler.write_data(&mut writer)?;
            writer.flush()?;
        }
    }
    Ok(())
}

fn write_result_json<W: Write>(result: &CrawlResult, writer: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, result)?;
    writeln!(writer)?;
    Ok(())
}

// Creates missing parent directories, never truncates an existing file
fn open_append(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiler::ProfiledOperationKey;
    use std::path::PathBuf;
    use std::time::Duration;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("word-crawler-output-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_result_is_appended_not_overwritten() {
        let path = temp_path("nested/result.json");
        let _ = fs::remove_file(&path);

        let first = CrawlResult::new(vec![("first".to_string(), 1)], 1);
        let second = CrawlResult::new(vec![("second".to_string(), 2)], 2);
        write_result(&first, Some(&path)).unwrap();
        write_result(&second, Some(&path)).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let first_at = written.find("\"first\"").unwrap();
        let second_at = written.find("\"second\"").unwrap();
        assert!(first_at < second_at);
        assert_eq!(written.matches("urlsVisited").count(), 2);
    }

    #[test]
    fn test_profile_is_appended() {
        let path = temp_path("profile.txt");
        let _ = fs::remove_file(&path);

        let profiler = Profiler::new();
        profiler.state().record(
            ProfiledOperationKey::new("demo::Parser", "parse"),
            Duration::from_millis(12),
        );
        write_profile(&profiler, Some(&path)).unwrap();
        write_profile(&profiler, Some(&path)).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written.matches("Run at ").count(), 2);
        assert_eq!(written.matches("demo::Parser#parse took 0m 0s 12ms").count(), 2);
    }
}
