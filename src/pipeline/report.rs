//! Console progress lines.
//!
//! Each event prints one colored line for the person watching the run and
//! emits a matching `tracing` event for the log. Routine per-record events
//! are logged at debug level so the default filter does not echo the
//! console.

use std::path::Path;
#[cfg(test)]
use std::sync::{Arc, Mutex};

use crossterm::style::Stylize;

/// Prints per-record progress and the end-of-run summary.
#[derive(Debug, Clone)]
pub struct Reporter {
    enabled: bool,
    /// Run-level events seen so far, for assertions
    #[cfg(test)]
    recorded: Option<Arc<Mutex<Vec<String>>>>,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::console()
    }
}

impl Reporter {
    /// Print to stdout/stderr.
    pub fn console() -> Self {
        Self {
            enabled: true,
            #[cfg(test)]
            recorded: None,
        }
    }

    /// Emit tracing events only.
    pub fn silent() -> Self {
        Self {
            enabled: false,
            #[cfg(test)]
            recorded: None,
        }
    }

    /// A silent reporter that also keeps a log of run-level events.
    #[cfg(test)]
    pub fn recording() -> (Self, Arc<Mutex<Vec<String>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let reporter = Self {
            enabled: false,
            recorded: Some(Arc::clone(&events)),
        };
        (reporter, events)
    }

    #[cfg(test)]
    fn record(&self, event: String) {
        if let Some(events) = &self.recorded {
            events.lock().unwrap().push(event);
        }
    }

    #[cfg(not(test))]
    fn record(&self, _event: String) {}

    fn info(&self, line: String) {
        if self.enabled {
            println!("{}", line);
        }
    }

    fn error(&self, line: String) {
        if self.enabled {
            eprintln!("{}", line);
        }
    }

    pub fn progress(&self, position: usize, total: usize) {
        tracing::debug!(position, total, "Starting record");
        self.info(format!("Progress [{}/{}]", position, total).blue().to_string());
    }

    pub fn searching(&self, query: &str) {
        tracing::debug!(query, "Searching");
        self.info(format!("Searching for {}", query).magenta().to_string());
    }

    pub fn no_match(&self, query: &str) {
        tracing::debug!(query, "No match found");
        self.info(format!("No stream found for {}", query).yellow().to_string());
    }

    pub fn no_cover(&self, name: &str) {
        tracing::debug!(track = name, "No cover art URL");
        self.info(format!("No cover art for {}", name).yellow().to_string());
    }

    pub fn cover_downloading(&self, url: &str) {
        tracing::debug!(url, "Downloading cover art");
        self.info(format!("Downloading cover art: {}", url).yellow().to_string());
    }

    pub fn cover_downloaded(&self) {
        self.info("Downloaded cover art".green().to_string());
    }

    pub fn cover_failed(&self, error: &dyn std::fmt::Display) {
        tracing::warn!(error = %error, "Cover art download failed, continuing without artwork");
        self.error(
            format!("Error downloading cover art: {}", error)
                .red()
                .to_string(),
        );
    }

    pub fn extracting(&self, watch_url: &str) {
        tracing::debug!(url = watch_url, "Extracting stream");
        self.info(format!("Extracting stream: {}", watch_url).yellow().to_string());
    }

    pub fn succeeded(&self, name: &str, path: &Path) {
        tracing::debug!(track = name, path = ?path, "Downloaded and tagged");
        self.info(format!("Downloaded and tagged {}", name).green().to_string());
    }

    pub fn failed(&self, name: &str, reason: &str) {
        tracing::error!(track = name, reason, "Record failed");
        self.error(
            format!("Error processing {}: {}", name, reason)
                .red()
                .to_string(),
        );
    }

    pub fn cancelled(&self) {
        tracing::warn!("Run cancelled");
        self.record("cancelled".to_string());
        self.error(
            "Cancelled, the current record was abandoned"
                .red()
                .to_string(),
        );
    }

    pub fn failures_written(&self, count: usize, path: &Path) {
        tracing::warn!(failed = count, path = ?path, "Run finished with failures");
        self.record(format!("failures_written {} {}", count, path.display()));
        self.info(
            format!("\nFound {} failed downloads. Compiling CSV...", count)
                .red()
                .to_string(),
        );
        self.info(
            format!("Failed downloads saved to {}", path.display())
                .red()
                .to_string(),
        );
    }

    pub fn all_succeeded(&self) {
        tracing::info!("Run finished without failures");
        self.record("all_succeeded".to_string());
        self.info("\nAll songs downloaded successfully.".green().to_string());
    }
}
