// Tracing setup shared by the CLI and the API server

use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Env var selecting the output format; "json" enables machine-parseable logs
pub const LOG_FORMAT_ENV: &str = "EMPLOYEE_DASHBOARD_LOG_FORMAT";

static STDERR_PAUSED: AtomicBool = AtomicBool::new(false);

fn stderr_enabled() -> bool {
    !STDERR_PAUSED.load(Ordering::Relaxed)
}

/// Drops log events while held. The TUI holds one for as long as the
/// alternate screen is active so events never draw over the dashboard.
#[derive(Debug)]
#[must_use = "stderr logging resumes as soon as the guard is dropped"]
pub struct StderrPause {
    _private: (),
}

impl StderrPause {
    pub fn new() -> Self {
        STDERR_PAUSED.store(true, Ordering::Relaxed);
        StderrPause { _private: () }
    }
}

impl Default for StderrPause {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for StderrPause {
    fn drop(&mut self) {
        STDERR_PAUSED.store(false, Ordering::Relaxed);
    }
}

pub fn is_stderr_paused() -> bool {
    !stderr_enabled()
}

/// Install the global subscriber. RUST_LOG wins over `default_filter`.
/// Logs go to stderr so they never interleave with CSV/JSON on stdout.
pub fn init(default_filter: &str) {
    let log_format = std::env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "text".to_string());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let writer = std::io::stderr.with_filter(|_: &tracing::Metadata<'_>| stderr_enabled());

    // try_init: a second call (e.g. from tests) leaves the first subscriber in place
    let result = match log_format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(writer))
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "employee_dashboard=debug,employee_server=debug,tower_http=debug"
    } else {
        "employee_dashboard=info,employee_server=info,tower_http=info"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init(default_filter(false));
        init(default_filter(true));
    }

    #[test]
    fn test_stderr_pause_guard() {
        assert!(!is_stderr_paused());
        {
            let _pause = StderrPause::new();
            assert!(is_stderr_paused());
            tracing::info!("dropped while the dashboard owns the terminal");
        }
        assert!(!is_stderr_paused());
    }
}
