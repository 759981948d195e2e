//! Logging initialization

use super::config::{DebugConfig, DEFAULT_LOG_FILTER};
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize the logging system
///
/// Sets up:
/// - Console output, human-readable or JSON (`WIDGET_LOG_JSON=1`)
/// - Optional daily-rotated log file under `WIDGET_LOG_DIR`
/// - Panic hook integration for crash logging
///
/// The returned guard flushes the file writer when dropped; keep it alive for
/// the lifetime of the program.
pub fn init() -> Option<WorkerGuard> {
    let config = DebugConfig::from_env();

    // Configure log filter from environment
    let env_filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let console_layer = if config.json {
        fmt::layer().json().with_target(true).boxed()
    } else {
        fmt::layer().with_target(true).boxed()
    };

    let mut guard = None;
    let file_layer = config.log_dir.as_ref().and_then(|dir| {
        if let Err(e) = fs::create_dir_all(dir) {
            eprintln!("Warning: Failed to create log directory: {}", e);
            return None;
        }

        let file_appender = tracing_appender::rolling::daily(dir, "donation-widget.log");
        let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(file_guard);

        Some(
            fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false), // No ANSI codes in log files
        )
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    tracing::info!(
        log_level = %config.log_level,
        json = config.json,
        log_dir = ?config.log_dir,
        "Logging initialized"
    );

    setup_panic_hook();
    guard
}

/// Set up panic hook to log panics with their location
fn setup_panic_hook() {
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown location".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };

        tracing::error!(
            panic.location = %location,
            panic.message = %message,
            "Application panicked"
        );

        default_panic(panic_info);
    }));
}
