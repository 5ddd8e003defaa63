//! Logging initialization for the Prodex server.
//!
//! Composes a `tracing-subscriber` registry from a stdout layer filtered by
//! `RUST_LOG` and a rolling daily JSON appender that captures error-level
//! events under `logs/errors.jsonl`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub fn init_logging() {
    // Ensure logs directory exists
    std::fs::create_dir_all("logs").ok();

    let errors_appender = tracing_appender::rolling::daily("logs", "errors.jsonl");

    let errors_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(errors_appender)
        .with_filter(tracing_subscriber::filter::LevelFilter::ERROR);

    let stdout_layer = tracing_subscriber::fmt::layer().with_filter(EnvFilter::from_default_env());

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(errors_layer)
        .try_init()
        .ok();
}
