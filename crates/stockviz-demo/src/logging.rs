// File: crates/stockviz-demo/src/logging.rs
// Summary: tracing subscriber setup; `RUST_LOG` wins over the settings filter.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` when set and valid, else `default_directives`, else `info`.
pub fn filter(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(default_directives: &str) {
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr);
    let _ = tracing_subscriber::registry()
        .with(filter(default_directives))
        .with(fmt_layer)
        .try_init();
}
