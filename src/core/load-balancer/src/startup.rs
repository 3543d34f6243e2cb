//! Process startup helpers for the master binary.

use fsql_client::conf::{Configuration, LOG_LEVEL};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` wins over `fsql.log.level`.
pub fn init_tracing(conf: &Configuration) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(conf.get_or(LOG_LEVEL, "info")))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).compact().init();
}

/// Log what is running before the master starts work.
pub fn log_process_info() {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        os = std::env::consts::OS,
        arch = std::env::consts::ARCH,
        pid = std::process::id(),
        "fsql master starting"
    );
    let args: Vec<String> = std::env::args().skip(1).collect();
    info!(?args, "process arguments");
}
