//! `tracing` subscriber setup for the API binary.

use speakcheck_config::LoggingSettings;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Later calls are no-ops.
///
/// `RUST_LOG` overrides the configured filter; `RUST_LOG_FORMAT=json`
/// forces JSON output.
pub fn init(settings: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new("speakcheck=info"));

    let is_json = settings.json
        || std::env::var("RUST_LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false);

    if is_json {
        let _ = subscriber.json().try_init();
    } else {
        let _ = subscriber.try_init();
    }
}
