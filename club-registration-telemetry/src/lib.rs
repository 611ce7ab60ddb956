use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub const DEFAULT_LOG_LEVEL: &str = "info,club_registration_backend=debug,\
                                     club_registration_optimizer=debug,tower_http=debug,\
                                     hyper=info,\
                                     hyper_util=info,diesel_async=info,tokio_postgres=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_LEVEL.into())
}

/// Installs the global subscriber. `RUST_LOG` overrides [`DEFAULT_LOG_LEVEL`].
pub fn setup_telemetry() {
    let stdout_log = tracing_subscriber::fmt::layer();

    tracing_subscriber::registry()
        .with(stdout_log.with_filter(env_filter()))
        .init();

    tracing::debug!("telemetry initialized");
}

/// Like [`setup_telemetry`] but writes through the test harness and tolerates being
/// called from every test.
pub fn setup_test_telemetry() {
    let test_log = tracing_subscriber::fmt::layer().with_test_writer();

    // a second call fails because the first already installed a subscriber
    let _ = tracing_subscriber::registry()
        .with(test_log.with_filter(env_filter()))
        .try_init();
}
