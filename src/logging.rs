//! Log stream setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info";

/// Initialise the tracing subscriber.
///
/// Lines read `<timestamp> <LEVEL> <message>` on stderr. In headless mode no
/// subscriber is installed, so log events are dropped while the run still
/// proceeds and writes its report.
pub fn init(headless: bool) {
    if headless {
        return;
    }

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
