use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "neurobrain_store=info,neurobrain_seed=info";

/// Load `.env` and install the tracing subscriber for a command-line tool.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
