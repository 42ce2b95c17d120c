use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,sqlx=warn";

pub type InitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Installs the global fmt subscriber, filtered by `RUST_LOG`.
/// Fails if a global subscriber is already set.
pub fn init() -> Result<(), InitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    if cfg!(test) {
        builder.compact().with_test_writer().try_init()
    } else {
        builder.try_init()
    }
}
