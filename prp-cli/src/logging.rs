use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "PRP_LOG";

/// `PRP_LOG` wins over the configured level. Output goes to stderr.
pub fn init(configured: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
