use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber
///
/// Logs go to stderr so that report output on stdout stays clean.
/// `RUST_LOG` takes precedence over the `verbose` flag.
pub fn initialize(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into());

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_new(&log_level)?)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()?;

    tracing::debug!("Tracing initialized, level: {}", log_level);
    Ok(())
}
