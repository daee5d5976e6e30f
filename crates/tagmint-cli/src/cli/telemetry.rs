use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the console subscriber both subcommands log through.
///
/// `RUST_LOG` selects the filter; without it, everything at `info` and
/// above is shown. Logs go to stderr so stdout stays reserved for
/// command output and remains pipeable.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
