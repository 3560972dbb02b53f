use tracing_subscriber::EnvFilter;

/// Initialise logging. With debug logging the default level is `debug`,
/// otherwise `info`. The `RUST_LOG` environment variable can override the
/// level, but only when debug logging is enabled via the settings file.
pub fn init(debug: bool) {
    // With debug logging disabled we force `info` regardless of `RUST_LOG`,
    // so a stray environment variable cannot make the overlay threads chatty.
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
