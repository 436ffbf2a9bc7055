use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

/// Install the global fmt subscriber on stderr.
///
/// `RUST_LOG` wins; otherwise `default_filter` is used. Stdout is left to the
/// progress lines the CLI prints.
pub fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    SubscriberBuilder::default()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_reports_error() {
        // First call may race other tests; only the second is guaranteed to fail
        let _ = init_tracing("warn");
        assert!(init_tracing("warn").is_err());
    }
}
