use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log to stderr so ranked output on stdout stays pipeable. `RUST_LOG` wins
/// over the config level and `--verbose`.
pub fn init_logger(level: &str, verbose: bool) {
    let fallback = if verbose {
        "taskrank=debug,taskrank_core=debug".to_string()
    } else {
        format!("taskrank={level},taskrank_core={level}")
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
