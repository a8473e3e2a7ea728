use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Filter directive for a `-v` count: warnings by default, then info, debug
/// and trace for this crate.
pub fn directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn,quizgen=info",
        1 => "info,quizgen=debug",
        2 => "debug,quizgen=trace",
        _ => "trace",
    }
}

/// Installs the fmt subscriber on stderr. `RUST_LOG` takes precedence over
/// the verbosity flag.
pub fn init(verbosity: u8) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish()
        .try_init()
}
