//! Diagnostic logging for the `linkflags` binary.
//!
//! stdout carries the derived settings and is usually captured by
//! `go build -ldflags "$(linkflags .)"`, so every log line goes to stderr.

use std::io;

use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the process-wide subscriber.
///
/// `RUST_LOG` wins over `level` when set. `json` switches to one JSON object
/// per line. A subscriber installed earlier is left in place.
pub fn init_tracing(json: bool, level: Level) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let plain = (!json).then(|| fmt::layer().with_target(false).with_writer(io::stderr));
    let structured = json.then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(io::stderr)
            .json()
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(structured)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_keeps_the_first_subscriber() {
        init_tracing(false, Level::WARN);
        init_tracing(true, Level::DEBUG);
        tracing::warn!(version = "v1.0.0", "logged after both installs");
    }
}
