//! Log output set-up.
//!
//! Call sites use the `tracing` macros; the binary installs a `fmt`
//! subscriber filtered by `RUST_LOG` (default: `info`).

use tracing::Subscriber;
use tracing_subscriber::fmt::{fmt, MakeWriter};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber for the CLI.
///
/// Lines read `LEVEL message`: plain text, no timestamps, targets or colours.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    subscriber(filter, std::io::stderr).init();
}

/// Subscriber for tests; safe to call more than once.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

fn subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_ansi(false)
        .with_writer(writer)
        .finish()
}
