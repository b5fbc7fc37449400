use std::sync::Once;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install the global subscriber. Logs go to stderr so they never mix with
/// the feed printed on stdout. `RUST_LOG` overrides the level.
pub fn init_logging(verbose: bool) {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let level = if verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    INIT.call_once(|| {
        let filter = EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy();
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    });
}
