//! Logger initialisation for the binary and tests.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger.
///
/// When `verbose` is `true`, action resolution is logged at debug level.
/// Otherwise only info level and above are shown. `RUST_LOG` overrides
/// both.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);
    builder.format_timestamp(None);

    // `try_init` only fails if a logger was already set. Ignore that case so
    // tests can call `init` multiple times without panicking.
    if builder.try_init().is_err() {
        log::trace!("logger already initialised");
    }
}
