//! CLI interface for pronunciation-dict-utils
//!
//! Every dictionary command reads the dictionary, transforms it in memory and
//! writes it back to the same path, only when something changed.

pub mod args;
pub mod commands;
pub mod detect;
pub mod paths;

pub use args::{Cli, Commands};
pub use commands::execute;
pub use detect::{detect_format, FormatDetection};
pub use paths::{config_dir, PersistentConfig};

use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the level is `info`, or `debug`
/// when `debug` is set.
pub fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
