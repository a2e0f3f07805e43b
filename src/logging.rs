//! Logger setup for the binaries

use std::sync::Once;

use env_logger::Builder;
use log::{LevelFilter, debug};

/// Guards the one-time logger installation
static INIT: Once = Once::new();

/// Installs `env_logger` with `info` as the default level.
///
/// `RUST_LOG` overrides the defaults. Calling this more than once is harmless.
pub fn init_logger() {
    INIT.call_once_force(|_| {
        let mut builder = Builder::new();

        builder
            .filter_level(LevelFilter::Info)
            .format_timestamp_millis()
            .parse_default_env();

        if builder.try_init().is_err() {
            debug!("logger already installed");
        }
    });
}
