//! Logging setup for the runner.

use env_logger::Env;

/// Install `env_logger`. `RUST_LOG` overrides the default `info` level.
pub fn init() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_target(false)
        .init();
}
