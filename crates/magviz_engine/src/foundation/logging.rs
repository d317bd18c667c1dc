//! Logging setup
//!
//! The engine logs through the `log` facade. The platform layer's critical
//! failures are emitted at `error` level with a `CRITICAL:` prefix.

/// Initialize the logging system
///
/// Defaults to `info`; `RUST_LOG` overrides the filter. Safe to call more
/// than once; later calls keep the first logger.
pub fn init() {
    let env = env_logger::Env::default().default_filter_or("info");
    if env_logger::Builder::from_env(env).try_init().is_ok() {
        log::debug!("logging initialized");
    }
}
