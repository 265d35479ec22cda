//! Logging configuration for isagen
//!
//! Logging goes through the `log` facade with `env_logger` as backend.
//! Console status lines (`... generate done`, `AVX2 build done`) are not
//! log records and are printed regardless of the level chosen here.
//!
//! # Usage
//!
//! ```rust,ignore
//! use variants::logging;
//!
//! // Initialize from RUST_LOG, defaulting to warn
//! logging::init_from_env();
//!
//! // Or initialize with a specific level
//! logging::init_with_level(log::LevelFilter::Debug);
//! ```
//!
//! # Log Levels
//!
//! - `warn!` - compiler launch failures, unexpected filesystem state
//! - `info!` - stage boundaries (generation, compilation)
//! - `debug!` - each written file and each compiler command line
//! - `trace!` - captured compiler stdout/stderr
//!
//! # Environment Variable
//!
//! ```bash
//! RUST_LOG=info isagen               # show stages
//! RUST_LOG=variants::invoker=trace isagen  # dump compiler output
//! ```

use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logging with a specific level.
///
/// This only initializes once; subsequent calls are no-ops.
pub fn init_with_level(level: LevelFilter) {
    INIT.call_once(|| {
        Builder::new()
            .filter_level(level)
            .format(|buf, record| {
                writeln!(
                    buf,
                    "[{:5}] {} - {}",
                    record.level(),
                    record.target(),
                    record.args()
                )
            })
            .init();
    });
}

/// Initialize logging from the RUST_LOG environment variable.
///
/// If RUST_LOG is not set, defaults to Warn level.
pub fn init_from_env() {
    INIT.call_once(|| {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    });
}

/// Initialize logging for tests.
///
/// Uses the test-friendly writer so output is captured per test.
pub fn init_test() {
    let _ = env_logger::builder()
        .filter_level(LevelFilter::Warn)
        .is_test(true)
        .try_init();
}
