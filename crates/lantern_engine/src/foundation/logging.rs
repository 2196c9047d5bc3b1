//! Logging setup
//!
//! Wraps `env_logger` so the library and its consumers share one entry
//! point: `RUST_LOG` still takes precedence, but an unset environment
//! defaults to `info` instead of silence.

pub use log::{debug, error, info, trace, warn};

/// Install the global logger, defaulting to the `info` level when
/// `RUST_LOG` is unset
///
/// Later calls are no-ops, so tests may call this freely.
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_does_not_panic() {
        init();
        init();
    }
}
