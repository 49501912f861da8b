//! Tracing/logging initialization.
//!
//! JSON lines on stdout. The filter comes from `RUST_LOG` when set, otherwise
//! from the level the caller passes in (usually `LOG_LEVEL`).

use tracing_subscriber::EnvFilter;

/// Build the filter: `RUST_LOG` wins over `default_level`; an unparsable
/// level falls back to `debug`.
pub fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("debug"))
}

/// Initialize tracing/logging for the process.
pub fn init(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(default_level))
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();

    ::tracing::debug!(default_level, "tracing initialized");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_a_no_op() {
        init("info");
        init("debug");
    }

    #[test]
    fn explicit_level_is_accepted() {
        if std::env::var_os("RUST_LOG").is_none() {
            assert_eq!(filter("warn").to_string(), "warn");
        }
    }
}
