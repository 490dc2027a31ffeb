//! Tracing configuration for the rxwire binary.
//!
//! The subscriber is only initialised when `RXWIRE_LOG` (or `RUST_LOG`) is
//! set, so there is zero overhead in normal builds.
//!
//! ```bash
//! RXWIRE_LOG=debug rxwire gen --snapshot snapshot.json --out generated/
//! RXWIRE_LOG="rxwire_checker=debug,rxwire_emitter=trace" rxwire gen ...
//! ```

use tracing_subscriber::EnvFilter;

/// Build an `EnvFilter` from `RXWIRE_LOG`, falling back to `RUST_LOG`.
fn env_filter() -> Option<EnvFilter> {
    let spec = std::env::var("RXWIRE_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok()?;
    if spec.is_empty() {
        return None;
    }
    Some(EnvFilter::new(spec))
}

/// Initialise the global subscriber if logging was requested.
pub fn init() {
    let Some(filter) = env_filter() else {
        return;
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
