//! Logging bootstrap
//!
//! Library code only emits `tracing` events; installing a subscriber is
//! the embedding application's job. This helper gives binaries and tests
//! the default fmt setup with one call.

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static INIT: OnceCell<()> = OnceCell::new();

/// Install the default fmt subscriber, reading `RUST_LOG` when set.
/// Idempotent, and a subscriber already set by the host application wins.
pub fn init() {
    INIT.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    });
}
