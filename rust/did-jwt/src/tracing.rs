//! Helpers to wrangle logging in tests and examples.
//! NOTE: [initialize_tracing] should only ever be called in tests or binaries;
//! a library should only concern itself with instrumentation and logging.
use std::sync::Once;

static INITIALIZE_TRACING: Once = Once::new();

pub fn initialize_tracing() {
    use tracing_subscriber::prelude::*;
    INITIALIZE_TRACING.call_once(|| {
        let _ = tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::new(
                std::env::var("RUST_LOG").unwrap_or_else(|_| "did_jwt=debug".into()),
            ))
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init();
    });
}
