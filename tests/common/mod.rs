//! Shared helpers for the integration tests.

#![allow(dead_code)]

use testutil::{Failure, Recorder};
use tracing_subscriber::EnvFilter;

/// Routes `tracing` events into libtest's captured output. Safe to call from
/// every test; only the first call installs the subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn recorder(name: &str) -> Recorder {
    init_tracing();
    Recorder::new(name)
}

/// The single failure a run recorded. Panics if there is not exactly one.
pub fn only_failure(run: &Recorder) -> &Failure {
    assert_eq!(
        run.failures().len(),
        1,
        "expected exactly one failure, got {:?}",
        run.failures()
    );
    &run.failures()[0]
}
