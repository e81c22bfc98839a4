//! Test-run handles: the per-test object that assertions report into.

use serde::Serialize;

use crate::config::Config;
use crate::failure::Failure;
use crate::output;

/// One executing test, as seen by the assertions bound to it.
///
/// Reporting a failure marks the test failed but never stops it.
pub trait TestRun {
    fn name(&self) -> &str;

    fn config(&self) -> &Config;

    /// Writes a line to the test's log.
    fn log(&mut self, line: &str);

    /// Records a failure and marks the test failed.
    fn report(&mut self, failure: Failure);

    /// Marks the test failed without a message.
    fn fail(&mut self);

    fn failed(&self) -> bool;
}

// ============================================================================
// RECORDER: in-memory handle
// ============================================================================

/// Keeps everything in memory. Useful for inspecting what a check reported.
#[derive(Debug, Serialize)]
pub struct Recorder {
    name: String,
    logs: Vec<String>,
    failures: Vec<Failure>,
    failed: bool,
    #[serde(skip)]
    config: Config,
}

impl Recorder {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, Config::plain())
    }

    pub fn with_config(name: impl Into<String>, config: Config) -> Self {
        Self {
            name: name.into(),
            logs: Vec::new(),
            failures: Vec::new(),
            failed: false,
            config,
        }
    }

    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    /// The run as JSON: name, logs, failures and the failed flag.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl TestRun for Recorder {
    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn log(&mut self, line: &str) {
        self.logs.push(line.to_string());
    }

    fn report(&mut self, failure: Failure) {
        self.failures.push(failure);
        self.failed = true;
    }

    fn fail(&mut self) {
        self.failed = true;
    }

    fn failed(&self) -> bool {
        self.failed
    }
}

// ============================================================================
// LIBTEST RUN: stderr-backed handle for `#[test]` functions
// ============================================================================

/// Handle for a `#[test]` function.
///
/// Output goes through `eprint!` so libtest's capture applies: it only shows
/// for failing tests or with `--nocapture`. If any failure was recorded, the
/// handle panics when dropped, which fails the enclosing test after the body
/// has run to completion.
///
/// ```rust,should_panic
/// use testutil::{Assert, LibtestRun};
///
/// let mut run = LibtestRun::new("doc");
/// Assert::new(&mut run).ok("never true", false);
/// // dropping `run` fails the test
/// ```
pub struct LibtestRun {
    name: String,
    config: Config,
    failures: usize,
    failed: bool,
}

impl LibtestRun {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, Config::default())
    }

    pub fn with_config(name: impl Into<String>, config: Config) -> Self {
        Self {
            name: name.into(),
            config,
            failures: 0,
            failed: false,
        }
    }

    /// Names the handle after the current thread; libtest names each test's
    /// thread after the test.
    pub fn current() -> Self {
        let name = std::thread::current()
            .name()
            .unwrap_or("<unnamed>")
            .to_string();
        Self::new(name)
    }

    fn flush(&self, buf: termcolor::Buffer) {
        eprint!("{}", String::from_utf8_lossy(buf.as_slice()));
    }
}

impl TestRun for LibtestRun {
    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn log(&mut self, line: &str) {
        let mut buf = output::buffer_for(&self.config);
        let _ = output::write_log(&mut buf, &self.name, line);
        self.flush(buf);
    }

    fn report(&mut self, failure: Failure) {
        let mut buf = output::buffer_for(&self.config);
        let _ = output::write_failure(&mut buf, &self.name, &failure, &self.config);
        self.flush(buf);
        self.failures += 1;
        self.failed = true;
    }

    fn fail(&mut self) {
        self.failed = true;
    }

    fn failed(&self) -> bool {
        self.failed
    }
}

impl Drop for LibtestRun {
    fn drop(&mut self) {
        if self.failed && !std::thread::panicking() {
            panic!(
                "test {} failed ({} assertion failure(s))",
                self.name, self.failures
            );
        }
    }
}
