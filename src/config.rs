//! Output and backtrace settings for a test run.
//!
//! Defaults follow the environment: colours when stderr is a terminal, and
//! backtraces unless `TESTUTIL_BACKTRACE=0`.

use once_cell::sync::Lazy;

/// Environment variable that turns backtrace capture off when set to `0`.
pub const BACKTRACE_ENV: &str = "TESTUTIL_BACKTRACE";

static BACKTRACES_FROM_ENV: Lazy<bool> =
    Lazy::new(|| backtraces_enabled(std::env::var(BACKTRACE_ENV).ok().as_deref()));

/// Reads a `TESTUTIL_BACKTRACE` value. Unset or anything but `0` means on.
pub fn backtraces_enabled(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim() != "0")
}

/// Settings shared by a test-run handle and the assertions bound to it.
#[derive(Debug, Clone)]
pub struct Config {
    /// Colourise failure output.
    pub use_colors: bool,
    /// Record and log backtraces for panic-related failures.
    pub capture_backtraces: bool,
    /// Attach a line diff to mismatches whose values span several lines.
    pub show_diff: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stderr),
            capture_backtraces: *BACKTRACES_FROM_ENV,
            show_diff: true,
        }
    }
}

impl Config {
    /// No colours, no backtraces. Keeps recorded output stable.
    pub fn plain() -> Self {
        Self {
            use_colors: false,
            capture_backtraces: false,
            show_diff: true,
        }
    }
}
