//! Guarded scopes: run a closure and turn a panic into a value.
//!
//! The stack is gone once `catch_unwind` returns, so a process-wide panic hook
//! records the backtrace while the panic is still in flight. The hook only acts
//! for threads currently inside a guarded scope and defers to the previous hook
//! everywhere else.

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};

use once_cell::sync::Lazy;

thread_local! {
    static GUARD_DEPTH: Cell<usize> = const { Cell::new(0) };
    static CAPTURE_BACKTRACE: Cell<bool> = const { Cell::new(false) };
    static LAST_BACKTRACE: RefCell<Option<String>> = const { RefCell::new(None) };
}

static PANIC_HOOK: Lazy<()> = Lazy::new(|| {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if GUARD_DEPTH.with(Cell::get) == 0 {
            previous(info);
            return;
        }
        if CAPTURE_BACKTRACE.with(Cell::get) {
            let trace = Backtrace::force_capture().to_string();
            LAST_BACKTRACE.with(|slot| *slot.borrow_mut() = Some(trace));
        }
    }));
});

/// A panic intercepted inside a guarded scope.
#[derive(Debug, Clone)]
pub struct PanicCapture {
    /// The payload, stringified.
    pub message: String,
    /// Backtrace recorded at panic time, when capture was enabled.
    pub backtrace: Option<String>,
}

/// Runs `f`, intercepting any panic it raises.
///
/// The default panic message is suppressed while the scope is active.
///
/// ```rust
/// use testutil::run_guarded;
///
/// let caught = run_guarded(false, || panic!("boom")).unwrap_err();
/// assert_eq!(caught.message, "boom");
/// assert_eq!(run_guarded(false, || 7).unwrap(), 7);
/// ```
pub fn run_guarded<F, T>(capture_backtrace: bool, f: F) -> Result<T, PanicCapture>
where
    F: FnOnce() -> T,
{
    Lazy::force(&PANIC_HOOK);

    let outer_capture = CAPTURE_BACKTRACE.with(|c| c.replace(capture_backtrace));
    GUARD_DEPTH.with(|d| d.set(d.get() + 1));
    LAST_BACKTRACE.with(|slot| slot.borrow_mut().take());

    let result = panic::catch_unwind(AssertUnwindSafe(f));

    GUARD_DEPTH.with(|d| d.set(d.get() - 1));
    CAPTURE_BACKTRACE.with(|c| c.set(outer_capture));

    result.map_err(|payload| PanicCapture {
        message: payload_message(payload.as_ref()),
        backtrace: LAST_BACKTRACE.with(|slot| slot.borrow_mut().take()),
    })
}

/// Backtrace of the caller, for failures that have no panic to point at.
pub fn call_site_backtrace() -> String {
    Backtrace::force_capture().to_string()
}

fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}
