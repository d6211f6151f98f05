//! Panic guards for the exported `extern "C"` shims.
//!
//! A panic must never unwind into the host. Every shim runs guest code
//! through one of these helpers.

use std::any::Any;
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};

thread_local! {
    static LAST_ERROR: RefCell<Option<String>> = const { RefCell::new(None) };
}

pub(crate) fn set_last_error(message: String) {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(message));
}

pub(crate) fn take_last_error() -> Option<String> {
    LAST_ERROR.with(|slot| slot.borrow_mut().take())
}

pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Run `f`; on panic record the reason for `last_error` and return `default`.
pub(crate) fn guard_reported<T>(op: &'static str, default: T, f: impl FnOnce() -> T) -> T {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(payload) => {
            set_last_error(format!("panic in `{op}`: {}", panic_message(payload)));
            default
        }
    }
}

/// Run `f`; on panic return `default` silently.
pub(crate) fn guard_with_default<T>(default: T, f: impl FnOnce() -> T) -> T {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or(default)
}

/// Run `f`; swallow a panic.
pub(crate) fn guard_void(f: impl FnOnce()) {
    let _ = panic::catch_unwind(AssertUnwindSafe(f));
}
