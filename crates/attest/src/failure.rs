//! Failure record and panic capture
//!
//! A test phase fails either by returning `Err(Failure)` (assertions) or by
//! panicking. Both paths end up as a `Failure` carrying the message and a
//! call-stack trace that starts at the user's call site, with the panic and
//! harness machinery stripped from the top.

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic;
use std::sync::Once;

/// Result of one test phase (setUp, body, or tearDown).
pub type Outcome = Result<(), Failure>;

/// A caught abnormal termination of a test phase.
#[derive(Debug, Clone)]
pub struct Failure {
    /// Human-readable description of what went wrong.
    pub message: String,
    /// Cleaned call-stack trace, starting at the user's call site.
    pub trace: String,
}

impl Failure {
    /// Build a failure with the trace captured at the call site.
    pub fn new(message: impl Into<String>) -> Self {
        Failure {
            message: message.into(),
            trace: clean_trace(&Backtrace::force_capture().to_string()),
        }
    }

    /// Build a failure from pre-captured parts.
    pub fn with_trace(message: impl Into<String>, trace: impl Into<String>) -> Self {
        Failure {
            message: message.into(),
            trace: trace.into(),
        }
    }

    /// Convert a caught panic payload into a failure, attaching the trace
    /// recorded by the capture hook (if any).
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>, trace: Option<String>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "test panicked".to_string()
        };
        Failure {
            message,
            trace: trace.unwrap_or_default(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

// ============================================================================
// Panic capture hook
// ============================================================================

static INSTALL: Once = Once::new();

thread_local! {
    static CAPTURING: Cell<bool> = const { Cell::new(false) };
    static CAPTURED: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Install the backtrace-recording panic hook.
///
/// Installed once per process; outside protected sections the hook delegates
/// to whatever hook was active before, so panics unrelated to the harness
/// keep their normal reporting.
pub(crate) fn install_capture_hook() {
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if CAPTURING.with(Cell::get) {
                let trace = clean_trace(&Backtrace::force_capture().to_string());
                CAPTURED.with(|c| *c.borrow_mut() = Some(trace));
            } else {
                previous(info);
            }
        }));
    });
}

/// Arms the capture hook for the current thread until dropped.
pub(crate) struct PanicCapture;

impl PanicCapture {
    pub(crate) fn arm() -> Self {
        CAPTURING.with(|c| c.set(true));
        CAPTURED.with(|c| c.borrow_mut().take());
        PanicCapture
    }

    /// Take the trace recorded since arming, if a panic occurred.
    pub(crate) fn take(&self) -> Option<String> {
        CAPTURED.with(|c| c.borrow_mut().take())
    }
}

impl Drop for PanicCapture {
    fn drop(&mut self) {
        CAPTURING.with(|c| c.set(false));
    }
}

// ============================================================================
// Trace cleaning
// ============================================================================

/// Frame symbols that belong to the panic/harness machinery, not user code.
const INTERNAL_FRAMES: &[&str] = &[
    "std::backtrace",
    "std::panicking",
    "core::panicking",
    "std::panic",
    "std::sys::backtrace",
    "rust_begin_unwind",
    "rust_panic",
    "__rust_try",
    "attest::failure",
    "attest::runner",
    "attest::assertions::assert_",
    "attest::assertions::fail",
];

/// Strip leading harness-internal frames so the trace starts at the user's
/// call site. Frames below the first user frame are kept as-is.
pub(crate) fn clean_trace(raw: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut in_user = false;
    let mut keep_current = false;

    for line in raw.lines() {
        if let Some(symbol) = frame_symbol(line) {
            keep_current = in_user || !is_internal(symbol);
            if keep_current {
                in_user = true;
            }
        }
        if keep_current {
            kept.push(line);
        }
    }

    if kept.is_empty() {
        raw.trim_end().to_string()
    } else {
        kept.join("\n")
    }
}

/// Parse a backtrace frame header (`  12: some::symbol`), returning the
/// symbol. Continuation lines (`at src/...`) return `None`.
fn frame_symbol(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let (index, rest) = trimmed.split_once(':')?;
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(rest.trim())
}

fn is_internal(symbol: &str) -> bool {
    INTERNAL_FRAMES.iter().any(|prefix| symbol.contains(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_new_carries_message() {
        let failure = Failure::new("something broke");
        assert_eq!(failure.message, "something broke");
    }

    #[test]
    fn test_failure_with_trace() {
        let failure = Failure::with_trace("msg", "frame 1\nframe 2");
        assert_eq!(failure.message, "msg");
        assert_eq!(failure.trace, "frame 1\nframe 2");
    }

    #[test]
    fn test_failure_display_is_message() {
        let failure = Failure::with_trace("short message", "trace");
        assert_eq!(failure.to_string(), "short message");
    }

    #[test]
    fn test_from_panic_str_payload() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        let failure = Failure::from_panic(payload, None);
        assert_eq!(failure.message, "boom");
        assert!(failure.trace.is_empty());
    }

    #[test]
    fn test_from_panic_string_payload() {
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("formatted boom"));
        let failure = Failure::from_panic(payload, Some("the trace".to_string()));
        assert_eq!(failure.message, "formatted boom");
        assert_eq!(failure.trace, "the trace");
    }

    #[test]
    fn test_from_panic_opaque_payload() {
        let payload: Box<dyn std::any::Any + Send> = Box::new(42u32);
        let failure = Failure::from_panic(payload, None);
        assert_eq!(failure.message, "test panicked");
    }

    #[test]
    fn test_clean_trace_strips_leading_internal_frames() {
        let raw = [
            "   0: std::panicking::begin_panic",
            "             at /rustc/lib/std/panicking.rs:100:1",
            "   1: core::panicking::panic_fmt",
            "   2: my_crate::my_test",
            "             at src/lib.rs:10:5",
            "   3: attest::runner::invoke_protected",
        ]
        .join("\n");
        let cleaned = clean_trace(&raw);
        assert!(!cleaned.contains("std::panicking"));
        assert!(!cleaned.contains("core::panicking"));
        assert!(cleaned.contains("my_crate::my_test"));
        assert!(cleaned.contains("src/lib.rs:10:5"));
        // Frames below the user's call site survive.
        assert!(cleaned.contains("attest::runner::invoke_protected"));
    }

    #[test]
    fn test_clean_trace_keeps_everything_when_no_internal_frames() {
        let raw = "   0: user::alpha\n   1: user::beta";
        assert_eq!(clean_trace(raw), raw);
    }

    #[test]
    fn test_clean_trace_all_internal_falls_back_to_raw() {
        let raw = "   0: std::panicking::begin_panic\n   1: core::panicking::panic_fmt";
        // Nothing survives the filter, so the raw text is better than nothing.
        assert_eq!(clean_trace(raw), raw);
    }

    #[test]
    fn test_frame_symbol_parses_header_lines_only() {
        assert_eq!(frame_symbol("   3: foo::bar"), Some("foo::bar"));
        assert_eq!(frame_symbol("             at src/main.rs:1:1"), None);
        assert_eq!(frame_symbol("not a frame"), None);
    }
}
