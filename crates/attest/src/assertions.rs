//! Assertion primitives
//!
//! Plain functions returning [`Outcome`] so test bodies chain them with `?`:
//!
//! - `assert_true(condition, message)` / `assert_false(condition, message)`
//! - `assert_eq(actual, expected)` / `assert_ne(actual, expected)` — deep
//!   equality via `PartialEq`, both values rendered on failure
//! - `assert_str_contains(haystack, needle)` — substring check
//! - `assert_error(f)` / `assert_no_error(f)` — expectation on a callable
//! - `fail(message)` — unconditional failure

use crate::failure::{Failure, Outcome};
use std::fmt::Debug;

/// Fail the current phase unconditionally.
pub fn fail(message: impl Into<String>) -> Outcome {
    Err(Failure::new(message))
}

/// Fails with the given message if `condition` is false.
pub fn assert_true(condition: bool, message: &str) -> Outcome {
    if !condition {
        return fail(format!("Assertion failed: {}", message));
    }
    Ok(())
}

/// Fails with the given message if `condition` is true.
pub fn assert_false(condition: bool, message: &str) -> Outcome {
    if condition {
        return fail(format!("Assertion failed (expected false): {}", message));
    }
    Ok(())
}

/// Compares using `PartialEq`. Shows both values on failure.
pub fn assert_eq<T: PartialEq + Debug>(actual: &T, expected: &T) -> Outcome {
    if actual != expected {
        return fail(format!(
            "Assertion failed: values not equal\n  Actual:   {:?}\n  Expected: {:?}",
            actual, expected
        ));
    }
    Ok(())
}

/// Succeeds if `actual` and `expected` are not equal.
pub fn assert_ne<T: PartialEq + Debug>(actual: &T, expected: &T) -> Outcome {
    if actual == expected {
        return fail(format!(
            "Assertion failed: values are equal (expected them to differ)\n  Value: {:?}",
            actual
        ));
    }
    Ok(())
}

/// Asserts that `haystack` contains `needle` as a substring.
pub fn assert_str_contains(haystack: &str, needle: &str) -> Outcome {
    if !haystack.contains(needle) {
        return fail(format!(
            "Assertion failed: {:?} does not contain {:?}",
            haystack, needle
        ));
    }
    Ok(())
}

/// Calls `f` and asserts it fails.
pub fn assert_error<F: FnOnce() -> Outcome>(f: F) -> Outcome {
    match f() {
        Ok(()) => fail("Assertion failed: expected the callable to fail, but it succeeded"),
        Err(_) => Ok(()),
    }
}

/// Calls `f` and asserts it does NOT fail.
pub fn assert_no_error<F: FnOnce() -> Outcome>(f: F) -> Outcome {
    match f() {
        Ok(()) => Ok(()),
        Err(failure) => fail(format!(
            "Assertion failed: expected the callable to succeed, but it failed: {}",
            failure.message
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- assert_true ----------------------------------------------------------

    #[test]
    fn test_assert_true_passes_on_true() {
        assert!(assert_true(true, "ok").is_ok());
    }

    #[test]
    fn test_assert_true_fails_on_false() {
        let result = assert_true(false, "custom msg");
        let failure = result.unwrap_err();
        assert!(failure.message.contains("Assertion failed"));
        assert!(failure.message.contains("custom msg"));
    }

    #[test]
    fn test_assert_true_failure_captures_trace() {
        let failure = assert_true(false, "msg").unwrap_err();
        assert!(!failure.trace.is_empty());
    }

    // -- assert_false ---------------------------------------------------------

    #[test]
    fn test_assert_false_passes_on_false() {
        assert!(assert_false(false, "ok").is_ok());
    }

    #[test]
    fn test_assert_false_fails_on_true() {
        let failure = assert_false(true, "was true").unwrap_err();
        assert!(failure.message.contains("expected false"));
    }

    // -- assert_eq ------------------------------------------------------------

    #[test]
    fn test_assert_eq_numbers() {
        assert!(assert_eq(&5, &5).is_ok());
    }

    #[test]
    fn test_assert_eq_strings() {
        assert!(assert_eq(&"hello", &"hello").is_ok());
    }

    #[test]
    fn test_assert_eq_vectors_deep() {
        assert!(assert_eq(&vec![1, 2, 3], &vec![1, 2, 3]).is_ok());
    }

    #[test]
    fn test_assert_eq_fails_shows_both_values() {
        let failure = assert_eq(&5, &10).unwrap_err();
        assert!(failure.message.contains("Actual:"), "msg: {}", failure.message);
        assert!(failure.message.contains("Expected:"), "msg: {}", failure.message);
        assert!(failure.message.contains('5'));
        assert!(failure.message.contains("10"));
    }

    // -- assert_ne ------------------------------------------------------------

    #[test]
    fn test_assert_ne_passes() {
        assert!(assert_ne(&1, &2).is_ok());
    }

    #[test]
    fn test_assert_ne_fails_when_equal() {
        let failure = assert_ne(&"same", &"same").unwrap_err();
        assert!(failure.message.contains("expected them to differ"));
    }

    // -- assert_str_contains --------------------------------------------------

    #[test]
    fn test_assert_str_contains_passes() {
        assert!(assert_str_contains("hello world", "lo wo").is_ok());
    }

    #[test]
    fn test_assert_str_contains_fails_when_missing() {
        let failure = assert_str_contains("hello", "xyz").unwrap_err();
        assert!(failure.message.contains("does not contain"));
    }

    // -- assert_error / assert_no_error ---------------------------------------

    #[test]
    fn test_assert_error_passes_when_callable_fails() {
        assert!(assert_error(|| fail("intentional")).is_ok());
    }

    #[test]
    fn test_assert_error_fails_when_callable_succeeds() {
        let failure = assert_error(|| Ok(())).unwrap_err();
        assert!(failure.message.contains("it succeeded"));
    }

    #[test]
    fn test_assert_no_error_passes_when_callable_succeeds() {
        assert!(assert_no_error(|| Ok(())).is_ok());
    }

    #[test]
    fn test_assert_no_error_fails_and_includes_inner_message() {
        let failure = assert_no_error(|| fail("inner reason")).unwrap_err();
        assert!(failure.message.contains("inner reason"));
    }

    // -- fail -----------------------------------------------------------------

    #[test]
    fn test_fail_always_fails() {
        let failure = fail("forced").unwrap_err();
        assert_eq!(failure.message, "forced");
    }
}
