//! Run-state record
//!
//! One [`RunResult`] exists per suite run. The runner mutates it as
//! execution progresses; reporters read it for display context and final
//! counts. Invariant: `failure_count <= test_count`.

/// Mutable state of one suite run.
#[derive(Debug, Default, Clone)]
pub struct RunResult {
    test_count: usize,
    failure_count: usize,
    current_class: String,
    current_test: String,
    current_test_failed: bool,
    suite_started: bool,
}

impl RunResult {
    pub fn new() -> Self {
        RunResult::default()
    }

    /// Mark the suite started, resetting all counters. Returns `false` (and
    /// changes nothing) when the suite is already running.
    pub(crate) fn start_suite(&mut self) -> bool {
        if self.suite_started {
            return false;
        }
        *self = RunResult {
            suite_started: true,
            ..RunResult::default()
        };
        true
    }

    pub(crate) fn end_suite(&mut self) {
        self.suite_started = false;
    }

    pub(crate) fn start_test(&mut self, class: &str, test: &str) {
        self.test_count += 1;
        self.current_class = class.to_string();
        self.current_test = test.to_string();
        self.current_test_failed = false;
    }

    /// Record a failing phase. The failure count increments only for the
    /// first failing phase of the current test; returns whether this call
    /// was that first one.
    pub(crate) fn note_failure(&mut self) -> bool {
        if self.current_test_failed {
            return false;
        }
        self.current_test_failed = true;
        self.failure_count += 1;
        true
    }

    pub(crate) fn end_test(&mut self) {
        self.current_test.clear();
        self.current_test_failed = false;
    }

    pub fn test_count(&self) -> usize {
        self.test_count
    }

    pub fn failure_count(&self) -> usize {
        self.failure_count
    }

    pub fn success_count(&self) -> usize {
        self.test_count - self.failure_count
    }

    pub fn current_class(&self) -> &str {
        &self.current_class
    }

    pub fn current_test(&self) -> &str {
        &self.current_test
    }

    pub fn current_test_failed(&self) -> bool {
        self.current_test_failed
    }

    pub fn is_started(&self) -> bool {
        self.suite_started
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_suite_is_idempotent() {
        let mut result = RunResult::new();
        assert!(result.start_suite());
        result.start_test("TestA", "test_one");
        // Second start while running is a no-op: counters survive.
        assert!(!result.start_suite());
        assert_eq!(result.test_count(), 1);
    }

    #[test]
    fn test_start_suite_after_end_resets_counters() {
        let mut result = RunResult::new();
        result.start_suite();
        result.start_test("TestA", "test_one");
        result.note_failure();
        result.end_test();
        result.end_suite();

        assert!(result.start_suite());
        assert_eq!(result.test_count(), 0);
        assert_eq!(result.failure_count(), 0);
    }

    #[test]
    fn test_failure_counted_once_per_test() {
        let mut result = RunResult::new();
        result.start_suite();
        result.start_test("TestA", "test_one");

        assert!(result.note_failure());
        // Second failing phase of the same test (e.g. tearDown after body).
        assert!(!result.note_failure());
        assert_eq!(result.failure_count(), 1);
    }

    #[test]
    fn test_failure_flag_resets_per_test() {
        let mut result = RunResult::new();
        result.start_suite();

        result.start_test("TestA", "test_one");
        result.note_failure();
        result.end_test();

        result.start_test("TestA", "test_two");
        assert!(!result.current_test_failed());
        assert!(result.note_failure());
        assert_eq!(result.failure_count(), 2);
    }

    #[test]
    fn test_counts_and_context() {
        let mut result = RunResult::new();
        result.start_suite();
        result.start_test("TestA", "test_one");
        result.end_test();
        result.start_test("TestB", "test_two");
        result.note_failure();

        assert_eq!(result.test_count(), 2);
        assert_eq!(result.failure_count(), 1);
        assert_eq!(result.success_count(), 1);
        assert_eq!(result.current_class(), "TestB");
        assert_eq!(result.current_test(), "test_two");
        assert!(result.failure_count() <= result.test_count());
    }
}
