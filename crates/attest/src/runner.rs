//! Test execution engine
//!
//! [`SuiteRunner`] resolves requested names against the registry and drives
//! the suite lifecycle; each resolved test goes through the per-test phase
//! machine (setUp → body → tearDown) with every phase invoked under panic
//! protection. Test failures are recorded and execution continues;
//! configuration errors (bad names) propagate immediately.

use crate::failure::{self, Failure, Outcome};
use crate::fixture::ErasedFixture;
use crate::registry::{Entry, Registry, TestFnBox};
use crate::reporter::Reporter;
use crate::result::RunResult;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

/// Class label for tests registered as free functions.
pub const NO_CLASS: &str = "NoClass";

/// Configuration errors: usage mistakes, distinct from test failures.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("no such test target: {0}")]
    UnknownTarget(String),
    #[error("no test case named {case} in suite {suite}")]
    UnknownCase { suite: String, case: String },
    #[error("target {0} is a test function and has no cases")]
    NotASuite(String),
    #[error("unknown output format: {0} (expected NIL, TAP, JUNIT or TEXT)")]
    UnknownFormat(String),
    #[error("failed to write report: {0}")]
    Report(#[from] std::io::Error),
}

/// Run one phase callable with failure isolation: an `Err` return or a
/// panic becomes a `Failure`, anything else is success.
fn invoke_protected<F: FnOnce() -> Outcome>(f: F) -> Option<Failure> {
    let capture = failure::PanicCapture::arm();
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => None,
        Ok(Err(failure)) => Some(failure),
        Err(payload) => Some(Failure::from_panic(payload, capture.take())),
    }
}

/// A requested name resolved to something runnable.
enum Resolved<'r> {
    Suite {
        class: String,
        fixture: Box<dyn ErasedFixture>,
        cases: Vec<String>,
    },
    Function {
        name: String,
        func: &'r TestFnBox,
    },
}

/// Resolution rules, in priority order: `Suite:case`, then a whole suite
/// (cases with the literal `test` prefix, sorted), then a free function.
fn resolve<'r>(registry: &'r Registry, request: &str) -> Result<Resolved<'r>, RunnerError> {
    if let Some((suite, case)) = request.split_once(':') {
        return match registry.entry(suite) {
            None => Err(RunnerError::UnknownTarget(suite.to_string())),
            Some(Entry::Function(_)) => Err(RunnerError::NotASuite(suite.to_string())),
            Some(Entry::Suite(entry)) => {
                if !entry.has_case(case) {
                    return Err(RunnerError::UnknownCase {
                        suite: suite.to_string(),
                        case: case.to_string(),
                    });
                }
                Ok(Resolved::Suite {
                    class: suite.to_string(),
                    fixture: entry.instantiate(),
                    cases: vec![case.to_string()],
                })
            }
        };
    }

    match registry.entry(request) {
        Some(Entry::Suite(entry)) => {
            let mut cases: Vec<String> = entry
                .cases()
                .iter()
                .filter(|c| c.starts_with("test"))
                .cloned()
                .collect();
            cases.sort();
            Ok(Resolved::Suite {
                class: request.to_string(),
                fixture: entry.instantiate(),
                cases,
            })
        }
        Some(Entry::Function(func)) => Ok(Resolved::Function {
            name: request.to_string(),
            func,
        }),
        None => Err(RunnerError::UnknownTarget(request.to_string())),
    }
}

/// Drives one test through its phases, updating the run state and the
/// reporter. The body is skipped when setUp failed; tearDown always runs.
struct TestMethodRunner<'m> {
    result: &'m mut RunResult,
    reporter: &'m mut dyn Reporter,
}

impl TestMethodRunner<'_> {
    fn run_case(
        &mut self,
        class: &str,
        case: &str,
        fixture: &mut dyn ErasedFixture,
    ) -> Result<(), RunnerError> {
        self.begin(class, case)?;
        self.phase(|| fixture.set_up())?;
        if !self.result.current_test_failed() {
            let mut known = true;
            self.phase(|| match fixture.invoke(case) {
                Some(outcome) => outcome,
                None => {
                    known = false;
                    Ok(())
                }
            })?;
            if !known {
                // Case table and suite entry disagree: a usage error, not a
                // test failure.
                return Err(RunnerError::UnknownCase {
                    suite: class.to_string(),
                    case: case.to_string(),
                });
            }
        }
        self.phase(|| fixture.tear_down())?;
        self.finish()
    }

    fn run_function(&mut self, name: &str, func: &TestFnBox) -> Result<(), RunnerError> {
        self.begin(NO_CLASS, name)?;
        self.phase(|| func())?;
        self.finish()
    }

    fn begin(&mut self, class: &str, case: &str) -> Result<(), RunnerError> {
        self.result.start_test(class, case);
        self.reporter.start_test(&format!("{}:{}", class, case))
    }

    /// Run one phase; a failure is recorded at the point of invocation.
    /// The run counts at most one failure per test, but the reporter hears
    /// about every failing phase.
    fn phase<P: FnOnce() -> Outcome>(&mut self, f: P) -> Result<(), RunnerError> {
        if let Some(failure) = invoke_protected(f) {
            self.result.note_failure();
            self.reporter.add_failure(&failure)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), RunnerError> {
        self.reporter.end_test(self.result.current_test_failed())?;
        self.result.end_test();
        Ok(())
    }
}

/// Resolves requested names and drives the whole suite lifecycle.
pub struct SuiteRunner<'a> {
    registry: &'a Registry,
    reporter: &'a mut dyn Reporter,
    result: RunResult,
    active_class: Option<String>,
}

impl<'a> SuiteRunner<'a> {
    pub fn new(registry: &'a Registry, reporter: &'a mut dyn Reporter) -> Self {
        failure::install_capture_hook();
        SuiteRunner {
            registry,
            reporter,
            result: RunResult::new(),
            active_class: None,
        }
    }

    /// Resolve and run the requested names, returning the failure count.
    ///
    /// An empty request list falls back to every registered name with a
    /// case-insensitive `test` prefix, in lexicographic order.
    pub fn run(&mut self, names: &[String]) -> Result<usize, RunnerError> {
        self.start_suite()?;
        let names = if names.is_empty() {
            self.registry.auto_names()
        } else {
            names.to_vec()
        };
        for name in &names {
            let resolved = resolve(self.registry, name)?;
            self.run_resolved(resolved)?;
        }
        self.end_suite()
    }

    /// Begin the suite. Idempotent: a second call while a suite is already
    /// running is a no-op.
    pub fn start_suite(&mut self) -> Result<(), RunnerError> {
        if self.result.start_suite() {
            self.reporter.start_suite()?;
        }
        Ok(())
    }

    /// Close any open class, finish the report, and return the failure
    /// count for exit-status mapping.
    pub fn end_suite(&mut self) -> Result<usize, RunnerError> {
        if self.active_class.take().is_some() {
            self.reporter.end_class()?;
        }
        self.reporter.end_suite(&self.result)?;
        self.result.end_suite();
        Ok(self.result.failure_count())
    }

    pub fn result(&self) -> &RunResult {
        &self.result
    }

    fn run_resolved(&mut self, resolved: Resolved<'a>) -> Result<(), RunnerError> {
        match resolved {
            Resolved::Suite {
                class,
                mut fixture,
                cases,
            } => {
                for case in &cases {
                    self.enter_class(&class)?;
                    TestMethodRunner {
                        result: &mut self.result,
                        reporter: &mut *self.reporter,
                    }
                    .run_case(&class, case, fixture.as_mut())?;
                }
            }
            Resolved::Function { name, func } => {
                self.enter_class(NO_CLASS)?;
                TestMethodRunner {
                    result: &mut self.result,
                    reporter: &mut *self.reporter,
                }
                .run_function(&name, func)?;
            }
        }
        Ok(())
    }

    /// Emit class-boundary notifications when the class changes between
    /// consecutive tests.
    fn enter_class(&mut self, class: &str) -> Result<(), RunnerError> {
        if self.active_class.as_deref() == Some(class) {
            return Ok(());
        }
        if self.active_class.take().is_some() {
            self.reporter.end_class()?;
        }
        self.reporter.start_class(class)?;
        self.active_class = Some(class.to_string());
        Ok(())
    }
}
