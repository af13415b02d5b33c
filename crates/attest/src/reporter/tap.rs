//! TAP reporter
//!
//! One `ok`/`not ok` line per test in run order, a `1..N` plan trailer at
//! the end of the suite. At verbosity ≥ 1 failure messages are indented
//! beneath the failing test's line; verbosity ≥ 2 adds the stack traces.

use crate::failure::Failure;
use crate::reporter::Reporter;
use crate::result::RunResult;
use crate::runner::RunnerError;
use std::io::{self, Write};

pub struct TapReporter {
    verbosity: u8,
    out: Box<dyn Write>,
    sequence: usize,
    current_test: String,
    failures: Vec<Failure>,
}

impl TapReporter {
    pub fn new(verbosity: u8) -> Self {
        TapReporter {
            verbosity,
            out: Box::new(io::stdout()),
            sequence: 0,
            current_test: String::new(),
            failures: Vec::new(),
        }
    }

    /// Redirect output, e.g. into a buffer under test.
    pub fn with_writer(mut self, out: Box<dyn Write>) -> Self {
        self.out = out;
        self
    }
}

impl Reporter for TapReporter {
    fn start_test(&mut self, full_name: &str) -> Result<(), RunnerError> {
        self.current_test = full_name.to_string();
        self.failures.clear();
        Ok(())
    }

    fn add_failure(&mut self, failure: &Failure) -> Result<(), RunnerError> {
        self.failures.push(failure.clone());
        Ok(())
    }

    fn end_test(&mut self, failed: bool) -> Result<(), RunnerError> {
        self.sequence += 1;
        if failed {
            writeln!(self.out, "not ok {} {}", self.sequence, self.current_test)?;
            if self.verbosity >= 1 {
                for failure in &self.failures {
                    for line in failure.message.lines() {
                        writeln!(self.out, "    {}", line)?;
                    }
                    if self.verbosity >= 2 {
                        for line in failure.trace.lines() {
                            writeln!(self.out, "    {}", line)?;
                        }
                    }
                }
            }
        } else {
            writeln!(self.out, "ok {} {}", self.sequence, self.current_test)?;
        }
        Ok(())
    }

    fn end_suite(&mut self, result: &RunResult) -> Result<(), RunnerError> {
        writeln!(self.out, "1..{}", result.test_count())?;
        self.out.flush()?;
        Ok(())
    }
}
