//! Plain-text console reporter
//!
//! Verbosity 0 prints one character per test (`.` pass, `F` fail) followed
//! by a failure-detail section and a summary. Verbosity ≥ 1 prints a banner
//! per class, a PASS/FAIL line per test with inline failure detail, and the
//! same trailing summary.

use crate::failure::Failure;
use crate::reporter::Reporter;
use crate::result::RunResult;
use crate::runner::RunnerError;
use colored::Colorize;
use std::io::{self, Write};

pub struct TextReporter {
    verbosity: u8,
    out: Box<dyn Write>,
    wrote_dots: bool,
    current_test: String,
    failures: Vec<(String, Failure)>,
}

impl TextReporter {
    pub fn new(verbosity: u8) -> Self {
        TextReporter {
            verbosity,
            out: Box::new(io::stdout()),
            wrote_dots: false,
            current_test: String::new(),
            failures: Vec::new(),
        }
    }

    /// Redirect output, e.g. into a buffer under test.
    pub fn with_writer(mut self, out: Box<dyn Write>) -> Self {
        self.out = out;
        self
    }

    fn print_failure_details(&mut self) -> Result<(), RunnerError> {
        if self.failures.is_empty() {
            return Ok(());
        }
        writeln!(self.out)?;
        writeln!(self.out, "{}", "Failures:".red().bold())?;
        writeln!(self.out)?;
        for (test, failure) in &self.failures {
            writeln!(self.out, "  {} {}", "●".red(), test.bold())?;
            for line in failure.message.lines() {
                writeln!(self.out, "      {}", line)?;
            }
            for line in failure.trace.lines() {
                writeln!(self.out, "      {}", line.dimmed())?;
            }
            writeln!(self.out)?;
        }
        Ok(())
    }
}

impl Reporter for TextReporter {
    fn start_class(&mut self, class: &str) -> Result<(), RunnerError> {
        if self.verbosity >= 1 {
            writeln!(self.out, "{}", class.bold())?;
        }
        Ok(())
    }

    fn start_test(&mut self, full_name: &str) -> Result<(), RunnerError> {
        self.current_test = full_name.to_string();
        Ok(())
    }

    fn add_failure(&mut self, failure: &Failure) -> Result<(), RunnerError> {
        if self.verbosity >= 1 {
            for line in failure.message.lines() {
                writeln!(self.out, "      {}", line.red())?;
            }
            for line in failure.trace.lines() {
                writeln!(self.out, "      {}", line.dimmed())?;
            }
        }
        self.failures
            .push((self.current_test.clone(), failure.clone()));
        Ok(())
    }

    fn end_test(&mut self, failed: bool) -> Result<(), RunnerError> {
        if self.verbosity == 0 {
            if failed {
                write!(self.out, "{}", "F".red().bold())?;
            } else {
                write!(self.out, "{}", ".".green())?;
            }
            self.out.flush()?;
            self.wrote_dots = true;
        } else if failed {
            writeln!(self.out, "  {} {}", "FAIL".red().bold(), self.current_test)?;
        } else {
            writeln!(self.out, "  {} {}", "PASS".green().bold(), self.current_test)?;
        }
        Ok(())
    }

    fn end_suite(&mut self, result: &RunResult) -> Result<(), RunnerError> {
        if self.wrote_dots {
            writeln!(self.out)?;
        }
        if self.verbosity == 0 {
            self.print_failure_details()?;
        }
        writeln!(self.out, "{}", "─".repeat(50))?;

        let total = result.test_count();
        let percent = if total == 0 {
            100
        } else {
            result.success_count() * 100 / total
        };
        let summary = format!(
            "Success: {}% - {}/{}",
            percent,
            result.success_count(),
            total
        );
        if result.failure_count() == 0 {
            writeln!(self.out, "{}", summary.green().bold())?;
        } else {
            writeln!(self.out, "{}", summary.red().bold())?;
        }
        self.out.flush()?;
        Ok(())
    }
}
