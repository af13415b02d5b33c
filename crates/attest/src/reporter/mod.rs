//! Result reporters
//!
//! The engine drives a [`Reporter`] through an ordered sequence of
//! lifecycle notifications; what happens on the other side (console
//! output, XML files, nothing at all) is the reporter's business.

pub mod junit;
pub mod null;
pub mod tap;
pub mod text;

use crate::failure::Failure;
use crate::result::RunResult;
use crate::runner::RunnerError;
use std::path::Path;
use std::str::FromStr;

pub use junit::JunitReporter;
pub use null::NullReporter;
pub use tap::TapReporter;
pub use text::TextReporter;

/// Sink for suite lifecycle and outcome events.
///
/// Every method defaults to a no-op, so implementations only override what
/// they surface. Methods are fallible for the reporters that perform I/O;
/// the engine aborts the run on a report error.
pub trait Reporter {
    /// Called once before any test.
    fn start_suite(&mut self) -> Result<(), RunnerError> {
        Ok(())
    }

    /// Called when execution enters a new class context.
    fn start_class(&mut self, _class: &str) -> Result<(), RunnerError> {
        Ok(())
    }

    /// Called immediately before a test's setUp/body/tearDown sequence.
    fn start_test(&mut self, _full_name: &str) -> Result<(), RunnerError> {
        Ok(())
    }

    /// Called once per failing phase; a test counts at most one failure
    /// but may produce several of these.
    fn add_failure(&mut self, _failure: &Failure) -> Result<(), RunnerError> {
        Ok(())
    }

    /// Called once per test after all phases completed.
    fn end_test(&mut self, _failed: bool) -> Result<(), RunnerError> {
        Ok(())
    }

    /// Called when leaving a class context.
    fn end_class(&mut self) -> Result<(), RunnerError> {
        Ok(())
    }

    /// Called once at the end of the suite.
    fn end_suite(&mut self, _result: &RunResult) -> Result<(), RunnerError> {
        Ok(())
    }
}

/// The built-in reporter kinds, selectable by case-insensitive name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Tap,
    Junit,
    Nil,
}

impl FromStr for OutputFormat {
    type Err = RunnerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TEXT" => Ok(OutputFormat::Text),
            "TAP" => Ok(OutputFormat::Tap),
            "JUNIT" => Ok(OutputFormat::Junit),
            "NIL" => Ok(OutputFormat::Nil),
            _ => Err(RunnerError::UnknownFormat(s.to_string())),
        }
    }
}

/// Build a reporter for the selected format.
pub fn for_format(format: OutputFormat, verbosity: u8, junit_dir: &Path) -> Box<dyn Reporter> {
    match format {
        OutputFormat::Text => Box::new(TextReporter::new(verbosity)),
        OutputFormat::Tap => Box::new(TapReporter::new(verbosity)),
        OutputFormat::Junit => Box::new(JunitReporter::new(junit_dir)),
        OutputFormat::Nil => Box::new(NullReporter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("text", OutputFormat::Text)]
    #[case("TEXT", OutputFormat::Text)]
    #[case("Tap", OutputFormat::Tap)]
    #[case("TAP", OutputFormat::Tap)]
    #[case("junit", OutputFormat::Junit)]
    #[case("JUnit", OutputFormat::Junit)]
    #[case("nil", OutputFormat::Nil)]
    #[case("NIL", OutputFormat::Nil)]
    fn test_format_parses_case_insensitive(#[case] input: &str, #[case] expected: OutputFormat) {
        assert_eq!(input.parse::<OutputFormat>().unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("xml")]
    #[case("texttap")]
    fn test_unknown_format_is_a_configuration_error(#[case] input: &str) {
        let err = input.parse::<OutputFormat>().unwrap_err();
        assert!(matches!(err, RunnerError::UnknownFormat(_)));
    }

    #[test]
    fn test_default_reporter_methods_are_no_ops() {
        struct Bare;
        impl Reporter for Bare {}

        let mut reporter = Bare;
        assert!(reporter.start_suite().is_ok());
        assert!(reporter.start_class("TestX").is_ok());
        assert!(reporter.start_test("TestX:test_y").is_ok());
        assert!(reporter.end_test(false).is_ok());
        assert!(reporter.end_class().is_ok());
        assert!(reporter.end_suite(&RunResult::new()).is_ok());
    }
}
