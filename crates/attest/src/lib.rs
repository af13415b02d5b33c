//! Attest — a minimal unit-testing framework
//!
//! Tests are registered explicitly (fixture suites with optional
//! set-up/tear-down, or free functions), executed sequentially with every
//! phase isolated against failures and panics, and reported through a
//! pluggable reporter (plain text, TAP, JUnit-XML, or silent).
//!
//! ```
//! use attest::assertions;
//! use attest::{Fixture, NullReporter, Outcome, Registry, SuiteDef, SuiteRunner};
//!
//! #[derive(Default)]
//! struct Arith;
//!
//! impl Fixture for Arith {}
//!
//! impl Arith {
//!     fn test_add(&mut self) -> Outcome {
//!         assertions::assert_eq(&(2 + 2), &4)
//!     }
//! }
//!
//! let mut registry = Registry::new();
//! registry.suite(SuiteDef::new("TestArith").case("test_add", Arith::test_add));
//!
//! let mut reporter = NullReporter;
//! let mut runner = SuiteRunner::new(&registry, &mut reporter);
//! let failures = runner.run(&[]).unwrap();
//! assert_eq!(failures, 0);
//! ```
//!
//! A test binary usually delegates the whole run to [`cli::run`], which
//! parses the command line, selects the reporter, and maps the failure
//! count to the process exit status.

pub mod assertions;
pub mod cli;
pub mod failure;
pub mod fixture;
pub mod registry;
pub mod reporter;
pub mod result;
pub mod runner;

pub use failure::{Failure, Outcome};
pub use fixture::{CaseFn, Fixture, SuiteDef};
pub use registry::Registry;
pub use reporter::{
    JunitReporter, NullReporter, OutputFormat, Reporter, TapReporter, TextReporter,
};
pub use result::RunResult;
pub use runner::{RunnerError, SuiteRunner, NO_CLASS};
