//! CLI entry point
//!
//! A test binary builds its [`Registry`] and hands it to [`run`], which
//! parses the command line, builds the selected reporter, runs the suite,
//! and maps the failure count to a process exit status.

use crate::registry::Registry;
use crate::reporter::{self, OutputFormat};
use crate::runner::SuiteRunner;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// Attest test runner.
///
/// Runs the tests registered by the embedding binary and reports results
/// in the selected format.
///
/// EXAMPLES:
///     tests                        Run every registered test* target
///     tests TestParser             Run one suite
///     tests TestParser:test_eof    Run one case
///     tests -o tap                 TAP output
///     tests -o junit --junit-dir target/reports
///
/// ENVIRONMENT VARIABLES:
///     ATTEST_OUTPUT      Default output format (NIL, TAP, JUNIT, TEXT)
///     ATTEST_JUNIT_DIR   Default directory for JUnit XML files
#[derive(Parser, Debug)]
#[command(name = "attest")]
#[command(version)]
pub struct Cli {
    /// Targets: a suite name, `Suite:case`, or a function name.
    /// With no targets, every registered name starting with `test`
    /// (case-insensitive) runs in lexicographic order.
    pub targets: Vec<String>,

    /// Output format: TEXT, TAP, JUNIT or NIL (case-insensitive)
    #[arg(long, short = 'o', env = "ATTEST_OUTPUT", default_value = "TEXT")]
    pub output: String,

    /// Increase verbosity (repeatable)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Directory for JUnit XML files
    #[arg(long, env = "ATTEST_JUNIT_DIR", default_value = ".")]
    pub junit_dir: PathBuf,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Parse `std::env::args`, run the suite, and map the failure count to an
/// exit status (zero failures → success).
pub fn run(registry: &Registry) -> ExitCode {
    match run_with(registry, Cli::parse()) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Run the suite described by an already-parsed command line, returning
/// the failure count.
pub fn run_with(registry: &Registry, cli: Cli) -> Result<usize> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let format: OutputFormat = cli.output.parse()?;
    let mut reporter = reporter::for_format(format, cli.verbose, &cli.junit_dir);
    let mut runner = SuiteRunner::new(registry, reporter.as_mut());
    let failures = runner.run(&cli.targets)?;
    Ok(failures)
}
