//! A small self-contained test binary built on attest.
//!
//! Run with: cargo run --example calculator -- -v

use attest::assertions;
use attest::{cli, Fixture, Outcome, Registry, SuiteDef};
use std::process::ExitCode;

#[derive(Default)]
struct Calculator {
    total: i64,
}

impl Fixture for Calculator {
    fn set_up(&mut self) -> Outcome {
        self.total = 0;
        Ok(())
    }
}

impl Calculator {
    fn test_add(&mut self) -> Outcome {
        self.total += 2;
        self.total += 3;
        assertions::assert_eq(&self.total, &5)
    }

    fn test_subtract_below_zero(&mut self) -> Outcome {
        self.total -= 7;
        assertions::assert_true(self.total < 0, "total should go negative")
    }
}

fn test_greeting() -> Outcome {
    assertions::assert_str_contains("hello world", "world")
}

fn main() -> ExitCode {
    let mut registry = Registry::new();
    registry.suite(
        SuiteDef::new("TestCalculator")
            .case("test_add", Calculator::test_add)
            .case("test_subtract_below_zero", Calculator::test_subtract_below_zero),
    );
    registry.function("test_greeting", test_greeting);
    cli::run(&registry)
}
