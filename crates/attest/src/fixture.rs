//! Test fixtures
//!
//! A fixture suite (the framework's notion of a test "class") is a type
//! implementing [`Fixture`] plus a table of named cases over it. `set_up`
//! and `tear_down` default to no-ops, so a suite opts into either by
//! overriding the method.

use crate::failure::Outcome;

/// A test fixture: per-suite state with optional set-up and tear-down.
///
/// One instance is created per resolved suite and shared by its cases, so
/// state written by one case is visible to the next case of the same run.
pub trait Fixture: Default + 'static {
    /// Runs before each test case. Failing here skips the case body.
    fn set_up(&mut self) -> Outcome {
        Ok(())
    }

    /// Runs after each test case, even when set-up or the body failed.
    fn tear_down(&mut self) -> Outcome {
        Ok(())
    }
}

/// A test case over a fixture.
pub type CaseFn<F> = fn(&mut F) -> Outcome;

/// Declarative definition of a fixture suite: a name plus its cases.
///
/// ```
/// use attest::{assertions, Fixture, Outcome, SuiteDef};
///
/// #[derive(Default)]
/// struct Counter {
///     value: u32,
/// }
///
/// impl Fixture for Counter {}
///
/// impl Counter {
///     fn test_increment(&mut self) -> Outcome {
///         self.value += 1;
///         assertions::assert_eq(&self.value, &1)
///     }
/// }
///
/// let def = SuiteDef::new("TestCounter").case("test_increment", Counter::test_increment);
/// assert_eq!(def.name(), "TestCounter");
/// ```
pub struct SuiteDef<F: Fixture> {
    name: String,
    cases: Vec<(String, CaseFn<F>)>,
}

impl<F: Fixture> SuiteDef<F> {
    pub fn new(name: impl Into<String>) -> Self {
        SuiteDef {
            name: name.into(),
            cases: Vec::new(),
        }
    }

    /// Add a named case. Cases run in lexicographic name order regardless of
    /// registration order.
    pub fn case(mut self, name: impl Into<String>, f: CaseFn<F>) -> Self {
        self.cases.push((name.into(), f));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn into_parts(self) -> (String, Vec<(String, CaseFn<F>)>) {
        (self.name, self.cases)
    }
}

/// Object-safe view of a fixture instance plus its case table, so the
/// runner can drive suites of different fixture types uniformly.
pub(crate) trait ErasedFixture {
    fn set_up(&mut self) -> Outcome;
    fn tear_down(&mut self) -> Outcome;
    /// Invoke the named case; `None` if the case is not in the table.
    fn invoke(&mut self, case: &str) -> Option<Outcome>;
}

pub(crate) struct FixtureCell<F: Fixture> {
    fixture: F,
    cases: Vec<(String, CaseFn<F>)>,
}

impl<F: Fixture> FixtureCell<F> {
    pub(crate) fn new(cases: Vec<(String, CaseFn<F>)>) -> Self {
        FixtureCell {
            fixture: F::default(),
            cases,
        }
    }
}

impl<F: Fixture> ErasedFixture for FixtureCell<F> {
    fn set_up(&mut self) -> Outcome {
        self.fixture.set_up()
    }

    fn tear_down(&mut self) -> Outcome {
        self.fixture.tear_down()
    }

    fn invoke(&mut self, case: &str) -> Option<Outcome> {
        let f = self
            .cases
            .iter()
            .find(|(name, _)| name == case)
            .map(|(_, f)| *f)?;
        Some(f(&mut self.fixture))
    }
}
