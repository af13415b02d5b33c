//! Test registry
//!
//! Tests are registered explicitly rather than discovered by scanning an
//! ambient namespace: the user's test binary builds a [`Registry`], adds
//! fixture suites and free functions to it, and hands it to the runner.

use crate::failure::Outcome;
use crate::fixture::{ErasedFixture, Fixture, FixtureCell, SuiteDef};
use std::collections::BTreeMap;

pub(crate) type TestFnBox = Box<dyn Fn() -> Outcome>;

pub(crate) struct SuiteEntry {
    factory: Box<dyn Fn() -> Box<dyn ErasedFixture>>,
    cases: Vec<String>,
}

impl SuiteEntry {
    pub(crate) fn instantiate(&self) -> Box<dyn ErasedFixture> {
        (self.factory)()
    }

    pub(crate) fn cases(&self) -> &[String] {
        &self.cases
    }

    pub(crate) fn has_case(&self, case: &str) -> bool {
        self.cases.iter().any(|c| c == case)
    }
}

pub(crate) enum Entry {
    Suite(SuiteEntry),
    Function(TestFnBox),
}

/// Registry of runnable test targets, keyed by name.
///
/// Registering under an existing name replaces the earlier entry.
#[derive(Default)]
pub struct Registry {
    entries: BTreeMap<String, Entry>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Register a fixture suite.
    pub fn suite<F: Fixture>(&mut self, def: SuiteDef<F>) {
        let (name, cases) = def.into_parts();
        let case_names = cases.iter().map(|(n, _)| n.clone()).collect();
        let factory = Box::new(move || {
            Box::new(FixtureCell::<F>::new(cases.clone())) as Box<dyn ErasedFixture>
        });
        self.entries.insert(
            name,
            Entry::Suite(SuiteEntry {
                factory,
                cases: case_names,
            }),
        );
    }

    /// Register a free test function. It runs as a single test under the
    /// no-class sentinel label.
    pub fn function(&mut self, name: impl Into<String>, f: impl Fn() -> Outcome + 'static) {
        self.entries.insert(name.into(), Entry::Function(Box::new(f)));
    }

    /// Names eligible for an auto-run (no explicit targets): every entry
    /// whose name starts with a case-insensitive `test` prefix, in
    /// lexicographic order.
    pub fn auto_names(&self) -> Vec<String> {
        self.entries
            .keys()
            .filter(|name| {
                name.get(..4)
                    .is_some_and(|prefix| prefix.eq_ignore_ascii_case("test"))
            })
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }
}
