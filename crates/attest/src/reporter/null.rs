//! Silent reporter: accepts every notification and surfaces nothing.
//! Useful when only the returned failure count matters.

use crate::reporter::Reporter;

pub struct NullReporter;

impl Reporter for NullReporter {}
