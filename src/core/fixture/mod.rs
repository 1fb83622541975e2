// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Data-driven fixture tables
//!
//! A [`FixtureTable`] is an ordered list of rows, each of which exercises
//! one part of the harness:
//!
//! - **parse** rows feed a spec string to the parser and compare the mask
//!   (or expect the spec to be rejected)
//! - **diff** rows capture the machine, apply a mutation, capture again and
//!   compare the changed-register mask with a literal
//! - **check** rows run the full comparator: expected spec, mutation, verdict
//!
//! [`FixtureRunner`] attempts every row of every table and collects the
//! outcomes into a [`RunReport`]. Built-in tables live in [`suites`]; more
//! can be loaded from TOML files (see [`FixtureTable::load`]).

use std::fmt;

use crate::core::config::RunnerConfig;
use crate::core::machine::Machine;
use crate::core::register::RegisterMask;

mod runner;
pub mod suites;
mod table_file;

#[cfg(test)]
mod tests;

pub use runner::{FixtureRunner, RowOutcome, RowStatus, RunReport};

/// Register mutation applied by diff and check rows
#[derive(Clone, Copy)]
pub enum Mutation {
    /// Bitwise-complement every register in the mask
    Complement(RegisterMask),

    /// Arbitrary code run against the machine
    Custom(fn(&mut Machine)),
}

impl Mutation {
    pub fn apply(&self, machine: &mut Machine) {
        match self {
            Mutation::Complement(mask) => machine.complement_all(*mask),
            Mutation::Custom(mutate) => mutate(machine),
        }
    }
}

impl fmt::Debug for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mutation::Complement(mask) => write!(f, "Complement(\"{}\")", mask),
            Mutation::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// What a parse row expects from the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseExpectation {
    Mask(RegisterMask),
    Malformed,
}

/// What a check row expects from the comparator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckExpectation {
    Pass,

    /// The check must fail, reporting exactly this changed set
    Mismatch { changed: RegisterMask },
}

/// The work a row does
#[derive(Debug, Clone)]
pub enum RowKind {
    Parse {
        spec: String,
        expect: ParseExpectation,
    },
    Diff {
        mutation: Mutation,
        expected: RegisterMask,
    },
    Check {
        spec: String,
        mutation: Mutation,
        expect: CheckExpectation,
    },
}

/// One named fixture row
#[derive(Debug, Clone)]
pub struct FixtureRow {
    pub name: String,
    pub kind: RowKind,
}

impl FixtureRow {
    /// Parser row expecting `expected`
    pub fn parse(name: impl Into<String>, spec: impl Into<String>, expected: RegisterMask) -> Self {
        Self {
            name: name.into(),
            kind: RowKind::Parse {
                spec: spec.into(),
                expect: ParseExpectation::Mask(expected),
            },
        }
    }

    /// Parser row expecting the spec to be rejected
    pub fn malformed(name: impl Into<String>, spec: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: RowKind::Parse {
                spec: spec.into(),
                expect: ParseExpectation::Malformed,
            },
        }
    }

    pub fn diff(name: impl Into<String>, mutation: Mutation, expected: RegisterMask) -> Self {
        Self {
            name: name.into(),
            kind: RowKind::Diff { mutation, expected },
        }
    }

    /// Comparator row expecting a pass
    pub fn check(name: impl Into<String>, spec: impl Into<String>, mutation: Mutation) -> Self {
        Self {
            name: name.into(),
            kind: RowKind::Check {
                spec: spec.into(),
                mutation,
                expect: CheckExpectation::Pass,
            },
        }
    }

    /// Comparator row expecting a mismatch that reports `changed`
    pub fn check_mismatch(
        name: impl Into<String>,
        spec: impl Into<String>,
        mutation: Mutation,
        changed: RegisterMask,
    ) -> Self {
        Self {
            name: name.into(),
            kind: RowKind::Check {
                spec: spec.into(),
                mutation,
                expect: CheckExpectation::Mismatch { changed },
            },
        }
    }
}

/// Named, ordered list of fixture rows
#[derive(Debug, Clone, Default)]
pub struct FixtureTable {
    name: String,
    rows: Vec<FixtureRow>,
    config: RunnerConfig,
}

impl FixtureTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
            config: RunnerConfig::default(),
        }
    }

    /// Append a row (builder style)
    pub fn with(mut self, row: FixtureRow) -> Self {
        self.rows.push(row);
        self
    }

    pub fn push(&mut self, row: FixtureRow) {
        self.rows.push(row);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &[FixtureRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Runner settings carried by the table (from a `[runner]` section)
    pub fn config(&self) -> RunnerConfig {
        self.config
    }
}
