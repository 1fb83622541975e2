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

//! Register-change comparator
//!
//! Checks the registers that actually changed between two snapshots against
//! the set a test author named in a spec string. The check is exact: a
//! register that changed without being named fails it, and so does a named
//! register that did not change.
//!
//! Three outcomes are kept apart:
//!
//! - `Ok(Verdict::Pass)`: the masks are equal
//! - `Ok(Verdict::Fail(mismatch))`: the subject under test misbehaved
//! - `Err(HarnessError::Configuration)`: the expected spec itself is malformed

use serde::Serialize;
use std::fmt;

use crate::core::error::{HarnessError, Result};
use crate::core::machine::Machine;
use crate::core::register::RegisterMask;
use crate::core::snapshot::RegisterFile;
use crate::core::spec::parse_spec;

#[cfg(test)]
mod tests;

/// Expected and actual change masks of a failed check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    pub expected: RegisterMask,
    pub actual: RegisterMask,
}

impl Mismatch {
    /// Registers that changed but were not named
    pub fn unexpected(&self) -> RegisterMask {
        self.actual - self.expected
    }

    /// Registers that were named but did not change
    pub fn missing(&self) -> RegisterMask {
        self.expected - self.actual
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expected \"{}\", changed \"{}\"",
            self.expected, self.actual
        )?;

        let unexpected = self.unexpected();
        if !unexpected.is_empty() {
            write!(f, "; unexpected \"{}\"", unexpected)?;
        }
        let missing = self.missing();
        if !missing.is_empty() {
            write!(f, "; missing \"{}\"", missing)?;
        }
        Ok(())
    }
}

/// Outcome of comparing an expected mask against two snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail(Mismatch),
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    pub fn mismatch(&self) -> Option<&Mismatch> {
        match self {
            Verdict::Pass => None,
            Verdict::Fail(mismatch) => Some(mismatch),
        }
    }
}

/// Compare an expected mask with the changes between two snapshots
///
/// # Example
/// ```
/// use regdiff::core::register::{Register, RegisterMask};
/// use regdiff::core::snapshot::RegisterFile;
/// use regdiff::core::verify::{verify_mask, Verdict};
///
/// let before = RegisterFile::default();
/// let after = before.with(Register::A, 0xFF);
///
/// assert_eq!(verify_mask(RegisterMask::A, &before, &after), Verdict::Pass);
/// assert!(!verify_mask(RegisterMask::empty(), &before, &after).is_pass());
/// ```
pub fn verify_mask(expected: RegisterMask, before: &RegisterFile, after: &RegisterFile) -> Verdict {
    let actual = before.diff(after);
    if actual == expected {
        log::debug!("Register check passed: \"{}\"", expected);
        Verdict::Pass
    } else {
        let mismatch = Mismatch { expected, actual };
        log::debug!("Register check failed: {}", mismatch);
        Verdict::Fail(mismatch)
    }
}

/// Compare a spec string with the changes between two snapshots
///
/// # Arguments
///
/// * `expected_spec` - Registers the test expects to change, e.g. `"ab'ix"`
/// * `before` - Snapshot taken before the code under test ran
/// * `after` - Snapshot taken afterwards
///
/// # Returns
///
/// - `Ok(Verdict)` when the spec parses
/// - `Err(HarnessError::Configuration)` when it does not
///
/// # Example
/// ```
/// use regdiff::core::register::Register;
/// use regdiff::core::snapshot::RegisterFile;
/// use regdiff::core::verify::verify;
///
/// let before = RegisterFile::default();
/// let after = before.with(Register::A, 0xFF);
///
/// assert!(verify("a", &before, &after).unwrap().is_pass());
/// assert!(!verify("", &before, &after).unwrap().is_pass());
/// assert!(verify("ag", &before, &after).is_err());
/// ```
pub fn verify(expected_spec: &str, before: &RegisterFile, after: &RegisterFile) -> Result<Verdict> {
    let expected = parse_expected(expected_spec)?;
    Ok(verify_mask(expected, before, after))
}

fn parse_expected(spec: &str) -> Result<RegisterMask> {
    parse_spec(spec).map_err(|source| HarnessError::Configuration {
        spec: spec.to_string(),
        source,
    })
}

/// Expected register changes for one check, not yet armed
///
/// Follows the usual flow of a register test: parse the expectation, save
/// the registers, run the code under test, then check.
///
/// # Example
/// ```
/// use regdiff::core::machine::Machine;
/// use regdiff::core::register::Reg8;
/// use regdiff::core::verify::Expectation;
///
/// let mut machine = Machine::new();
/// let armed = Expectation::parse("hl").unwrap().save(&mut machine);
///
/// machine.set_reg(Reg8::H, 0x40);
/// machine.set_reg(Reg8::L, 0x01);
///
/// assert!(armed.check(&mut machine).is_pass());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expectation {
    expected: RegisterMask,
}

impl Expectation {
    /// Expectation from a spec string
    ///
    /// A malformed spec is a configuration error.
    pub fn parse(spec: &str) -> Result<Self> {
        Ok(Self::new(parse_expected(spec)?))
    }

    pub fn new(expected: RegisterMask) -> Self {
        Self { expected }
    }

    pub fn mask(&self) -> RegisterMask {
        self.expected
    }

    /// Capture the "before" snapshot
    pub fn save(self, machine: &mut Machine) -> Armed {
        Armed {
            expected: self.expected,
            before: machine.capture(),
        }
    }
}

/// An expectation with its "before" snapshot taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Armed {
    expected: RegisterMask,
    before: RegisterFile,
}

impl Armed {
    pub fn before(&self) -> &RegisterFile {
        &self.before
    }

    /// Capture the "after" snapshot and compare
    pub fn check(self, machine: &mut Machine) -> Verdict {
        let after = machine.capture();
        let verdict = verify_mask(self.expected, &self.before, &after);
        if !verdict.is_pass() {
            log::debug!("before: {}", self.before);
            log::debug!("after:  {}", after);
        }
        verdict
    }
}
