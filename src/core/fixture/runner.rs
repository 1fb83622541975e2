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

//! Fixture table runner
//!
//! Rows run in order against one machine. The machine is put back to its
//! pre-row state after every row, so a mutation never leaks into the next.

use serde::Serialize;
use std::fmt;

use super::{CheckExpectation, FixtureRow, FixtureTable, ParseExpectation, RowKind};
use crate::core::config::RunnerConfig;
use crate::core::machine::Machine;
use crate::core::spec::parse_spec;
use crate::core::verify::{Expectation, Verdict};

/// Result of one row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RowStatus {
    Passed,

    /// The subject under test did not behave as the row expects
    Failed { detail: String },

    /// The row itself is broken (malformed expected spec)
    ConfigurationError { detail: String },

    /// Not attempted because an earlier row failed in halt-on-failure mode
    Skipped,
}

impl RowStatus {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            RowStatus::Failed { .. } | RowStatus::ConfigurationError { .. }
        )
    }
}

/// One row's outcome, tagged with where it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowOutcome {
    pub table: String,

    /// Position of the row within its table (0-based)
    pub index: usize,

    pub name: String,

    #[serde(flatten)]
    pub status: RowStatus,
}

/// Aggregated outcomes of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub outcomes: Vec<RowOutcome>,

    /// Whether the run stopped early
    pub halted: bool,
}

impl RunReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn passed(&self) -> usize {
        self.count(|status| matches!(status, RowStatus::Passed))
    }

    /// Failed rows, configuration errors included
    pub fn failures(&self) -> usize {
        self.count(RowStatus::is_failure)
    }

    pub fn configuration_errors(&self) -> usize {
        self.count(|status| matches!(status, RowStatus::ConfigurationError { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|status| matches!(status, RowStatus::Skipped))
    }

    /// 1-based position of the first failing row in the report
    pub fn first_failure(&self) -> Option<usize> {
        self.outcomes
            .iter()
            .position(|outcome| outcome.status.is_failure())
            .map(|i| i + 1)
    }

    pub fn is_success(&self) -> bool {
        self.failures() == 0
    }

    /// Failed outcomes, in order
    pub fn failed_rows(&self) -> impl Iterator<Item = &RowOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.status.is_failure())
    }

    /// Append another report's outcomes
    pub fn merge(mut self, other: RunReport) -> Self {
        self.outcomes.extend(other.outcomes);
        self.halted |= other.halted;
        self
    }

    fn count(&self, pred: impl Fn(&RowStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows: {} passed, {} failed",
            self.total(),
            self.passed(),
            self.failures()
        )?;
        let config_errors = self.configuration_errors();
        if config_errors > 0 {
            write!(f, " ({} configuration errors)", config_errors)?;
        }
        let skipped = self.skipped();
        if skipped > 0 {
            write!(f, ", {} skipped", skipped)?;
        }
        Ok(())
    }
}

/// Runs fixture tables against a machine
///
/// # Example
/// ```
/// use regdiff::core::config::RunnerConfig;
/// use regdiff::core::fixture::{FixtureRow, FixtureRunner, FixtureTable, Mutation};
/// use regdiff::core::machine::Machine;
/// use regdiff::core::register::RegisterMask;
///
/// let table = FixtureTable::new("demo")
///     .with(FixtureRow::parse("hl", "hl", RegisterMask::H | RegisterMask::L))
///     .with(FixtureRow::check("a only", "a", Mutation::Complement(RegisterMask::A)));
///
/// let runner = FixtureRunner::new(RunnerConfig::default());
/// let report = runner.run(&table, &mut Machine::new());
/// assert!(report.is_success());
/// assert_eq!(report.total(), 2);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureRunner {
    config: RunnerConfig,
}

impl FixtureRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> RunnerConfig {
        self.config
    }

    /// Run one table
    pub fn run(&self, table: &FixtureTable, machine: &mut Machine) -> RunReport {
        self.run_into(RunReport::default(), table, machine)
    }

    /// Run several tables into one report
    ///
    /// Once a halt is triggered, rows of later tables are reported as skipped.
    pub fn run_all(&self, tables: &[FixtureTable], machine: &mut Machine) -> RunReport {
        tables.iter().fold(RunReport::default(), |report, table| {
            self.run_into(report, table, machine)
        })
    }

    fn run_into(
        &self,
        report: RunReport,
        table: &FixtureTable,
        machine: &mut Machine,
    ) -> RunReport {
        log::info!("Running table {} ({} rows)", table.name(), table.len());

        let halt = self.config.merge(table.config()).halt_on_first_failure;

        table
            .rows()
            .iter()
            .enumerate()
            .fold(report, |mut report, (index, row)| {
                let status = if report.halted {
                    RowStatus::Skipped
                } else {
                    run_row(row, machine)
                };

                match &status {
                    RowStatus::Passed => {
                        log::debug!("[{}#{}] {}: ok", table.name(), index, row.name)
                    }
                    RowStatus::Failed { detail } | RowStatus::ConfigurationError { detail } => {
                        log::warn!("[{}#{}] {}: {}", table.name(), index, row.name, detail)
                    }
                    RowStatus::Skipped => {}
                }

                if halt && status.is_failure() {
                    report.halted = true;
                }

                report.outcomes.push(RowOutcome {
                    table: table.name().to_string(),
                    index,
                    name: row.name.clone(),
                    status,
                });
                report
            })
    }
}

/// Run one row, putting the machine back as it was afterwards
fn run_row(row: &FixtureRow, machine: &mut Machine) -> RowStatus {
    let saved = machine.clone();
    let status = match &row.kind {
        RowKind::Parse { spec, expect } => run_parse(spec, *expect),
        RowKind::Diff { mutation, expected } => {
            let before = machine.capture();
            mutation.apply(machine);
            let actual = before.diff(&machine.capture());
            if actual == *expected {
                RowStatus::Passed
            } else {
                RowStatus::Failed {
                    detail: format!(
                        "changed {}, expected {}",
                        hex(actual.to_bytes()),
                        hex(expected.to_bytes())
                    ),
                }
            }
        }
        RowKind::Check {
            spec,
            mutation,
            expect,
        } => match Expectation::parse(spec) {
            Ok(expectation) => {
                let armed = expectation.save(machine);
                mutation.apply(machine);
                judge_check(armed.check(machine), *expect)
            }
            Err(e) => RowStatus::ConfigurationError {
                detail: e.to_string(),
            },
        },
    };
    *machine = saved;
    status
}

fn run_parse(spec: &str, expect: ParseExpectation) -> RowStatus {
    match (parse_spec(spec), expect) {
        (Ok(mask), ParseExpectation::Mask(expected)) if mask == expected => RowStatus::Passed,
        (Ok(mask), ParseExpectation::Mask(expected)) => RowStatus::Failed {
            detail: format!(
                "{:?} parsed to {}, expected {}",
                spec,
                hex(mask.to_bytes()),
                hex(expected.to_bytes())
            ),
        },
        (Err(_), ParseExpectation::Malformed) => RowStatus::Passed,
        (Err(e), ParseExpectation::Mask(_)) => RowStatus::Failed {
            detail: format!("{:?} failed to parse: {}", spec, e),
        },
        (Ok(mask), ParseExpectation::Malformed) => RowStatus::Failed {
            detail: format!("{:?} parsed to \"{}\", expected a parse error", spec, mask),
        },
    }
}

fn judge_check(verdict: Verdict, expect: CheckExpectation) -> RowStatus {
    match (verdict, expect) {
        (Verdict::Pass, CheckExpectation::Pass) => RowStatus::Passed,
        (Verdict::Fail(mismatch), CheckExpectation::Pass) => RowStatus::Failed {
            detail: mismatch.to_string(),
        },
        (Verdict::Fail(mismatch), CheckExpectation::Mismatch { changed })
            if mismatch.actual == changed =>
        {
            RowStatus::Passed
        }
        (Verdict::Fail(mismatch), CheckExpectation::Mismatch { changed }) => RowStatus::Failed {
            detail: format!(
                "mismatch reported changed \"{}\", expected it to report \"{}\"",
                mismatch.actual, changed
            ),
        },
        (Verdict::Pass, CheckExpectation::Mismatch { changed }) => RowStatus::Failed {
            detail: format!("check passed, expected a mismatch reporting \"{}\"", changed),
        },
    }
}

/// `$96 $59 $02`
fn hex(bytes: [u8; 3]) -> String {
    format!("${:02X} ${:02X} ${:02X}", bytes[0], bytes[1], bytes[2])
}
