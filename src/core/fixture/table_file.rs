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

//! TOML fixture table files
//!
//! ```toml
//! [runner]
//! halt_on_first_failure = false
//!
//! [[parse]]
//! name = "mixed banks"
//! spec = "acehixa'c'e'h'"
//! mask = [0x96, 0x59, 0x02]
//!
//! [[parse]]
//! spec = "abcdefg"          # no mask: the spec must be rejected
//!
//! [[diff]]
//! mutate = "ab'"            # registers to complement
//! mask = [0x02, 0x20, 0x00]
//!
//! [[check]]
//! spec = "hl"
//! mutate = "hl"
//!
//! [[check]]
//! spec = ""
//! mutate = "a"
//! changed = "a"             # the check must fail, reporting this set
//! ```
//!
//! Rows run in the order parse, diff, check. The `mutate` and `changed`
//! strings are validated when the file loads; a check row's `spec` is not,
//! because a malformed expected spec is reported per row when it runs.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::{FixtureRow, FixtureTable, Mutation};
use crate::core::config::RunnerConfig;
use crate::core::error::{HarnessError, Result};
use crate::core::register::RegisterMask;
use crate::core::spec::parse_spec;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TableFile {
    #[serde(default)]
    runner: RunnerConfig,
    #[serde(default)]
    parse: Vec<ParseCase>,
    #[serde(default)]
    diff: Vec<DiffCase>,
    #[serde(default)]
    check: Vec<CheckCase>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParseCase {
    name: Option<String>,
    spec: String,
    mask: Option<[u8; 3]>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DiffCase {
    name: Option<String>,
    mutate: String,
    mask: [u8; 3],
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CheckCase {
    name: Option<String>,
    spec: String,
    mutate: String,
    changed: Option<String>,
}

impl FixtureTable {
    /// Parse a table from TOML text
    ///
    /// # Arguments
    ///
    /// * `name` - Table name used in reports
    /// * `text` - TOML document
    ///
    /// # Errors
    ///
    /// - `HarnessError::Toml` if the document does not match the table format
    /// - `HarnessError::InvalidMask` if a mask sets an undefined bit
    /// - `HarnessError::Table` if a `mutate` or `changed` string is malformed
    pub fn from_toml_str(name: &str, text: &str) -> Result<Self> {
        let file: TableFile = toml::from_str(text)?;
        let mut table = FixtureTable::new(name);
        table.config = file.runner;

        for (i, case) in file.parse.into_iter().enumerate() {
            let row_name = case.name.unwrap_or_else(|| format!("parse #{}", i + 1));
            let row = match case.mask {
                Some(bytes) => FixtureRow::parse(row_name, case.spec, decode_mask(bytes)?),
                None => FixtureRow::malformed(row_name, case.spec),
            };
            table.push(row);
        }

        for (i, case) in file.diff.into_iter().enumerate() {
            let row_name = case.name.unwrap_or_else(|| format!("diff #{}", i + 1));
            let mutation =
                Mutation::Complement(field_mask(name, &row_name, "mutate", &case.mutate)?);
            table.push(FixtureRow::diff(row_name, mutation, decode_mask(case.mask)?));
        }

        for (i, case) in file.check.into_iter().enumerate() {
            let row_name = case.name.unwrap_or_else(|| format!("check #{}", i + 1));
            let mutation =
                Mutation::Complement(field_mask(name, &row_name, "mutate", &case.mutate)?);
            let row = match case.changed {
                Some(changed) => {
                    let changed = field_mask(name, &row_name, "changed", &changed)?;
                    FixtureRow::check_mismatch(row_name, case.spec, mutation, changed)
                }
                None => FixtureRow::check(row_name, case.spec, mutation),
            };
            table.push(row);
        }

        log::debug!("Loaded table {} ({} rows)", name, table.len());
        Ok(table)
    }

    /// Load a table from a TOML file, named after the file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_toml_str(&name, &text)
    }
}

fn decode_mask(bytes: [u8; 3]) -> Result<RegisterMask> {
    RegisterMask::from_bytes(bytes).ok_or(HarnessError::InvalidMask { bytes })
}

fn field_mask(table: &str, row: &str, field: &str, text: &str) -> Result<RegisterMask> {
    parse_spec(text).map_err(|e| HarnessError::Table {
        table: table.to_string(),
        reason: format!("row {:?}: {} {:?}: {}", row, field, text, e),
    })
}
