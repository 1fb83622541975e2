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

/// Harness error types
use thiserror::Error;

/// Result type for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Reasons a register spec string fails to parse
///
/// Offsets are byte offsets into the spec text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    #[error("unexpected character {ch:?} at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("shadow marker at offset {offset} does not follow a register letter")]
    StrayPrime { offset: usize },
}

impl SpecError {
    /// Byte offset of the offending character
    pub fn offset(&self) -> usize {
        match *self {
            SpecError::UnexpectedChar { offset, .. } | SpecError::StrayPrime { offset } => offset,
        }
    }
}

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Malformed register spec: {0}")]
    MalformedSpec(#[from] SpecError),

    /// The expected-change spec of a fixture is itself malformed.
    ///
    /// This is a broken test, not a broken subject under test.
    #[error("Fixture configuration error in spec {spec:?}: {source}")]
    Configuration {
        spec: String,
        #[source]
        source: SpecError,
    },

    #[error("Invalid register mask: {:02X} {:02X} {:02X}", bytes[0], bytes[1], bytes[2])]
    InvalidMask { bytes: [u8; 3] },

    #[error("Invalid fixture table {table}: {reason}")]
    Table { table: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{failed} of {total} fixture rows failed")]
    FixturesFailed { failed: usize, total: usize },
}
