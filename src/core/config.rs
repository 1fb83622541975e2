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

//! Runner configuration
//!
//! Settings come from three layers, later ones overriding earlier ones:
//!
//! 1. defaults
//! 2. environment (`REGDIFF_FAIL_FAST`), typically from a `.env` file
//! 3. the `[runner]` section of a fixture table file, and CLI flags

use serde::{Deserialize, Serialize};

/// Environment variable enabling halt-on-first-failure
pub const FAIL_FAST_ENV: &str = "REGDIFF_FAIL_FAST";

/// Fixture runner settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    /// Stop at the first failing row instead of attempting every row
    pub halt_on_first_failure: bool,
}

impl RunnerConfig {
    /// Defaults overridden by the environment
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(FAIL_FAST_ENV) {
            match parse_flag(&value) {
                Some(flag) => config.halt_on_first_failure = flag,
                None => log::warn!("Ignoring {}={:?}: expected a boolean", FAIL_FAST_ENV, value),
            }
        }
        config
    }

    /// Merge settings from a table file's `[runner]` section
    ///
    /// Halting is sticky: once any layer asks for it, it stays on.
    pub fn merge(self, other: RunnerConfig) -> Self {
        Self {
            halt_on_first_failure: self.halt_on_first_failure || other.halt_on_first_failure,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
