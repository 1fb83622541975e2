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

//! Core harness components
//!
//! This module contains the register-change verification components:
//! - Register names and mask layout
//! - Spec string parser
//! - Register file snapshots and differ
//! - Simulated machine (snapshot capture and restore)
//! - Comparator
//! - Fixture tables and runner

pub mod config;
pub mod error;
pub mod fixture;
pub mod machine;
pub mod register;
pub mod snapshot;
pub mod spec;
pub mod verify;

// Re-export commonly used types
pub use config::RunnerConfig;
pub use error::{HarnessError, Result, SpecError};
pub use fixture::{FixtureRow, FixtureRunner, FixtureTable, RunReport};
pub use machine::Machine;
pub use register::{Reg8, Register, RegisterMask};
pub use snapshot::{diff, Bank, RegisterFile};
pub use spec::parse_spec;
pub use verify::{verify, verify_mask, Verdict};
