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

//! Z80 register-change verification library
//!
//! This library checks that a piece of code changed exactly the registers a
//! test author expected it to change. Expectations are written in a compact
//! spec language (`"hlix"`, `"a'f'"`), encoded into a 24-bit register mask
//! and compared with the mask of registers that actually differ between two
//! register file snapshots.
//!
//! # Example
//!
//! ```
//! use regdiff::core::machine::Machine;
//! use regdiff::core::register::Reg8;
//! use regdiff::core::verify::verify;
//!
//! let mut machine = Machine::new();
//! let before = machine.capture();
//!
//! // Code under test
//! machine.set_reg(Reg8::A, 0x42);
//!
//! let after = machine.capture();
//! assert!(verify("a", &before, &after).unwrap().is_pass());
//! assert!(!verify("", &before, &after).unwrap().is_pass());
//! ```

pub mod core;
