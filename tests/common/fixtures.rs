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

//! Test fixtures for common test scenarios

use regdiff::core::machine::Machine;
use regdiff::core::register::Reg8;
use regdiff::core::snapshot::RegisterFile;

/// Create a machine with distinct values in every register
///
/// Primary bank holds 0x10.., alternate bank 0x80.., IX=0x1234, IY=0x5C3A,
/// interrupts enabled.
#[allow(dead_code)]
pub fn create_loaded_machine() -> Machine {
    let mut machine = Machine::new();
    for (i, reg) in Reg8::ALL.into_iter().enumerate() {
        machine.set_reg(reg, 0x10 + i as u8);
    }
    machine.ex_af();
    machine.exx();
    for (i, reg) in Reg8::ALL.into_iter().enumerate() {
        machine.set_reg(reg, 0x80 + i as u8);
    }
    machine.ex_af();
    machine.exx();
    machine.set_ix(0x1234);
    machine.set_iy(0x5C3A);
    machine.ei();
    machine
}

/// Capture, run `code`, capture again
#[allow(dead_code)]
pub fn run_between_snapshots<F>(machine: &mut Machine, code: F) -> (RegisterFile, RegisterFile)
where
    F: FnOnce(&mut Machine),
{
    let before = machine.capture();
    code(machine);
    let after = machine.capture();
    (before, after)
}
