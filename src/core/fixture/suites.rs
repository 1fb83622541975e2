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

//! Built-in fixture tables
//!
//! Regression coverage for the parser, the differ and the comparator. Every
//! row in these tables is expected to pass.

use super::{FixtureRow, FixtureTable, Mutation};
use crate::core::machine::Machine;
use crate::core::register::{Reg8, Register, RegisterMask};

/// Carry bit of F
const CARRY: u8 = 0x01;

/// Mask from its 3-byte layout
///
/// Only used with literal layouts; undefined bits would survive and make the
/// affected row fail.
fn layout(bytes: [u8; 3]) -> RegisterMask {
    RegisterMask::from_bits_retain(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], 0]))
}

/// Spec parser regression table
pub fn parser_table() -> FixtureTable {
    FixtureTable::new("parser")
        .with(FixtureRow::parse(
            "every register",
            "abcdefhlixiya'f'b'c'd'e'h'l'",
            layout([0xFF, 0xFF, 0x03]),
        ))
        .with(FixtureRow::parse(
            "mixed banks",
            "acehixa'c'e'h'",
            layout([0x96, 0x59, 0x02]),
        ))
        .with(FixtureRow::parse("empty spec", "", layout([0x00, 0x00, 0x00])))
        .with(FixtureRow::parse(
            "index and shadow",
            "ixiya'b'",
            layout([0x00, 0x2B, 0x00]),
        ))
        .with(FixtureRow::malformed("prime after index register", "abix'"))
        .with(FixtureRow::malformed("illegal letter", "abcdefg"))
        .with(FixtureRow::parse(
            "duplicates",
            "aaa'a'",
            layout([0x02, 0x08, 0x00]),
        ))
        .with(FixtureRow::parse(
            "main bank in bit order",
            "facbedlh",
            layout([0xFF, 0x00, 0x00]),
        ))
}

/// Snapshot differ table: every register on its own, then several at once
pub fn differ_table() -> FixtureTable {
    let singles = [
        (Register::A, [0x02, 0x00, 0x00]),
        (Register::F, [0x01, 0x00, 0x00]),
        (Register::C, [0x04, 0x00, 0x00]),
        (Register::B, [0x08, 0x00, 0x00]),
        (Register::E, [0x10, 0x00, 0x00]),
        (Register::D, [0x20, 0x00, 0x00]),
        (Register::L, [0x40, 0x00, 0x00]),
        (Register::H, [0x80, 0x00, 0x00]),
        (Register::Ix, [0x00, 0x01, 0x00]),
        (Register::Iy, [0x00, 0x02, 0x00]),
        (Register::APrime, [0x00, 0x08, 0x00]),
        (Register::FPrime, [0x00, 0x04, 0x00]),
        (Register::CPrime, [0x00, 0x10, 0x00]),
        (Register::BPrime, [0x00, 0x20, 0x00]),
        (Register::EPrime, [0x00, 0x40, 0x00]),
        (Register::DPrime, [0x00, 0x80, 0x00]),
        (Register::LPrime, [0x00, 0x00, 0x01]),
        (Register::HPrime, [0x00, 0x00, 0x02]),
    ];

    let table = singles
        .into_iter()
        .fold(FixtureTable::new("differ"), |table, (register, bytes)| {
            table.with(FixtureRow::diff(
                format!("{} only", register),
                Mutation::Complement(register.mask()),
                layout(bytes),
            ))
        });

    table.with(FixtureRow::diff(
        "main and shadow together",
        Mutation::Custom(mutate_multi),
        layout([0x0F, 0x30, 0x03]),
    ))
}

/// Comparator table: matching expectations and deliberate mismatches
pub fn check_table() -> FixtureTable {
    let mixed = RegisterMask::F
        | RegisterMask::A
        | RegisterMask::B
        | RegisterMask::D
        | RegisterMask::H
        | RegisterMask::IX
        | RegisterMask::F_PRIME
        | RegisterMask::A_PRIME
        | RegisterMask::B_PRIME
        | RegisterMask::D_PRIME
        | RegisterMask::H_PRIME;

    FixtureTable::new("check")
        .with(FixtureRow::check(
            "a only",
            "a",
            Mutation::Complement(RegisterMask::A),
        ))
        .with(FixtureRow::check_mismatch(
            "a only, nothing expected",
            "",
            Mutation::Complement(RegisterMask::A),
            RegisterMask::A,
        ))
        .with(FixtureRow::check(
            "main bank",
            "facbedlh",
            Mutation::Custom(mutate_main_bank),
        ))
        .with(FixtureRow::check_mismatch(
            "main bank, nothing expected",
            "",
            Mutation::Custom(mutate_main_bank),
            RegisterMask::MAIN,
        ))
        .with(FixtureRow::check(
            "index registers",
            "ixiy",
            Mutation::Complement(RegisterMask::INDEX),
        ))
        .with(FixtureRow::check_mismatch(
            "index registers, nothing expected",
            "",
            Mutation::Complement(RegisterMask::INDEX),
            RegisterMask::INDEX,
        ))
        .with(FixtureRow::check(
            "shadow bank",
            "f'a'c'b'e'd'l'h'",
            Mutation::Custom(mutate_shadow_bank),
        ))
        .with(FixtureRow::check_mismatch(
            "shadow bank, nothing expected",
            "",
            Mutation::Custom(mutate_shadow_bank),
            RegisterMask::SHADOW,
        ))
        .with(FixtureRow::check(
            "mixed",
            "fabdhixf'a'b'd'h'",
            Mutation::Custom(mutate_mixed),
        ))
        .with(FixtureRow::check_mismatch(
            "mixed, nothing expected",
            "",
            Mutation::Custom(mutate_mixed),
            mixed,
        ))
}

/// All built-in tables in run order
pub fn builtin_tables() -> Vec<FixtureTable> {
    vec![parser_table(), differ_table(), check_table()]
}

fn complement_in_view(machine: &mut Machine, regs: &[Reg8]) {
    for &reg in regs {
        let value = machine.reg(reg);
        machine.set_reg(reg, !value);
    }
}

fn mutate_main_bank(machine: &mut Machine) {
    complement_in_view(machine, &Reg8::ALL);
}

fn mutate_shadow_bank(machine: &mut Machine) {
    machine.exx();
    machine.ex_af();
    mutate_main_bank(machine);
    machine.ex_af();
    machine.exx();
}

fn mutate_mixed_view(machine: &mut Machine) {
    complement_in_view(machine, &[Reg8::A, Reg8::F, Reg8::B, Reg8::D, Reg8::H]);
}

fn mutate_mixed(machine: &mut Machine) {
    mutate_mixed_view(machine);
    machine.ex_af();
    machine.exx();
    mutate_mixed_view(machine);
    machine.exx();
    machine.ex_af();
    machine.complement(Register::Ix);
}

/// A, F (carry), B, C, and B', C', H', L'
fn mutate_multi(machine: &mut Machine) {
    complement_in_view(machine, &[Reg8::A, Reg8::B, Reg8::C]);
    let f = machine.reg(Reg8::F);
    machine.set_reg(Reg8::F, f ^ CARRY);

    machine.exx();
    complement_in_view(machine, &[Reg8::B, Reg8::C, Reg8::H, Reg8::L]);
    machine.exx();
}
