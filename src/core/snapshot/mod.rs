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

//! Register file snapshots and the snapshot differ
//!
//! A [`RegisterFile`] is a plain `Copy` value holding both 8-bit banks and
//! the two index registers as they were at one instant. Nothing in it refers
//! back to a live machine, so a captured snapshot never changes.
//!
//! [`diff`] compares two snapshots location by location and reports every
//! register whose value differs as a [`RegisterMask`]. Only "changed" versus
//! "unchanged" matters; the direction of the change does not.

use std::fmt;

use crate::core::register::{BankKind, Reg8, Register, RegisterMask};


/// One bank of eight 8-bit registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bank {
    pub a: u8,
    pub f: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
}

impl Bank {
    /// Read one register of the bank
    #[inline]
    pub fn get(&self, reg: Reg8) -> u8 {
        match reg {
            Reg8::A => self.a,
            Reg8::F => self.f,
            Reg8::B => self.b,
            Reg8::C => self.c,
            Reg8::D => self.d,
            Reg8::E => self.e,
            Reg8::H => self.h,
            Reg8::L => self.l,
        }
    }

    /// Write one register of the bank
    #[inline]
    pub fn set(&mut self, reg: Reg8, value: u8) {
        match reg {
            Reg8::A => self.a = value,
            Reg8::F => self.f = value,
            Reg8::B => self.b = value,
            Reg8::C => self.c = value,
            Reg8::D => self.d = value,
            Reg8::E => self.e = value,
            Reg8::H => self.h = value,
            Reg8::L => self.l = value,
        }
    }

    /// Registers whose values differ between `self` and `other`
    pub fn changed<'a>(&'a self, other: &'a Bank) -> impl Iterator<Item = Reg8> + 'a {
        Reg8::ALL
            .into_iter()
            .filter(move |&reg| self.get(reg) != other.get(reg))
    }

    #[inline]
    fn pair(hi: u8, lo: u8) -> u16 {
        u16::from_be_bytes([hi, lo])
    }
}

/// Snapshot of the complete register file
///
/// # Example
/// ```
/// use regdiff::core::register::{Register, RegisterMask};
/// use regdiff::core::snapshot::RegisterFile;
///
/// let before = RegisterFile::default();
/// let after = before.with(Register::A, 0x42).with(Register::Iy, 0x8000);
///
/// assert_eq!(before.diff(&after), RegisterMask::A | RegisterMask::IY);
/// assert!(before.diff(&before).is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegisterFile {
    /// Main bank (A, F, B, C, D, E, H, L)
    pub main: Bank,

    /// Shadow bank (A', F', B', C', D', E', H', L')
    pub shadow: Bank,

    /// Index register IX
    pub ix: u16,

    /// Index register IY
    pub iy: u16,
}

impl RegisterFile {
    pub fn new(main: Bank, shadow: Bank, ix: u16, iy: u16) -> Self {
        Self {
            main,
            shadow,
            ix,
            iy,
        }
    }

    /// Value of one location; 8-bit registers are zero-extended
    pub fn value(&self, register: Register) -> u16 {
        match register {
            Register::Ix => self.ix,
            Register::Iy => self.iy,
            _ => {
                let bank = if register.bank() == BankKind::Shadow {
                    &self.shadow
                } else {
                    &self.main
                };
                // Every non-index register has an 8-bit name
                register.reg8().map_or(0, |reg| bank.get(reg) as u16)
            }
        }
    }

    /// Copy of this snapshot with one location replaced
    ///
    /// 8-bit registers take the low byte of `value`.
    pub fn with(mut self, register: Register, value: u16) -> Self {
        match (register, register.reg8()) {
            (Register::Ix, _) => self.ix = value,
            (Register::Iy, _) => self.iy = value,
            (_, Some(reg)) if register.bank() == BankKind::Shadow => {
                self.shadow.set(reg, value as u8)
            }
            (_, Some(reg)) => self.main.set(reg, value as u8),
            (_, None) => {}
        }
        self
    }

    /// Mask of every location whose value differs in `after`
    pub fn diff(&self, after: &RegisterFile) -> RegisterMask {
        let main = self.main.changed(&after.main).map(Reg8::main);
        let shadow = self.shadow.changed(&after.shadow).map(Reg8::shadow);
        let ix = (self.ix != after.ix).then_some(Register::Ix);
        let iy = (self.iy != after.iy).then_some(Register::Iy);

        main.chain(shadow).chain(ix).chain(iy).collect()
    }
}

/// Register dump in pair notation, e.g. `AF=12C5 BC=...`
impl fmt::Display for RegisterFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs = |bank: &Bank| {
            [
                Bank::pair(bank.a, bank.f),
                Bank::pair(bank.b, bank.c),
                Bank::pair(bank.d, bank.e),
                Bank::pair(bank.h, bank.l),
            ]
        };
        let [af, bc, de, hl] = pairs(&self.main);
        let [af2, bc2, de2, hl2] = pairs(&self.shadow);

        write!(
            f,
            "AF={:04X} BC={:04X} DE={:04X} HL={:04X} \
             AF'={:04X} BC'={:04X} DE'={:04X} HL'={:04X} \
             IX={:04X} IY={:04X}",
            af, bc, de, hl, af2, bc2, de2, hl2, self.ix, self.iy
        )
    }
}

/// Changed-register mask between two snapshots
///
/// # Arguments
///
/// * `before` - Snapshot taken before the code under test ran
/// * `after` - Snapshot taken afterwards
///
/// # Returns
///
/// One bit set per location whose value differs. Identical snapshots give
/// the empty mask.
#[inline]
pub fn diff(before: &RegisterFile, after: &RegisterFile) -> RegisterMask {
    before.diff(after)
}
