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

//! Simulated Z80 register file
//!
//! The machine keeps both register banks plus IX and IY, but only one set
//! is "in view" at a time, as on hardware:
//!
//! - `ex af, af'` swaps which A/F pair is in view
//! - `exx` swaps which BC/DE/HL set is in view
//!
//! The two swaps are independent, so a machine can have the primary AF in
//! view alongside the alternate BC/DE/HL.
//!
//! Reading the out-of-view bank means swapping it into view. Snapshot
//! capture does that under an [`ExclusiveAccess`] guard, which disables
//! interrupts for its lifetime and restores both bank selectors and both
//! interrupt flip-flops when dropped, on every exit path including
//! unwinding. Capturing a snapshot therefore leaves no observable trace on
//! the machine.
//!
//! # Example
//! ```
//! use regdiff::core::machine::Machine;
//! use regdiff::core::register::{Reg8, RegisterMask};
//!
//! let mut machine = Machine::new();
//! machine.ei();
//!
//! let before = machine.capture();
//! machine.exx();
//! machine.set_reg(Reg8::B, 0x55); // writes B' via the swapped view
//! machine.exx();
//! let after = machine.capture();
//!
//! assert_eq!(before.diff(&after), RegisterMask::B_PRIME);
//! assert!(machine.interrupts_enabled());
//! ```

use std::ops::{Deref, DerefMut};

use crate::core::register::{BankKind, Reg8, Register, RegisterMask};
use crate::core::snapshot::{Bank, RegisterFile};

#[cfg(test)]
mod tests;

/// Simulated Z80 register file with bank selectors and interrupt state
#[derive(Debug, Clone)]
pub struct Machine {
    /// Physical banks; which one a register reads from depends on the selectors
    banks: [Bank; 2],

    /// Bank whose A/F are in view
    af_sel: usize,

    /// Bank whose B/C/D/E/H/L are in view
    gp_sel: usize,

    ix: u16,
    iy: u16,

    /// Interrupt enable flip-flops
    iff1: bool,
    iff2: bool,
}

impl Machine {
    /// Create a machine in its reset state
    ///
    /// All registers are zero, the primary banks are in view and interrupts
    /// are disabled.
    pub fn new() -> Self {
        Self {
            banks: [Bank::default(); 2],
            af_sel: 0,
            gp_sel: 0,
            ix: 0,
            iy: 0,
            iff1: false,
            iff2: false,
        }
    }

    /// Create a machine whose registers hold the given snapshot
    ///
    /// The snapshot's main bank is placed in view.
    pub fn with_registers(file: &RegisterFile) -> Self {
        let mut machine = Self::new();
        machine.restore(file);
        machine
    }

    #[inline(always)]
    fn sel(&self, reg: Reg8) -> usize {
        if reg.is_af() {
            self.af_sel
        } else {
            self.gp_sel
        }
    }

    /// Read an 8-bit register from the bank in view
    #[inline(always)]
    pub fn reg(&self, reg: Reg8) -> u8 {
        self.banks[self.sel(reg)].get(reg)
    }

    /// Write an 8-bit register in the bank in view
    #[inline(always)]
    pub fn set_reg(&mut self, reg: Reg8, value: u8) {
        let sel = self.sel(reg);
        self.banks[sel].set(reg, value);
    }

    #[inline(always)]
    pub fn ix(&self) -> u16 {
        self.ix
    }

    #[inline(always)]
    pub fn set_ix(&mut self, value: u16) {
        self.ix = value;
    }

    #[inline(always)]
    pub fn iy(&self) -> u16 {
        self.iy
    }

    #[inline(always)]
    pub fn set_iy(&mut self, value: u16) {
        self.iy = value;
    }

    /// `ex af, af'`
    pub fn ex_af(&mut self) {
        self.af_sel ^= 1;
    }

    /// `exx`
    pub fn exx(&mut self) {
        self.gp_sel ^= 1;
    }

    /// `di`
    pub fn di(&mut self) {
        self.iff1 = false;
        self.iff2 = false;
    }

    /// `ei`
    pub fn ei(&mut self) {
        self.iff1 = true;
        self.iff2 = true;
    }

    pub fn interrupts_enabled(&self) -> bool {
        self.iff1
    }

    /// Whether the primary A/F and BC/DE/HL are both in view
    pub fn primary_in_view(&self) -> bool {
        self.af_sel == 0 && self.gp_sel == 0
    }

    /// Acquire exclusive access to the register file
    ///
    /// Interrupts are disabled until the returned guard is dropped. Dropping
    /// the guard restores the bank selectors and interrupt flip-flops to
    /// the values they had here, whatever happened in between.
    pub fn exclusive(&mut self) -> ExclusiveAccess<'_> {
        ExclusiveAccess::acquire(self)
    }

    /// The bank currently in view
    pub fn capture_main_bank(&self) -> Bank {
        let mut bank = Bank::default();
        for reg in Reg8::ALL {
            bank.set(reg, self.reg(reg));
        }
        bank
    }

    /// The bank currently out of view
    pub fn capture_shadow_bank(&mut self) -> Bank {
        let mut access = self.exclusive();
        access.swap_banks();
        access.capture_main_bank()
    }

    /// `(IX, IY)`
    pub fn capture_index_registers(&mut self) -> (u16, u16) {
        let access = self.exclusive();
        (access.ix, access.iy)
    }

    /// Snapshot the whole register file
    ///
    /// The machine's bank selectors and interrupt state are the same after
    /// the call as before it.
    pub fn capture(&mut self) -> RegisterFile {
        let mut access = self.exclusive();
        let main = access.capture_main_bank();
        access.swap_banks();
        let shadow = access.capture_main_bank();
        RegisterFile::new(main, shadow, access.ix, access.iy)
    }

    /// Load a snapshot back into the register file
    ///
    /// The snapshot's main bank goes into the bank in view, its shadow bank
    /// into the bank out of view.
    pub fn restore(&mut self, file: &RegisterFile) {
        let mut access = self.exclusive();
        access.load_view(&file.main);
        access.swap_banks();
        access.load_view(&file.shadow);
        access.ix = file.ix;
        access.iy = file.iy;
    }

    /// Bitwise-complement one register location
    pub fn complement(&mut self, register: Register) {
        match (register.bank(), register.reg8()) {
            (BankKind::Main, Some(reg)) => {
                let value = self.reg(reg);
                self.set_reg(reg, !value);
            }
            (BankKind::Shadow, Some(reg)) => {
                let mut access = self.exclusive();
                access.swap_banks();
                let value = access.reg(reg);
                access.set_reg(reg, !value);
            }
            _ if register == Register::Ix => self.ix = !self.ix,
            _ => self.iy = !self.iy,
        }
    }

    /// Bitwise-complement every register in `mask`
    pub fn complement_all(&mut self, mask: RegisterMask) {
        for register in mask.registers() {
            self.complement(register);
        }
    }

    fn load_view(&mut self, bank: &Bank) {
        for reg in Reg8::ALL {
            self.set_reg(reg, bank.get(reg));
        }
    }

    /// `ex af, af'` followed by `exx`
    fn swap_banks(&mut self) {
        self.ex_af();
        self.exx();
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

/// Saved selector and interrupt state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ViewState {
    af_sel: usize,
    gp_sel: usize,
    iff1: bool,
    iff2: bool,
}

/// Scoped exclusive access to a [`Machine`]
///
/// Derefs to the machine, so bank swaps and register writes work as usual
/// while the guard is held.
///
/// # Example
/// ```
/// use regdiff::core::machine::Machine;
/// use regdiff::core::register::Reg8;
///
/// let mut machine = Machine::new();
/// machine.ei();
/// {
///     let mut access = machine.exclusive();
///     assert!(!access.interrupts_enabled());
///     access.ex_af();
///     access.set_reg(Reg8::A, 0x7F); // A'
/// }
/// assert!(machine.interrupts_enabled());
/// assert_eq!(machine.reg(Reg8::A), 0);
/// assert_eq!(machine.capture().shadow.a, 0x7F);
/// ```
pub struct ExclusiveAccess<'a> {
    machine: &'a mut Machine,
    saved: ViewState,
}

impl<'a> ExclusiveAccess<'a> {
    fn acquire(machine: &'a mut Machine) -> Self {
        let saved = ViewState {
            af_sel: machine.af_sel,
            gp_sel: machine.gp_sel,
            iff1: machine.iff1,
            iff2: machine.iff2,
        };
        machine.di();
        log::trace!("Register file acquired (iff1={})", saved.iff1);
        Self { machine, saved }
    }
}

impl Deref for ExclusiveAccess<'_> {
    type Target = Machine;

    fn deref(&self) -> &Machine {
        self.machine
    }
}

impl DerefMut for ExclusiveAccess<'_> {
    fn deref_mut(&mut self) -> &mut Machine {
        self.machine
    }
}

impl Drop for ExclusiveAccess<'_> {
    fn drop(&mut self) {
        self.machine.af_sel = self.saved.af_sel;
        self.machine.gp_sel = self.saved.gp_sel;
        self.machine.iff1 = self.saved.iff1;
        self.machine.iff2 = self.saved.iff2;
        log::trace!("Register file released (iff1={})", self.saved.iff1);
    }
}
