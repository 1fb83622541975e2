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

//! Register names and the 24-bit register mask layout
//!
//! Every register location of the Z80 register file has one name and one
//! bit in a [`RegisterMask`]. The parser, the snapshot differ and every
//! diagnostic use the same table below, so a mask always decodes to the
//! names that produced it.
//!
//! ## Mask Layout (byte.bit, LSB first per byte)
//!
//! ```text
//! Byte | Bit0 | Bit1 | Bit2 | Bit3 | Bit4 | Bit5 | Bit6 | Bit7
//! -----|------|------|------|------|------|------|------|-----
//! 0    | F    | A    | C    | B    | E    | D    | L    | H
//! 1    | IX   | IY   | F'   | A'   | C'   | B'   | E'   | D'
//! 2    | L'   | H'   | -    | -    | -    | -    | -    | -
//! ```
//!
//! ## Tokens
//!
//! Main registers are single lowercase letters (`a`, `f`, `b`, `c`, `d`,
//! `e`, `h`, `l`), shadow registers add a trailing apostrophe (`a'`), and
//! the index registers are `ix` and `iy`.

use bitflags::bitflags;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::core::error::SpecError;

#[cfg(test)]
mod tests;

/// One of the eight 8-bit register names of a bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg8 {
    A,
    F,
    B,
    C,
    D,
    E,
    H,
    L,
}

impl Reg8 {
    /// All bank registers in conventional order
    pub const ALL: [Reg8; 8] = [
        Reg8::A,
        Reg8::F,
        Reg8::B,
        Reg8::C,
        Reg8::D,
        Reg8::E,
        Reg8::H,
        Reg8::L,
    ];

    /// Look up a register by its lowercase letter
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'a' => Some(Reg8::A),
            'f' => Some(Reg8::F),
            'b' => Some(Reg8::B),
            'c' => Some(Reg8::C),
            'd' => Some(Reg8::D),
            'e' => Some(Reg8::E),
            'h' => Some(Reg8::H),
            'l' => Some(Reg8::L),
            _ => None,
        }
    }

    /// The main-bank register with this name
    pub fn main(self) -> Register {
        match self {
            Reg8::A => Register::A,
            Reg8::F => Register::F,
            Reg8::B => Register::B,
            Reg8::C => Register::C,
            Reg8::D => Register::D,
            Reg8::E => Register::E,
            Reg8::H => Register::H,
            Reg8::L => Register::L,
        }
    }

    /// The shadow-bank register with this name
    pub fn shadow(self) -> Register {
        match self {
            Reg8::A => Register::APrime,
            Reg8::F => Register::FPrime,
            Reg8::B => Register::BPrime,
            Reg8::C => Register::CPrime,
            Reg8::D => Register::DPrime,
            Reg8::E => Register::EPrime,
            Reg8::H => Register::HPrime,
            Reg8::L => Register::LPrime,
        }
    }

    /// True for A and F, which `ex af, af'` swaps
    #[inline]
    pub fn is_af(self) -> bool {
        matches!(self, Reg8::A | Reg8::F)
    }
}

/// Which part of the register file a location belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankKind {
    Main,
    Shadow,
    Index,
}

/// A named register location
///
/// The discriminant is the location's bit index in a [`RegisterMask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Register {
    F = 0,
    A = 1,
    C = 2,
    B = 3,
    E = 4,
    D = 5,
    L = 6,
    H = 7,
    Ix = 8,
    Iy = 9,
    FPrime = 10,
    APrime = 11,
    CPrime = 12,
    BPrime = 13,
    EPrime = 14,
    DPrime = 15,
    LPrime = 16,
    HPrime = 17,
}

impl Register {
    /// All locations in bit order
    pub const ALL: [Register; 18] = [
        Register::F,
        Register::A,
        Register::C,
        Register::B,
        Register::E,
        Register::D,
        Register::L,
        Register::H,
        Register::Ix,
        Register::Iy,
        Register::FPrime,
        Register::APrime,
        Register::CPrime,
        Register::BPrime,
        Register::EPrime,
        Register::DPrime,
        Register::LPrime,
        Register::HPrime,
    ];

    /// Bit index of this register in a [`RegisterMask`]
    #[inline(always)]
    pub fn bit(self) -> u8 {
        self as u8
    }

    /// Single-register mask
    #[inline(always)]
    pub fn mask(self) -> RegisterMask {
        RegisterMask::from_bits_retain(1 << self.bit())
    }

    /// Spec-string token for this register
    pub fn token(self) -> &'static str {
        match self {
            Register::F => "f",
            Register::A => "a",
            Register::C => "c",
            Register::B => "b",
            Register::E => "e",
            Register::D => "d",
            Register::L => "l",
            Register::H => "h",
            Register::Ix => "ix",
            Register::Iy => "iy",
            Register::FPrime => "f'",
            Register::APrime => "a'",
            Register::CPrime => "c'",
            Register::BPrime => "b'",
            Register::EPrime => "e'",
            Register::DPrime => "d'",
            Register::LPrime => "l'",
            Register::HPrime => "h'",
        }
    }

    /// Exact token lookup
    ///
    /// # Example
    /// ```
    /// use regdiff::core::register::Register;
    ///
    /// assert_eq!(Register::from_token("ix"), Some(Register::Ix));
    /// assert_eq!(Register::from_token("h'"), Some(Register::HPrime));
    /// assert_eq!(Register::from_token("g"), None);
    /// ```
    pub fn from_token(token: &str) -> Option<Self> {
        Register::ALL.into_iter().find(|r| r.token() == token)
    }

    /// Which part of the register file this location lives in
    pub fn bank(self) -> BankKind {
        match self.bit() {
            0..=7 => BankKind::Main,
            8 | 9 => BankKind::Index,
            _ => BankKind::Shadow,
        }
    }

    /// The 8-bit name of a main or shadow register, `None` for IX/IY
    pub fn reg8(self) -> Option<Reg8> {
        match self {
            Register::A | Register::APrime => Some(Reg8::A),
            Register::F | Register::FPrime => Some(Reg8::F),
            Register::B | Register::BPrime => Some(Reg8::B),
            Register::C | Register::CPrime => Some(Reg8::C),
            Register::D | Register::DPrime => Some(Reg8::D),
            Register::E | Register::EPrime => Some(Reg8::E),
            Register::H | Register::HPrime => Some(Reg8::H),
            Register::L | Register::LPrime => Some(Reg8::L),
            Register::Ix | Register::Iy => None,
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

bitflags! {
    /// Set of register locations, one bit per register
    ///
    /// Masks compose with `|` and must be compared with `==`: an expected
    /// mask matches an actual one only when they are identical.
    ///
    /// # Example
    /// ```
    /// use regdiff::core::register::RegisterMask;
    ///
    /// let mask = RegisterMask::A | RegisterMask::IX | RegisterMask::H_PRIME;
    /// assert_eq!(mask.to_bytes(), [0x02, 0x01, 0x02]);
    /// assert_eq!(mask.to_string(), "aixh'");
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RegisterMask: u32 {
        const F = 1 << 0;
        const A = 1 << 1;
        const C = 1 << 2;
        const B = 1 << 3;
        const E = 1 << 4;
        const D = 1 << 5;
        const L = 1 << 6;
        const H = 1 << 7;
        const IX = 1 << 8;
        const IY = 1 << 9;
        const F_PRIME = 1 << 10;
        const A_PRIME = 1 << 11;
        const C_PRIME = 1 << 12;
        const B_PRIME = 1 << 13;
        const E_PRIME = 1 << 14;
        const D_PRIME = 1 << 15;
        const L_PRIME = 1 << 16;
        const H_PRIME = 1 << 17;

        const MAIN = 0x0000_00FF;
        const INDEX = 0x0000_0300;
        const SHADOW = 0x0003_FC00;
    }
}

impl RegisterMask {
    /// Encode as the 3-byte layout `[byte0, byte1, byte2]`
    #[inline]
    pub fn to_bytes(self) -> [u8; 3] {
        let [b0, b1, b2, _] = self.bits().to_le_bytes();
        [b0, b1, b2]
    }

    /// Decode the 3-byte layout
    ///
    /// Returns `None` if any bit outside the 18 register bits is set.
    #[inline]
    pub fn from_bytes(bytes: [u8; 3]) -> Option<Self> {
        Self::from_bits(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], 0]))
    }

    /// Registers in this mask, in bit order
    pub fn registers(self) -> impl Iterator<Item = Register> {
        Register::ALL
            .into_iter()
            .filter(move |r| self.contains(r.mask()))
    }
}

impl Default for RegisterMask {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Register> for RegisterMask {
    fn from(register: Register) -> Self {
        register.mask()
    }
}

impl FromIterator<Register> for RegisterMask {
    fn from_iter<I: IntoIterator<Item = Register>>(iter: I) -> Self {
        iter.into_iter()
            .fold(RegisterMask::empty(), |mask, r| mask | r.mask())
    }
}

/// Canonical rendering: tokens concatenated in bit order
impl fmt::Display for RegisterMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for register in self.registers() {
            f.write_str(register.token())?;
        }
        Ok(())
    }
}

impl FromStr for RegisterMask {
    type Err = SpecError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        crate::core::spec::parse_spec(s)
    }
}

impl Serialize for RegisterMask {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RegisterMask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}
