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

use super::super::*;

#[test]
fn test_byte0_holds_main_bank() {
    let expected = [
        (Register::F, 0x01),
        (Register::A, 0x02),
        (Register::C, 0x04),
        (Register::B, 0x08),
        (Register::E, 0x10),
        (Register::D, 0x20),
        (Register::L, 0x40),
        (Register::H, 0x80),
    ];

    for (register, byte) in expected {
        assert_eq!(register.mask().to_bytes(), [byte, 0, 0], "{}", register);
    }
}

#[test]
fn test_byte1_holds_index_and_shadow() {
    let expected = [
        (Register::Ix, 0x01),
        (Register::Iy, 0x02),
        (Register::FPrime, 0x04),
        (Register::APrime, 0x08),
        (Register::CPrime, 0x10),
        (Register::BPrime, 0x20),
        (Register::EPrime, 0x40),
        (Register::DPrime, 0x80),
    ];

    for (register, byte) in expected {
        assert_eq!(register.mask().to_bytes(), [0, byte, 0], "{}", register);
    }
}

#[test]
fn test_byte2_holds_l_and_h_prime() {
    assert_eq!(Register::LPrime.mask().to_bytes(), [0, 0, 0x01]);
    assert_eq!(Register::HPrime.mask().to_bytes(), [0, 0, 0x02]);
}

#[test]
fn test_bits_are_unique() {
    let union: RegisterMask = Register::ALL.into_iter().collect();
    assert_eq!(union, RegisterMask::all());
    assert_eq!(union.bits().count_ones(), 18);
    assert_eq!(union.to_bytes(), [0xFF, 0xFF, 0x03]);
}

#[test]
fn test_all_is_in_bit_order() {
    for (index, register) in Register::ALL.iter().enumerate() {
        assert_eq!(register.bit() as usize, index);
    }
}

#[test]
fn test_group_constants() {
    assert_eq!(RegisterMask::MAIN.to_bytes(), [0xFF, 0x00, 0x00]);
    assert_eq!(RegisterMask::INDEX.to_bytes(), [0x00, 0x03, 0x00]);
    assert_eq!(RegisterMask::SHADOW.to_bytes(), [0x00, 0xFC, 0x03]);
}

#[test]
fn test_from_bytes() {
    let mask = RegisterMask::from_bytes([0x96, 0x59, 0x02]).unwrap();
    assert_eq!(mask.to_bytes(), [0x96, 0x59, 0x02]);
    assert_eq!(RegisterMask::from_bytes([0, 0, 0]), Some(RegisterMask::empty()));
}

#[test]
fn test_from_bytes_rejects_undefined_bits() {
    assert_eq!(RegisterMask::from_bytes([0, 0, 0x04]), None);
    assert_eq!(RegisterMask::from_bytes([0, 0, 0x80]), None);
}

#[test]
fn test_registers_iterate_in_bit_order() {
    let mask = RegisterMask::H_PRIME | RegisterMask::A | RegisterMask::IY;
    let registers: Vec<_> = mask.registers().collect();
    assert_eq!(registers, vec![Register::A, Register::Iy, Register::HPrime]);
}

#[test]
fn test_display_is_canonical() {
    assert_eq!(RegisterMask::MAIN.to_string(), "facbedlh");
    assert_eq!(RegisterMask::empty().to_string(), "");
    assert_eq!(
        RegisterMask::all().to_string(),
        "facbedlhixiyf'a'c'b'e'd'l'h'"
    );
}

#[test]
fn test_display_parses_back() {
    let mask = RegisterMask::from_bytes([0x96, 0x59, 0x02]).unwrap();
    let reparsed: RegisterMask = mask.to_string().parse().unwrap();
    assert_eq!(reparsed, mask);
}

#[test]
fn test_default_is_empty() {
    assert!(RegisterMask::default().is_empty());
}
