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

use super::*;
use crate::core::error::SpecError;
use crate::core::register::{Reg8, Register};

fn a_changed() -> (RegisterFile, RegisterFile) {
    let before = RegisterFile::default().with(Register::A, 0x3C);
    let after = before.with(Register::A, !0x3C);
    (before, after)
}

#[test]
fn test_named_change_passes() {
    let (before, after) = a_changed();
    assert_eq!(verify("a", &before, &after).unwrap(), Verdict::Pass);
}

#[test]
fn test_unnamed_change_fails() {
    let (before, after) = a_changed();
    let verdict = verify("", &before, &after).unwrap();
    let mismatch = verdict.mismatch().unwrap();
    assert_eq!(mismatch.expected, RegisterMask::empty());
    assert_eq!(mismatch.actual, RegisterMask::A);
    assert_eq!(mismatch.unexpected(), RegisterMask::A);
    assert!(mismatch.missing().is_empty());
}

#[test]
fn test_named_but_unchanged_fails() {
    let (before, after) = a_changed();
    let mismatch = *verify("ab", &before, &after).unwrap().mismatch().unwrap();
    assert_eq!(mismatch.missing(), RegisterMask::B);
    assert!(mismatch.unexpected().is_empty());
}

#[test]
fn test_superset_and_subset_both_fail() {
    let before = RegisterFile::default();
    let after = before.with(Register::H, 1).with(Register::L, 1);
    assert!(!verify("h", &before, &after).unwrap().is_pass());
    assert!(!verify("hlb", &before, &after).unwrap().is_pass());
    assert!(verify("lh", &before, &after).unwrap().is_pass());
}

#[test]
fn test_no_change_with_empty_spec_passes() {
    let s = RegisterFile::default();
    assert!(verify("", &s, &s).unwrap().is_pass());
}

#[test]
fn test_malformed_spec_is_configuration_error() {
    let (before, after) = a_changed();
    match verify("ag", &before, &after) {
        Err(HarnessError::Configuration { spec, source }) => {
            assert_eq!(spec, "ag");
            assert_eq!(source, SpecError::UnexpectedChar { ch: 'g', offset: 1 });
        }
        other => panic!("expected configuration error, got {:?}", other),
    }
}

#[test]
fn test_malformed_spec_not_confused_with_empty() {
    // Nothing changed, so an empty expectation would pass
    let s = RegisterFile::default();
    assert!(verify("g", &s, &s).is_err());
}

#[test]
fn test_mismatch_display() {
    let mismatch = Mismatch {
        expected: RegisterMask::A | RegisterMask::B,
        actual: RegisterMask::A | RegisterMask::IX,
    };
    assert_eq!(
        mismatch.to_string(),
        "expected \"ab\", changed \"aix\"; unexpected \"ix\"; missing \"b\""
    );
}

#[test]
fn test_mismatch_serializes_as_spec_strings() {
    let mismatch = Mismatch {
        expected: RegisterMask::empty(),
        actual: RegisterMask::F_PRIME | RegisterMask::A_PRIME,
    };
    let json = serde_json::to_string(&mismatch).unwrap();
    assert_eq!(json, r#"{"expected":"","actual":"f'a'"}"#);
}

#[test]
fn test_expectation_flow() {
    let mut machine = Machine::new();
    let armed = Expectation::parse("ixb'").unwrap().save(&mut machine);

    machine.set_ix(0x8000);
    machine.exx();
    machine.set_reg(Reg8::B, 0x01);
    machine.exx();

    assert!(armed.check(&mut machine).is_pass());
}

#[test]
fn test_expectation_reports_mismatch() {
    let mut machine = Machine::new();
    let armed = Expectation::new(RegisterMask::empty()).save(&mut machine);
    machine.complement(Register::E);

    let verdict = armed.check(&mut machine);
    assert_eq!(verdict.mismatch().unwrap().actual, RegisterMask::E);
}

#[test]
fn test_expectation_rejects_malformed_spec() {
    assert!(matches!(
        Expectation::parse("ix'"),
        Err(HarnessError::Configuration { .. })
    ));
}

#[test]
fn test_armed_keeps_before_snapshot() {
    let mut machine = Machine::new();
    machine.set_reg(Reg8::D, 0x99);
    let armed = Expectation::parse("d").unwrap().save(&mut machine);
    assert_eq!(armed.before().main.d, 0x99);
}
