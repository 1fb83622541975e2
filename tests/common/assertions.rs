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

//! Custom assertions for register-change testing

use regdiff::core::register::RegisterMask;
use regdiff::core::snapshot::RegisterFile;
use regdiff::core::verify::verify;

/// Assert a mask encodes to the expected layout bytes
#[allow(dead_code)]
pub fn assert_mask_bytes(mask: RegisterMask, expected: [u8; 3]) {
    let actual = mask.to_bytes();
    assert_eq!(
        actual, expected,
        "Mask \"{}\" mismatch: expected {:02X?}, got {:02X?}",
        mask, expected, actual
    );
}

/// Assert exactly the registers in `spec` changed
#[allow(dead_code)]
pub fn assert_changed(before: &RegisterFile, after: &RegisterFile, spec: &str) {
    let verdict = verify(spec, before, after).expect("Fixture spec is malformed");
    if let Some(mismatch) = verdict.mismatch() {
        panic!(
            "Register check {:?} failed: {}\nbefore: {}\nafter:  {}",
            spec, mismatch, before, after
        );
    }
}
