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

//! Property tests for the spec parser and the snapshot differ

use proptest::prelude::*;
use regdiff::core::register::{Register, RegisterMask};
use regdiff::core::snapshot::{diff, Bank, RegisterFile};
use regdiff::core::spec::parse_spec;

fn register() -> impl Strategy<Value = Register> {
    (0..Register::ALL.len()).prop_map(|i| Register::ALL[i])
}

fn bank() -> impl Strategy<Value = Bank> {
    any::<[u8; 8]>().prop_map(|v| Bank {
        a: v[0],
        f: v[1],
        b: v[2],
        c: v[3],
        d: v[4],
        e: v[5],
        h: v[6],
        l: v[7],
    })
}

fn register_file() -> impl Strategy<Value = RegisterFile> {
    (bank(), bank(), any::<u16>(), any::<u16>())
        .prop_map(|(main, shadow, ix, iy)| RegisterFile::new(main, shadow, ix, iy))
}

fn spec_of(registers: &[Register]) -> String {
    registers.iter().map(|r| r.token()).collect()
}

proptest! {
    #[test]
    fn duplicate_token_is_idempotent(r in register()) {
        let once = parse_spec(r.token()).unwrap();
        let twice = parse_spec(&format!("{0}{0}", r.token())).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn each_token_sets_one_bit(r in register()) {
        let mask = parse_spec(r.token()).unwrap();
        prop_assert_eq!(mask.bits().count_ones(), 1);
        prop_assert_eq!(mask, r.mask());
    }

    #[test]
    fn order_does_not_matter(
        registers in proptest::sample::subsequence(Register::ALL.to_vec(), 0..=18)
            .prop_shuffle()
    ) {
        let shuffled = parse_spec(&spec_of(&registers)).unwrap();
        let sorted: RegisterMask = registers.iter().copied().collect();
        prop_assert_eq!(shuffled, sorted);
    }

    #[test]
    fn rendering_parses_back(bits in 0u32..(1 << 18)) {
        let mask = RegisterMask::from_bits_retain(bits);
        prop_assert_eq!(parse_spec(&mask.to_string()).unwrap(), mask);
    }

    #[test]
    fn parser_never_panics(text in "[a-z' ]{0,24}") {
        let _ = parse_spec(&text);
    }

    #[test]
    fn diff_of_snapshot_with_itself_is_empty(s in register_file()) {
        prop_assert!(diff(&s, &s).is_empty());
    }

    #[test]
    fn diff_reports_exactly_the_changed_register(
        s in register_file(),
        r in register(),
        delta in 1u16..=0xFF
    ) {
        let after = s.with(r, s.value(r) ^ delta);
        prop_assert_eq!(diff(&s, &after), r.mask());
    }

    #[test]
    fn diff_is_symmetric(a in register_file(), b in register_file()) {
        prop_assert_eq!(diff(&a, &b), diff(&b, &a));
    }
}
