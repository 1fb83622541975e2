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

//! Register-change spec parser
//!
//! A spec string names the registers a test expects to change, written as
//! register tokens with no separators: `"acehixa'c'e'h'"`. Parsing folds the
//! tokens into a [`RegisterMask`] with bitwise OR, so naming a register twice
//! is the same as naming it once.
//!
//! ## Tokenization
//!
//! The scan runs left to right. At each position it tries, in order:
//!
//! 1. `ix` / `iy` (two characters)
//! 2. a main register letter, followed by an optional `'` shadow marker
//!
//! Anything else aborts the parse. The partial mask is discarded, so a
//! malformed spec can never be mistaken for the empty spec `""`.

use std::iter::FusedIterator;

use crate::core::error::SpecError;
use crate::core::register::{Reg8, Register, RegisterMask};


/// Shadow-bank marker
const PRIME: char = '\'';

/// Parse a spec string into a register mask
///
/// # Arguments
///
/// * `text` - Spec string, possibly empty
///
/// # Returns
///
/// - `Ok(mask)` with one bit per named register (empty mask for `""`)
/// - `Err(SpecError)` at the first character that starts no valid token
///
/// # Example
/// ```
/// use regdiff::core::spec::parse_spec;
///
/// let mask = parse_spec("acehixa'c'e'h'").unwrap();
/// assert_eq!(mask.to_bytes(), [0x96, 0x59, 0x02]);
///
/// assert!(parse_spec("").unwrap().is_empty());
/// assert!(parse_spec("abcdefg").is_err());
/// ```
pub fn parse_spec(text: &str) -> Result<RegisterMask, SpecError> {
    Tokens::new(text).try_fold(RegisterMask::empty(), |mask, token| {
        token.map(|register| mask | register.mask())
    })
}

/// Iterator over the register tokens of a spec string
///
/// Yields one `Ok(Register)` per token. On a malformed position it yields a
/// single `Err` and then ends.
///
/// # Example
/// ```
/// use regdiff::core::register::Register;
/// use regdiff::core::spec::Tokens;
///
/// let tokens: Result<Vec<_>, _> = Tokens::new("ixb'").collect();
/// assert_eq!(tokens.unwrap(), vec![Register::Ix, Register::BPrime]);
/// ```
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    text: &'a str,
    offset: usize,
    failed: bool,
}

impl<'a> Tokens<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            offset: 0,
            failed: false,
        }
    }

    /// Byte offset of the next token
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Match one token at the start of `rest` (whose first char is `ch`),
    /// returning it and its byte length
    fn token_at(&self, rest: &str, ch: char) -> Result<(Register, usize), SpecError> {
        if rest.starts_with("ix") {
            return Ok((Register::Ix, 2));
        }
        if rest.starts_with("iy") {
            return Ok((Register::Iy, 2));
        }

        if ch == PRIME {
            return Err(SpecError::StrayPrime {
                offset: self.offset,
            });
        }

        match Reg8::from_letter(ch) {
            Some(reg) if rest[1..].starts_with(PRIME) => Ok((reg.shadow(), 2)),
            Some(reg) => Ok((reg.main(), 1)),
            None => Err(SpecError::UnexpectedChar {
                ch,
                offset: self.offset,
            }),
        }
    }
}

impl Iterator for Tokens<'_> {
    type Item = Result<Register, SpecError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let rest = &self.text[self.offset..];
        let ch = rest.chars().next()?;

        match self.token_at(rest, ch) {
            Ok((register, len)) => {
                self.offset += len;
                Some(Ok(register))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for Tokens<'_> {}
