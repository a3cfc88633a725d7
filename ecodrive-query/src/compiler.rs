// Copyright 2025 Ecodrive Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Full-text search-query compiler
//!
//! Rewrites an arbitrary user query into the boolean prefix expression the
//! text-search index evaluates. Every token matches prefix-wise; tokens
//! that look like class names are aliased to both their literal form and
//! their year-prefixed canonical form, so "3B Iv" observed on 2020-10-10
//! finds pupils indexed under "2018B".
//!
//! One disallowed character anywhere aborts the whole query to the empty
//! string, which the index treats as "match nothing".

use crate::token::{classify, TokenKind};
use chrono::{DateTime, Utc};

/// Compile a user query relative to the observation date.
///
/// Tokens are split on whitespace runs and emitted in input order, without
/// deduplication, joined by ` & `:
///
/// - ordinary token `T` becomes `T:*`
/// - class-shaped `T` with letter `L` and formation year `Y` becomes
///   `(T:* | YL:*)` (the alias letter is the parse-returned uppercase one)
/// - digits-only class-shaped `T` becomes `(T:* | Y:*)`
///
/// The empty query compiles to the empty string; so does any query with an
/// invalid token.
pub fn compile(query: &str, observed: DateTime<Utc>) -> String {
    let mut terms: Vec<String> = Vec::new();
    for token in query.split_whitespace() {
        match classify(token, observed) {
            TokenKind::Invalid => return String::new(),
            TokenKind::Class {
                letter: Some(letter),
                formation_year,
            } => terms.push(format!("({token}:* | {formation_year}{letter}:*)")),
            TokenKind::Class {
                letter: None,
                formation_year,
            } => terms.push(format!("({token}:* | {formation_year}:*)")),
            TokenKind::Other => terms.push(format!("{token}:*")),
        }
    }
    terms.join(" & ")
}
