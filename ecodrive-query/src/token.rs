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

//! Token classification for search queries
//!
//! Decides whether a whitespace-delimited token is class-shaped, an
//! ordinary prefix term, or carries characters the downstream search
//! engine must never see.

use chrono::{DateTime, Utc};
use ecodrive_core::parse_class_name;
use serde::{Deserialize, Serialize};

/// Classification outcome for one query token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TokenKind {
    /// Contains a disallowed character; poisons the whole query
    Invalid,
    /// Starts with a digit and parses as a class name on the observation
    /// date. The letter is absent for digits-only tokens.
    Class {
        letter: Option<char>,
        formation_year: i32,
    },
    /// Ordinary alphanumeric prefix term
    Other,
}

/// Characters a token may carry: Unicode letters and digits, apostrophe
/// and hyphen (both occur in real pupil names).
fn is_allowed(c: char) -> bool {
    c.is_alphabetic() || c.is_numeric() || c == '\'' || c == '-'
}

/// Classify one token relative to the observation date.
///
/// Class-name parse failures are swallowed: a token that merely looks
/// numeric ("213bas", "12") is an ordinary search term, not an error.
pub fn classify(token: &str, observed: DateTime<Utc>) -> TokenKind {
    if token.chars().any(|c| !is_allowed(c)) {
        return TokenKind::Invalid;
    }
    if token.chars().next().is_some_and(|c| c.is_numeric()) {
        if let Ok(parsed) = parse_class_name(token, observed) {
            return TokenKind::Class {
                letter: parsed.letter,
                formation_year: parsed.formation_year,
            };
        }
    }
    TokenKind::Other
}
