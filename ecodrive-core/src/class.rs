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

//! Date-relative class naming
//!
//! A class is persisted as a (letter, formation date) pair; the displayed
//! name ("3B", "11A") is a pure function of the observation date. Rendering
//! counts whole 365-day years since formation (ceiling, no leap
//! compensation), parsing reconstructs the formation year from the grade and
//! the September 1 school-year pivot. The two directions round-trip for any
//! observation date on which rendering succeeds.

use crate::error::{EcodriveError, Result};
use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A school year is exactly 365 * 24 hours of wall-clock time.
/// Leap days are deliberately not compensated; parsing pivots on the
/// calendar instead, which keeps the round-trip stable.
const YEAR_SECS: i64 = 365 * 24 * 60 * 60;

/// Classes live for grades 1 through 11.
pub const MAX_GRADE: u8 = 11;

/// Month on which every class is formed (September).
pub const FORMATION_MONTH: u32 = 9;

/// Persistent form of a class: stable identity across its 11-year lifetime.
///
/// The displayed name is derived on demand via [`Class::name_on`] and is
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Class {
    /// Single uppercase letter from the deployment alphabet
    pub letter: char,
    /// Pinned to September 1, 00:00 UTC of the formation year
    pub formation_date: DateTime<Utc>,
}

impl Class {
    /// Create a class formed on September 1 of `year`.
    pub fn formed_in(letter: char, year: i32) -> Self {
        // September 1 exists in every year chrono can represent, and UTC
        // has no ambiguous local times, so `single()` cannot miss.
        let formation_date = Utc
            .with_ymd_and_hms(year, FORMATION_MONTH, 1, 0, 0, 0)
            .single()
            .unwrap_or_default();
        Self {
            letter,
            formation_date,
        }
    }

    /// Calendar year of the September 1 on which the class began grade 1.
    pub fn formation_year(&self) -> i32 {
        self.formation_date.year()
    }

    /// Render the display name relative to `observed`.
    ///
    /// Fails with [`EcodriveError::NoClassOnDate`] before the formation
    /// instant (inclusive) and after the 11th year has elapsed.
    pub fn name_on(&self, observed: DateTime<Utc>) -> Result<String> {
        let grade = self.grade_on(observed)?;
        Ok(ClassName {
            grade,
            letter: self.letter,
        }
        .to_string())
    }

    /// Grade displayed on `observed`: ceiling of elapsed 365-day years.
    fn grade_on(&self, observed: DateTime<Utc>) -> Result<u8> {
        let secs = (observed - self.formation_date).num_seconds();
        if secs <= 0 {
            return Err(EcodriveError::NoClassOnDate {
                formation: self.formation_date,
                observed,
            });
        }
        let years = (secs + YEAR_SECS - 1) / YEAR_SECS;
        if years > i64::from(MAX_GRADE) {
            return Err(EcodriveError::NoClassOnDate {
                formation: self.formation_date,
                observed,
            });
        }
        Ok(years as u8)
    }
}

/// Display form of a class, produced on demand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassName {
    /// Grade 1..=11
    pub grade: u8,
    pub letter: char,
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.grade, self.letter)
    }
}

/// Outcome of [`parse_class_name`]: the stable identity a class name text
/// denotes relative to the observation date.
///
/// The letter is `None` when the input carried digits only; callers that
/// require a letter enforce that themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedClassName {
    pub letter: Option<char>,
    pub formation_year: i32,
}

/// Parse free text as a class name relative to `observed`.
///
/// Walks the codepoints keeping a digit buffer and a single letter slot.
/// Codepoints that are neither letters nor digits are skipped without
/// error, so `"  3- -* B  "` parses the same as `"3B"`. Any letter or
/// digit after the letter slot is filled fails the parse (the letter comes
/// last, exactly once). The digit buffer must parse as a grade in 1..=11.
///
/// The formation year is `observed.year() - grade`, plus one when the
/// observation falls on or after the September pivot.
pub fn parse_class_name(raw: &str, observed: DateTime<Utc>) -> Result<ParsedClassName> {
    let invalid = || EcodriveError::InvalidClassName(raw.to_string());

    let mut digits = String::new();
    let mut letter: Option<char> = None;
    for c in raw.chars() {
        if c.is_alphabetic() {
            if letter.is_some() {
                return Err(invalid());
            }
            letter = Some(c.to_uppercase().next().unwrap_or(c));
        } else if c.is_numeric() {
            if letter.is_some() {
                return Err(invalid());
            }
            digits.push(c);
        }
    }

    let grade: u32 = digits.parse().map_err(|_| invalid())?;
    if grade < 1 || grade > u32::from(MAX_GRADE) {
        return Err(invalid());
    }

    let mut formation_year = observed.year() - grade as i32;
    if observed.month() >= FORMATION_MONTH {
        formation_year += 1;
    }
    Ok(ParsedClassName {
        letter,
        formation_year,
    })
}
