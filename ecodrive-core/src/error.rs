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

//! Error types shared across the workspace

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type for ecodrive operations
pub type Result<T> = std::result::Result<T, EcodriveError>;

/// Errors raised by the domain core and its direct consumers
#[derive(Debug, Error)]
pub enum EcodriveError {
    /// The observation date falls outside the class's 11-year lifetime
    #[error("class formed {formation} has no name on {observed}")]
    NoClassOnDate {
        formation: DateTime<Utc>,
        observed: DateTime<Utc>,
    },

    /// The text does not have the shape of a class name
    #[error("invalid class name: {0:?}")]
    InvalidClassName(String),

    /// The class letter is not part of the deployment alphabet
    #[error("letter {0:?} is outside the deployment alphabet")]
    LetterOutsideAlphabet(char),

    #[error("pupil not found: {0}")]
    PupilNotFound(u64),

    #[error("event not found: {0}")]
    EventNotFound(u64),

    /// A contribution amount below zero was rejected
    #[error("contribution amount must be non-negative, got {0}")]
    NegativeAmount(f64),

    #[error("invalid configuration: {0}")]
    Config(String),
}
