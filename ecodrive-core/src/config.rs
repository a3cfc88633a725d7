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

//! Deployment configuration
//!
//! The class-letter alphabet is fixed per deployment: a school either uses
//! Latin letters or Cyrillic ones, never a mix. Everything else about the
//! core is a pure function of its inputs and needs no configuration.

use crate::error::{EcodriveError, Result};
use serde::{Deserialize, Serialize};

/// Alphabet from which class letters are drawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alphabet {
    #[default]
    Latin,
    Cyrillic,
}

impl Alphabet {
    /// Whether `c` is a valid (uppercase) class letter in this alphabet.
    pub fn contains(&self, c: char) -> bool {
        match self {
            Alphabet::Latin => c.is_ascii_uppercase(),
            Alphabet::Cyrillic => ('А'..='Я').contains(&c) || c == 'Ё',
        }
    }
}

/// Workspace-wide configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EcodriveConfig {
    #[serde(default)]
    pub alphabet: Alphabet,
}

impl EcodriveConfig {
    /// Parse a TOML configuration document.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| EcodriveError::Config(e.to_string()))
    }
}
