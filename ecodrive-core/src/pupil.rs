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

//! Pupils and the text they are searchable by

use crate::class::Class;
use serde::{Deserialize, Serialize};

/// A pupil enrolled in the school
///
/// IDs are assigned by the caller; the core never mints identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pupil {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    /// Current class, if any. Reassignment replaces it wholesale.
    pub class: Option<Class>,
}

impl Pupil {
    pub fn new(id: u64, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            class: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Source text for the search index:
    /// `first last yearletter letter year` for pupils with a class,
    /// `first last` otherwise.
    ///
    /// The year-prefixed form ("2018B") is the canonical class token; the
    /// query compiler aliases class-shaped query tokens to the same shape,
    /// which is what lets "3B" match on either side of the school-year
    /// transition. The class tokens depend only on the stable identity, so
    /// no observation date is needed here.
    pub fn search_text(&self) -> String {
        let mut text = format!("{} {}", self.first_name, self.last_name);
        if let Some(class) = &self.class {
            let year = class.formation_year();
            let letter = class.letter;
            text.push_str(&format!(" {year}{letter} {letter} {year}"));
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_text_without_class() {
        let pupil = Pupil::new(1, "Ivan", "Petrov");
        assert_eq!(pupil.search_text(), "Ivan Petrov");
    }

    #[test]
    fn search_text_with_class() {
        let mut pupil = Pupil::new(1, "Ivan", "Petrov");
        pupil.class = Some(Class::formed_in('B', 2018));
        assert_eq!(pupil.search_text(), "Ivan Petrov 2018B B 2018");
    }
}
