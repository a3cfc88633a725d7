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

//! Prefix text-search index over pupil search text
//!
//! Lexemes are case-folded at write time. Queries arrive as already
//! compiled boolean prefix expressions with the grammar
//!
//! ```text
//! query := term (' & ' term)*
//! term  := atom | '(' atom ' | ' atom ')'
//! atom  := word ':*'
//! ```
//!
//! The empty query, and anything that does not fit the grammar, matches
//! nothing. That is the safe default the compiler relies on when it aborts
//! a query containing disallowed characters.

use ecodrive_core::Pupil;
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory search index: pupil id to case-folded lexemes
#[derive(Debug, Default)]
pub struct TextIndex {
    lexemes: RwLock<HashMap<u64, Vec<String>>>,
}

impl TextIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index (or reindex) a pupil from its search text.
    pub fn index_pupil(&self, pupil: &Pupil) {
        let lexemes: Vec<String> = pupil
            .search_text()
            .split_whitespace()
            .map(|w| w.to_lowercase())
            .collect();
        self.lexemes.write().insert(pupil.id, lexemes);
    }

    pub fn remove_pupil(&self, pupil_id: u64) {
        self.lexemes.write().remove(&pupil_id);
    }

    pub fn indexed_count(&self) -> usize {
        self.lexemes.read().len()
    }

    /// Evaluate a compiled prefix expression, returning matching pupil ids
    /// in ascending order.
    pub fn search(&self, parsed_query: &str) -> Vec<u64> {
        let Some(expr) = QueryExpr::parse(parsed_query) else {
            return Vec::new();
        };
        let mut hits: Vec<u64> = self
            .lexemes
            .read()
            .iter()
            .filter(|(_, lexemes)| expr.matches(lexemes))
            .map(|(id, _)| *id)
            .collect();
        hits.sort_unstable();
        hits
    }
}

/// Conjunction of prefix terms
struct QueryExpr {
    terms: Vec<Term>,
}

enum Term {
    Atom(String),
    Either(String, String),
}

impl QueryExpr {
    /// Parse the compiled grammar. `None` on empty or malformed input.
    fn parse(input: &str) -> Option<Self> {
        if input.is_empty() {
            return None;
        }
        let mut terms = Vec::new();
        for part in input.split(" & ") {
            let term = if let Some(inner) = part
                .strip_prefix('(')
                .and_then(|p| p.strip_suffix(')'))
            {
                let (left, right) = inner.split_once(" | ")?;
                Term::Either(parse_atom(left)?, parse_atom(right)?)
            } else {
                Term::Atom(parse_atom(part)?)
            };
            terms.push(term);
        }
        Some(Self { terms })
    }

    /// Every term must match at least one lexeme.
    fn matches(&self, lexemes: &[String]) -> bool {
        self.terms.iter().all(|term| term.matches(lexemes))
    }
}

impl Term {
    fn matches(&self, lexemes: &[String]) -> bool {
        match self {
            Term::Atom(prefix) => lexemes.iter().any(|l| l.starts_with(prefix)),
            Term::Either(a, b) => lexemes
                .iter()
                .any(|l| l.starts_with(a) || l.starts_with(b)),
        }
    }
}

/// Strip the `:*` suffix and case-fold the word.
fn parse_atom(s: &str) -> Option<String> {
    let word = s.strip_suffix(":*")?;
    if word.is_empty() {
        return None;
    }
    Some(word.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecodrive_core::Class;

    fn indexed(entries: &[(u64, &str, &str, Option<(char, i32)>)]) -> TextIndex {
        let index = TextIndex::new();
        for (id, first, last, class) in entries {
            let mut pupil = Pupil::new(*id, *first, *last);
            pupil.class = class.map(|(letter, year)| Class::formed_in(letter, year));
            index.index_pupil(&pupil);
        }
        index
    }

    #[test]
    fn empty_query_matches_nothing() {
        let index = indexed(&[(1, "Ivan", "Petrov", None)]);
        assert!(index.search("").is_empty());
    }

    #[test]
    fn single_atom_prefix_match() {
        let index = indexed(&[(1, "Ivan", "Petrov", None), (2, "Igor", "Sidorov", None)]);
        assert_eq!(index.search("iv:*"), vec![1]);
        assert_eq!(index.search("i:*"), vec![1, 2]);
    }

    #[test]
    fn conjunction_requires_all_terms() {
        let index = indexed(&[(1, "Ivan", "Petrov", None), (2, "Ivan", "Sidorov", None)]);
        assert_eq!(index.search("ivan:* & pet:*"), vec![1]);
        assert!(index.search("ivan:* & zzz:*").is_empty());
    }

    #[test]
    fn disjunctive_term_matches_canonical_class_token() {
        let index = indexed(&[(1, "Ivan", "Petrov", Some(('B', 2018)))]);
        // What the compiler emits for "3B Iv" observed in October 2020.
        assert_eq!(index.search("(3B:* | 2018B:*) & Iv:*"), vec![1]);
    }

    #[test]
    fn search_is_case_insensitive() {
        let index = indexed(&[(1, "Ivan", "Petrov", None)]);
        assert_eq!(index.search("IVAN:*"), vec![1]);
    }

    #[test]
    fn malformed_expression_matches_nothing() {
        let index = indexed(&[(1, "Ivan", "Petrov", None)]);
        assert!(index.search("ivan").is_empty());
        assert!(index.search("(ivan:*").is_empty());
        assert!(index.search("ivan:* & ").is_empty());
        assert!(index.search(":*").is_empty());
    }

    #[test]
    fn reindex_replaces_old_lexemes() {
        let index = TextIndex::new();
        let mut pupil = Pupil::new(1, "Ivan", "Petrov");
        index.index_pupil(&pupil);
        pupil.last_name = "Smirnov".to_string();
        index.index_pupil(&pupil);
        assert!(index.search("petrov:*").is_empty());
        assert_eq!(index.search("smirnov:*"), vec![1]);
    }

    #[test]
    fn removed_pupil_no_longer_matches() {
        let index = indexed(&[(1, "Ivan", "Petrov", None)]);
        index.remove_pupil(1);
        assert!(index.search("ivan:*").is_empty());
        assert_eq!(index.indexed_count(), 0);
    }
}
