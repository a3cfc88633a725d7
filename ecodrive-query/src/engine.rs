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

//! High-level engine combining storage, the class name codec and the
//! search-query compiler
//!
//! Exposes the three use-case families: event management, schooling and
//! aggregation. All operations are thread-safe; the engine is safe to
//! share across threads via Arc because the store carries the only state.

use crate::aggregation::{finalize, ClassReport, EventReport, PupilReport, ReportQuery};
use crate::compiler::compile;
use chrono::{DateTime, Utc};
use ecodrive_core::{
    parse_class_name, Class, Contribution, EcodriveConfig, EcodriveError, Pupil, RecyclingEvent,
    ResourceKind, Result,
};
use ecodrive_storage::MemoryStore;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// Facade over the store for the three bounded use-case families
pub struct EcodriveEngine {
    storage: Arc<MemoryStore>,
    config: EcodriveConfig,
}

impl EcodriveEngine {
    pub fn new(config: EcodriveConfig) -> Self {
        Self::with_storage(Arc::new(MemoryStore::new()), config)
    }

    pub fn with_storage(storage: Arc<MemoryStore>, config: EcodriveConfig) -> Self {
        Self { storage, config }
    }

    pub fn storage(&self) -> &Arc<MemoryStore> {
        &self.storage
    }

    // ---- event management ----

    /// Create (or replace) a recycling event.
    pub fn create_event(
        &self,
        id: u64,
        name: &str,
        date: DateTime<Utc>,
    ) -> Result<RecyclingEvent> {
        let event = RecyclingEvent::new(id, name, date);
        self.storage.put_event(event.clone());
        info!(event_id = id, name, "created event");
        Ok(event)
    }

    /// Delete an event together with its contributions.
    pub fn delete_event(&self, event_id: u64) -> Result<()> {
        self.storage.delete_event(event_id)?;
        info!(event_id, "deleted event");
        Ok(())
    }

    /// Record what a pupil brought to an event. A later call for the same
    /// (event, pupil, resource) overwrites the amount.
    pub fn record_contribution(
        &self,
        event_id: u64,
        pupil_id: u64,
        resource: ResourceKind,
        amount_kg: f64,
    ) -> Result<()> {
        if amount_kg < 0.0 {
            return Err(EcodriveError::NegativeAmount(amount_kg));
        }
        self.storage.upsert_contribution(Contribution {
            event_id,
            pupil_id,
            resource,
            amount_kg,
        })?;
        debug!(event_id, pupil_id, ?resource, amount_kg, "recorded contribution");
        Ok(())
    }

    /// Per-event totals with resource breakdown.
    pub fn event_report(&self, event_id: u64) -> Result<EventReport> {
        let event = self.storage.get_event(event_id)?;
        let mut total_kg = 0.0;
        let mut by_resource = BTreeMap::new();
        let mut pupils = HashSet::new();
        for c in self.storage.contributions_for_event(event_id) {
            total_kg += c.amount_kg;
            *by_resource.entry(c.resource).or_insert(0.0) += c.amount_kg;
            pupils.insert(c.pupil_id);
        }
        Ok(EventReport {
            event_id: event.id,
            event_name: event.name,
            total_kg,
            by_resource,
            pupil_count: pupils.len(),
        })
    }

    // ---- schooling ----

    /// Enroll (or replace) a pupil. The caller assigns the id.
    pub fn add_pupil(&self, id: u64, first_name: &str, last_name: &str) -> Result<Pupil> {
        let pupil = Pupil::new(id, first_name, last_name);
        self.storage.put_pupil(pupil.clone());
        info!(pupil_id = id, "added pupil");
        Ok(pupil)
    }

    /// Remove a pupil together with its contributions and index entry.
    pub fn remove_pupil(&self, pupil_id: u64) -> Result<()> {
        self.storage.delete_pupil(pupil_id)?;
        info!(pupil_id, "removed pupil");
        Ok(())
    }

    /// Reassign a pupil to the class named by `class_text` relative to
    /// `observed`. The text must carry a letter ("3B", not "3") and the
    /// letter must belong to the deployment alphabet.
    pub fn assign_class(
        &self,
        pupil_id: u64,
        class_text: &str,
        observed: DateTime<Utc>,
    ) -> Result<Class> {
        let parsed = parse_class_name(class_text, observed)?;
        let letter = parsed
            .letter
            .ok_or_else(|| EcodriveError::InvalidClassName(class_text.to_string()))?;
        if !self.config.alphabet.contains(letter) {
            return Err(EcodriveError::LetterOutsideAlphabet(letter));
        }
        let class = Class::formed_in(letter, parsed.formation_year);
        let mut pupil = self.storage.get_pupil(pupil_id)?;
        pupil.class = Some(class);
        self.storage.put_pupil(pupil);
        info!(
            pupil_id,
            letter = %letter,
            formation_year = parsed.formation_year,
            "assigned class"
        );
        Ok(class)
    }

    // ---- aggregation ----

    /// Report across events.
    pub fn report_by_event(&self, query: &ReportQuery) -> Vec<EventReport> {
        let mut rows = Vec::new();
        for event in self.storage.events() {
            if let Some(ids) = &query.filter.event_ids {
                if !ids.contains(&event.id) {
                    continue;
                }
            }
            let mut total_kg = 0.0;
            let mut by_resource = BTreeMap::new();
            let mut pupils = HashSet::new();
            for c in self.storage.contributions_for_event(event.id) {
                if !query.filter.admits(c.event_id, c.resource) {
                    continue;
                }
                total_kg += c.amount_kg;
                *by_resource.entry(c.resource).or_insert(0.0) += c.amount_kg;
                pupils.insert(c.pupil_id);
            }
            rows.push(EventReport {
                event_id: event.id,
                event_name: event.name,
                total_kg,
                by_resource,
                pupil_count: pupils.len(),
            });
        }
        finalize(rows, query)
    }

    /// Report across classes, named relative to `observed`. Pupils without
    /// a class, or whose class has no name on that date, are left out.
    pub fn report_by_class(&self, observed: DateTime<Utc>, query: &ReportQuery) -> Vec<ClassReport> {
        let mut groups: HashMap<String, (usize, f64)> = HashMap::new();
        for pupil in self.storage.pupils() {
            let Some(class) = pupil.class else { continue };
            let Ok(class_name) = class.name_on(observed) else {
                continue;
            };
            let entry = groups.entry(class_name).or_insert((0, 0.0));
            entry.0 += 1;
            for c in self.storage.contributions_for_pupil(pupil.id) {
                if query.filter.admits(c.event_id, c.resource) {
                    entry.1 += c.amount_kg;
                }
            }
        }
        let rows = groups
            .into_iter()
            .map(|(class_name, (pupil_count, total_kg))| ClassReport {
                class_name,
                total_kg,
                pupil_count,
            })
            .collect();
        finalize(rows, query)
    }

    /// Report across pupils, with class names rendered relative to
    /// `observed`.
    pub fn report_by_pupil(&self, observed: DateTime<Utc>, query: &ReportQuery) -> Vec<PupilReport> {
        let mut rows = Vec::new();
        for pupil in self.storage.pupils() {
            let class_name = pupil.class.and_then(|c| c.name_on(observed).ok());
            let total_kg = self
                .storage
                .contributions_for_pupil(pupil.id)
                .into_iter()
                .filter(|c| query.filter.admits(c.event_id, c.resource))
                .map(|c| c.amount_kg)
                .sum();
            rows.push(PupilReport {
                pupil_id: pupil.id,
                full_name: pupil.full_name(),
                class_name,
                total_kg,
            });
        }
        finalize(rows, query)
    }

    // ---- search ----

    /// Free-text pupil lookup. The query is compiled relative to
    /// `observed` and handed verbatim to the index; queries with
    /// disallowed characters therefore match nothing.
    pub fn search_pupils(&self, user_query: &str, observed: DateTime<Utc>) -> Vec<Pupil> {
        let parsed = compile(user_query, observed);
        debug!(query = user_query, parsed = %parsed, "compiled search query");
        self.storage
            .search_pupil_ids(&parsed)
            .into_iter()
            .filter_map(|id| self.storage.get_pupil(id).ok())
            .collect()
    }
}

impl Default for EcodriveEngine {
    fn default() -> Self {
        Self::new(EcodriveConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ecodrive_core::Alphabet;

    fn october_2020() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 10, 10, 0, 0, 0).unwrap()
    }

    #[test]
    fn assign_class_requires_letter() {
        let engine = EcodriveEngine::default();
        engine.add_pupil(1, "Ivan", "Petrov").unwrap();
        let err = engine.assign_class(1, "3", october_2020()).unwrap_err();
        assert!(matches!(err, EcodriveError::InvalidClassName(_)));
    }

    #[test]
    fn assign_class_checks_alphabet() {
        let engine = EcodriveEngine::default();
        engine.add_pupil(1, "Ivan", "Petrov").unwrap();
        let err = engine.assign_class(1, "3Б", october_2020()).unwrap_err();
        assert!(matches!(err, EcodriveError::LetterOutsideAlphabet('Б')));

        let cyrillic = EcodriveEngine::new(EcodriveConfig {
            alphabet: Alphabet::Cyrillic,
        });
        cyrillic.add_pupil(1, "Иван", "Петров").unwrap();
        let class = cyrillic.assign_class(1, "3б", october_2020()).unwrap();
        assert_eq!(class.letter, 'Б');
        assert_eq!(class.formation_year(), 2018);
    }

    #[test]
    fn assign_class_reindexes_search_text() {
        let engine = EcodriveEngine::default();
        engine.add_pupil(1, "Ivan", "Petrov").unwrap();
        assert!(engine.search_pupils("3B", october_2020()).is_empty());

        engine.assign_class(1, "3B", october_2020()).unwrap();
        let found = engine.search_pupils("3B Iv", october_2020());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 1);
    }

    #[test]
    fn rejects_negative_contribution() {
        let engine = EcodriveEngine::default();
        engine.create_event(1, "Drive", october_2020()).unwrap();
        engine.add_pupil(1, "Ivan", "Petrov").unwrap();
        let err = engine
            .record_contribution(1, 1, ResourceKind::Paper, -1.0)
            .unwrap_err();
        assert!(matches!(err, EcodriveError::NegativeAmount(_)));
    }

    #[test]
    fn event_report_counts_distinct_pupils() {
        let engine = EcodriveEngine::default();
        engine.create_event(1, "Drive", october_2020()).unwrap();
        engine.add_pupil(1, "Ivan", "Petrov").unwrap();
        engine.add_pupil(2, "Anna", "Sidorova").unwrap();
        engine
            .record_contribution(1, 1, ResourceKind::Paper, 2.0)
            .unwrap();
        engine
            .record_contribution(1, 1, ResourceKind::Glass, 1.0)
            .unwrap();
        engine
            .record_contribution(1, 2, ResourceKind::Paper, 3.0)
            .unwrap();

        let report = engine.event_report(1).unwrap();
        assert_eq!(report.pupil_count, 2);
        assert_eq!(report.total_kg, 6.0);
        assert_eq!(report.by_resource[&ResourceKind::Paper], 5.0);
        assert_eq!(report.by_resource[&ResourceKind::Glass], 1.0);
    }
}
