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

//! In-memory store for pupils, events and contributions
//!
//! Thread-safe for concurrent use; safe to share via Arc. Writes keep the
//! text-search index in step with the pupil table.

use crate::text_index::TextIndex;
use dashmap::DashMap;
use ecodrive_core::{
    Contribution, EcodriveError, Pupil, RecyclingEvent, ResourceKind, Result,
};
use tracing::debug;

/// Key for one pupil's amount of one resource at one event
type ContributionKey = (u64, u64, ResourceKind);

/// The system of record
#[derive(Debug, Default)]
pub struct MemoryStore {
    pupils: DashMap<u64, Pupil>,
    events: DashMap<u64, RecyclingEvent>,
    contributions: DashMap<ContributionKey, Contribution>,
    index: TextIndex,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- pupils ----

    /// Insert or replace a pupil and reindex its search text.
    pub fn put_pupil(&self, pupil: Pupil) {
        self.index.index_pupil(&pupil);
        self.pupils.insert(pupil.id, pupil);
    }

    pub fn get_pupil(&self, pupil_id: u64) -> Result<Pupil> {
        self.pupils
            .get(&pupil_id)
            .map(|p| p.value().clone())
            .ok_or(EcodriveError::PupilNotFound(pupil_id))
    }

    /// Remove a pupil, its index entry and its contributions.
    pub fn delete_pupil(&self, pupil_id: u64) -> Result<()> {
        self.pupils
            .remove(&pupil_id)
            .ok_or(EcodriveError::PupilNotFound(pupil_id))?;
        self.index.remove_pupil(pupil_id);
        let before = self.contributions.len();
        self.contributions.retain(|&(_, pid, _), _| pid != pupil_id);
        debug!(
            pupil_id,
            removed = before - self.contributions.len(),
            "deleted pupil"
        );
        Ok(())
    }

    pub fn pupils(&self) -> Vec<Pupil> {
        self.pupils.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn pupil_count(&self) -> usize {
        self.pupils.len()
    }

    // ---- events ----

    pub fn put_event(&self, event: RecyclingEvent) {
        self.events.insert(event.id, event);
    }

    pub fn get_event(&self, event_id: u64) -> Result<RecyclingEvent> {
        self.events
            .get(&event_id)
            .map(|e| e.value().clone())
            .ok_or(EcodriveError::EventNotFound(event_id))
    }

    /// Remove an event and every contribution recorded against it.
    pub fn delete_event(&self, event_id: u64) -> Result<()> {
        self.events
            .remove(&event_id)
            .ok_or(EcodriveError::EventNotFound(event_id))?;
        self.contributions.retain(|&(eid, _, _), _| eid != event_id);
        debug!(event_id, "deleted event");
        Ok(())
    }

    pub fn events(&self) -> Vec<RecyclingEvent> {
        self.events.iter().map(|entry| entry.value().clone()).collect()
    }

    // ---- contributions ----

    /// Record what a pupil brought; overwrites any earlier amount for the
    /// same (event, pupil, resource).
    pub fn upsert_contribution(&self, contribution: Contribution) -> Result<()> {
        if !self.events.contains_key(&contribution.event_id) {
            return Err(EcodriveError::EventNotFound(contribution.event_id));
        }
        if !self.pupils.contains_key(&contribution.pupil_id) {
            return Err(EcodriveError::PupilNotFound(contribution.pupil_id));
        }
        let key = (
            contribution.event_id,
            contribution.pupil_id,
            contribution.resource,
        );
        self.contributions.insert(key, contribution);
        Ok(())
    }

    pub fn contributions(&self) -> Vec<Contribution> {
        self.contributions
            .iter()
            .map(|entry| *entry.value())
            .collect()
    }

    pub fn contributions_for_event(&self, event_id: u64) -> Vec<Contribution> {
        self.contributions
            .iter()
            .filter(|entry| entry.key().0 == event_id)
            .map(|entry| *entry.value())
            .collect()
    }

    pub fn contributions_for_pupil(&self, pupil_id: u64) -> Vec<Contribution> {
        self.contributions
            .iter()
            .filter(|entry| entry.key().1 == pupil_id)
            .map(|entry| *entry.value())
            .collect()
    }

    // ---- search ----

    /// Prefix search over the pupil index. Takes the compiler's output
    /// verbatim; empty or malformed queries match nothing.
    pub fn search_pupil_ids(&self, parsed_query: &str) -> Vec<u64> {
        self.index.search(parsed_query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use ecodrive_core::Class;

    fn store_with_event() -> MemoryStore {
        let store = MemoryStore::new();
        let date = Utc.with_ymd_and_hms(2020, 10, 10, 0, 0, 0).unwrap();
        store.put_event(RecyclingEvent::new(1, "Autumn drive", date));
        store.put_pupil(Pupil::new(10, "Ivan", "Petrov"));
        store
    }

    #[test]
    fn missing_pupil_is_an_error() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.get_pupil(99),
            Err(EcodriveError::PupilNotFound(99))
        ));
    }

    #[test]
    fn contribution_requires_event_and_pupil() {
        let store = store_with_event();
        let ok = Contribution {
            event_id: 1,
            pupil_id: 10,
            resource: ResourceKind::Paper,
            amount_kg: 3.5,
        };
        assert!(store.upsert_contribution(ok).is_ok());

        let no_event = Contribution { event_id: 2, ..ok };
        assert!(matches!(
            store.upsert_contribution(no_event),
            Err(EcodriveError::EventNotFound(2))
        ));

        let no_pupil = Contribution { pupil_id: 11, ..ok };
        assert!(matches!(
            store.upsert_contribution(no_pupil),
            Err(EcodriveError::PupilNotFound(11))
        ));
    }

    #[test]
    fn upsert_overwrites_amount() {
        let store = store_with_event();
        for amount_kg in [3.5, 4.0] {
            store
                .upsert_contribution(Contribution {
                    event_id: 1,
                    pupil_id: 10,
                    resource: ResourceKind::Paper,
                    amount_kg,
                })
                .unwrap();
        }
        let rows = store.contributions_for_event(1);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount_kg, 4.0);
    }

    #[test]
    fn delete_event_cascades_contributions() {
        let store = store_with_event();
        store
            .upsert_contribution(Contribution {
                event_id: 1,
                pupil_id: 10,
                resource: ResourceKind::Glass,
                amount_kg: 1.0,
            })
            .unwrap();
        store.delete_event(1).unwrap();
        assert!(store.contributions().is_empty());
        assert!(store.get_event(1).is_err());
    }

    #[test]
    fn delete_pupil_cascades_contributions_and_index() {
        let store = store_with_event();
        store
            .upsert_contribution(Contribution {
                event_id: 1,
                pupil_id: 10,
                resource: ResourceKind::Paper,
                amount_kg: 2.0,
            })
            .unwrap();
        store.delete_pupil(10).unwrap();
        assert!(store.contributions().is_empty());
        assert!(store.search_pupil_ids("ivan:*").is_empty());
    }

    #[test]
    fn put_pupil_indexes_class_tokens() {
        let store = MemoryStore::new();
        let mut pupil = Pupil::new(10, "Ivan", "Petrov");
        pupil.class = Some(Class::formed_in('B', 2018));
        store.put_pupil(pupil);
        assert_eq!(store.search_pupil_ids("2018b:*"), vec![10]);
        assert_eq!(store.search_pupil_ids("b:*"), vec![10]);
    }
}
