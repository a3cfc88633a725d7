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

//! Aggregation reports over contributions
//!
//! Report rows are grouped by event, class or pupil; a shared
//! filter -> sort -> page pipeline shapes the final listing.

use ecodrive_core::ResourceKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Totals for one recycling event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventReport {
    pub event_id: u64,
    pub event_name: String,
    pub total_kg: f64,
    /// Per-resource breakdown, stable iteration order
    pub by_resource: BTreeMap<ResourceKind, f64>,
    /// Distinct pupils that contributed
    pub pupil_count: usize,
}

/// Totals for one class, named relative to the observation date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassReport {
    pub class_name: String,
    pub total_kg: f64,
    /// Pupils currently assigned to the class
    pub pupil_count: usize,
}

/// Totals for one pupil
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PupilReport {
    pub pupil_id: u64,
    pub full_name: String,
    /// Absent when the pupil has no class, or the class has no name on
    /// the observation date
    pub class_name: Option<String>,
    pub total_kg: f64,
}

/// Which contributions feed a report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportFilter {
    /// Restrict to these events; `None` means all events
    pub event_ids: Option<Vec<u64>>,
    /// Restrict to one resource kind
    pub resource: Option<ResourceKind>,
    /// Drop rows whose total falls below this threshold
    pub min_total_kg: Option<f64>,
}

impl ReportFilter {
    /// Whether a contribution to `event_id` of `resource` participates.
    pub fn admits(&self, event_id: u64, resource: ResourceKind) -> bool {
        if let Some(ids) = &self.event_ids {
            if !ids.contains(&event_id) {
                return false;
            }
        }
        self.resource.map_or(true, |r| r == resource)
    }
}

/// Sort key for report rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    TotalKg,
    Name,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// Offset/limit page applied after sorting
///
/// Defaulting a page size is the transport layer's concern; [`Page::ALL`]
/// is the identity page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

impl Page {
    pub const ALL: Page = Page {
        offset: 0,
        limit: usize::MAX,
    };

    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::ALL
    }
}

/// Everything a report listing takes besides the observation date
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub filter: ReportFilter,
    #[serde(default)]
    pub sort_by: SortBy,
    #[serde(default)]
    pub sort_order: SortOrder,
    #[serde(default)]
    pub page: Page,
}

/// Common shape of the three report rows, so the
/// filter -> sort -> page pipeline is written once
pub trait ReportRow {
    fn total_kg(&self) -> f64;
    fn sort_name(&self) -> &str;
}

impl ReportRow for EventReport {
    fn total_kg(&self) -> f64 {
        self.total_kg
    }
    fn sort_name(&self) -> &str {
        &self.event_name
    }
}

impl ReportRow for ClassReport {
    fn total_kg(&self) -> f64 {
        self.total_kg
    }
    fn sort_name(&self) -> &str {
        &self.class_name
    }
}

impl ReportRow for PupilReport {
    fn total_kg(&self) -> f64 {
        self.total_kg
    }
    fn sort_name(&self) -> &str {
        &self.full_name
    }
}

/// Apply the row-level filter, sort and page to accumulated rows.
pub fn finalize<T: ReportRow>(mut rows: Vec<T>, query: &ReportQuery) -> Vec<T> {
    if let Some(min) = query.filter.min_total_kg {
        rows.retain(|row| row.total_kg() >= min);
    }
    rows.sort_by(|a, b| {
        let ordering = match query.sort_by {
            SortBy::TotalKg => a.total_kg().total_cmp(&b.total_kg()),
            SortBy::Name => a.sort_name().cmp(b.sort_name()),
        };
        match query.sort_order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
    rows.into_iter()
        .skip(query.page.offset)
        .take(query.page.limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, total_kg: f64) -> ClassReport {
        ClassReport {
            class_name: name.to_string(),
            total_kg,
            pupil_count: 1,
        }
    }

    #[test]
    fn default_sort_is_total_descending() {
        let rows = vec![row("3A", 1.0), row("3B", 5.0), row("3C", 3.0)];
        let out = finalize(rows, &ReportQuery::default());
        let names: Vec<&str> = out.iter().map(|r| r.class_name.as_str()).collect();
        assert_eq!(names, ["3B", "3C", "3A"]);
    }

    #[test]
    fn name_sort_ascending() {
        let rows = vec![row("3C", 1.0), row("3A", 5.0), row("3B", 3.0)];
        let query = ReportQuery {
            sort_by: SortBy::Name,
            sort_order: SortOrder::Ascending,
            ..Default::default()
        };
        let names: Vec<String> = finalize(rows, &query)
            .into_iter()
            .map(|r| r.class_name)
            .collect();
        assert_eq!(names, ["3A", "3B", "3C"]);
    }

    #[test]
    fn min_total_filters_before_paging() {
        let rows = vec![row("3A", 1.0), row("3B", 5.0), row("3C", 3.0)];
        let query = ReportQuery {
            filter: ReportFilter {
                min_total_kg: Some(2.0),
                ..Default::default()
            },
            page: Page::new(1, 1),
            ..Default::default()
        };
        let out = finalize(rows, &query);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].class_name, "3C");
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let rows = vec![row("3A", 1.0)];
        let query = ReportQuery {
            page: Page::new(5, 10),
            ..Default::default()
        };
        assert!(finalize(rows, &query).is_empty());
    }

    #[test]
    fn filter_admits_by_event_and_resource() {
        let filter = ReportFilter {
            event_ids: Some(vec![1, 2]),
            resource: Some(ResourceKind::Paper),
            min_total_kg: None,
        };
        assert!(filter.admits(1, ResourceKind::Paper));
        assert!(!filter.admits(3, ResourceKind::Paper));
        assert!(!filter.admits(1, ResourceKind::Glass));
    }

    #[test]
    fn report_query_round_trips_through_json() {
        let query = ReportQuery {
            filter: ReportFilter {
                event_ids: Some(vec![7]),
                resource: Some(ResourceKind::Plastic),
                min_total_kg: Some(1.5),
            },
            sort_by: SortBy::Name,
            sort_order: SortOrder::Ascending,
            page: Page::new(0, 20),
        };
        let json = serde_json::to_string(&query).unwrap();
        let back: ReportQuery = serde_json::from_str(&json).unwrap();
        assert_eq!(back, query);
    }
}
