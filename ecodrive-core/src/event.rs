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

//! Recycling drives and the resources pupils bring to them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kinds of recyclable resource accepted at a drive
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Paper,
    Plastic,
    Glass,
    Metal,
    Textile,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Paper,
        ResourceKind::Plastic,
        ResourceKind::Glass,
        ResourceKind::Metal,
        ResourceKind::Textile,
    ];
}

/// A school recycling drive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecyclingEvent {
    pub id: u64,
    pub name: String,
    pub date: DateTime<Utc>,
}

impl RecyclingEvent {
    pub fn new(id: u64, name: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            date,
        }
    }
}

/// What one pupil brought to one event, per resource kind
///
/// Keyed by (event, pupil, resource); a later record for the same key
/// overwrites the amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub event_id: u64,
    pub pupil_id: u64,
    pub resource: ResourceKind,
    pub amount_kg: f64,
}
