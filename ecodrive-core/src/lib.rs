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

//! Ecodrive Core
//!
//! Domain types for the school recycling-drive tracker: pupils, events,
//! contributions, and the date-relative class name codec.

pub mod class;
pub mod config;
pub mod error;
pub mod event;
pub mod pupil;

pub use class::{parse_class_name, Class, ClassName, ParsedClassName, FORMATION_MONTH, MAX_GRADE};
pub use config::{Alphabet, EcodriveConfig};
pub use error::{EcodriveError, Result};
pub use event::{Contribution, RecyclingEvent, ResourceKind};
pub use pupil::Pupil;
