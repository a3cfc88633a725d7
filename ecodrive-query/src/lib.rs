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

//! Ecodrive Query
//!
//! The search-query compiler, the token classifier it is built on, and the
//! aggregation engine over the in-memory store.

pub mod aggregation;
pub mod compiler;
pub mod engine;
pub mod token;

pub use aggregation::{
    finalize, ClassReport, EventReport, Page, PupilReport, ReportFilter, ReportQuery, ReportRow,
    SortBy, SortOrder,
};
pub use compiler::compile;
pub use engine::EcodriveEngine;
pub use token::{classify, TokenKind};
