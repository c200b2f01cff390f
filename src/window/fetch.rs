// landscape_chat — A virtualized chat channel window for the terminal
// Copyright (C) 2025  Simon Peter Rothgang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use crate::error::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Older,
    Newer,
}

impl Direction {
    pub const fn is_newer(self) -> bool {
        matches!(self, Self::Newer)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Older => "older",
            Self::Newer => "newer",
        }
    }
}

/// What a settled page request says about the remaining backlog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// More pages exist in that direction.
    More,
    /// The backlog is fully loaded in that direction.
    Exhausted,
}

/// Pagination capability supplied by the data layer.
///
/// Implementations merge the fetched page into the collection before the
/// future resolves, so the window sees the new rows on its next update.
#[async_trait::async_trait(?Send)]
pub trait PageFetcher {
    async fn fetch_more(&self, direction: Direction) -> Result<FetchOutcome, FetchError>;
}
