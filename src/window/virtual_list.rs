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

use std::ops::Range;

/// Half-open range of collection positions currently mounted.
///
/// The size is bounded by `visible + 2 * overscan` no matter how large the
/// collection grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MountedWindow {
    pub start: usize,
    pub end: usize,
}

impl MountedWindow {
    /// Window around the viewport whose newest visible row sits `offset`
    /// messages above the newest loaded message.
    #[must_use]
    pub fn compute(len: usize, offset: usize, visible: usize, overscan: usize) -> Self {
        let Some(last) = len.checked_sub(1) else {
            return Self::default();
        };
        let bottom = last - offset.min(last);
        let first_visible = (bottom + 1).saturating_sub(visible.max(1));
        Self {
            start: first_visible.saturating_sub(overscan),
            end: (bottom + 1 + overscan).min(len),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn positions(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn near_oldest(&self, threshold: usize) -> bool {
        !self.is_empty() && self.start <= threshold
    }

    pub fn near_newest(&self, len: usize, threshold: usize) -> bool {
        !self.is_empty() && self.end + threshold >= len
    }
}
