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

use super::fetch::Direction;
use crate::store::MessageIndex;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPhase {
    /// Not mounted yet; every event except `Mount` is ignored.
    Initializing,
    LockedToBottom,
    FreeScroll,
}

/// Per-direction pagination mutex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchGate {
    #[default]
    Idle,
    Pending,
    /// Backlog fully loaded in this direction.
    Exhausted,
}

impl FetchGate {
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Observable label for the window. A pending fetch wins over the scroll phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPhase {
    Initializing,
    LockedToBottom,
    FreeScroll,
    FetchingOlder,
    FetchingNewer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct WindowState {
    pub scroll: ScrollPhase,
    pub older: FetchGate,
    pub newer: FetchGate,
    pub idle: bool,
    pub last_activity: Option<Instant>,
    pub torn_down: bool,
    pub prev_size: usize,
    pub prev_unread: usize,
    pub unread_index: Option<MessageIndex>,
    /// Current unread episode has been dismissed.
    pub unread_dismissed: bool,
    pub target_reached: bool,
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            scroll: ScrollPhase::Initializing,
            older: FetchGate::Idle,
            newer: FetchGate::Idle,
            idle: true,
            last_activity: None,
            torn_down: false,
            prev_size: 0,
            prev_unread: 0,
            unread_index: None,
            unread_dismissed: false,
            target_reached: false,
        }
    }
}

impl WindowState {
    pub fn phase(&self) -> WindowPhase {
        if self.older.is_pending() {
            return WindowPhase::FetchingOlder;
        }
        if self.newer.is_pending() {
            return WindowPhase::FetchingNewer;
        }
        match self.scroll {
            ScrollPhase::Initializing => WindowPhase::Initializing,
            ScrollPhase::LockedToBottom => WindowPhase::LockedToBottom,
            ScrollPhase::FreeScroll => WindowPhase::FreeScroll,
        }
    }

    pub fn gate(&self, direction: Direction) -> FetchGate {
        match direction {
            Direction::Older => self.older,
            Direction::Newer => self.newer,
        }
    }

    pub(super) fn gate_mut(&mut self, direction: Direction) -> &mut FetchGate {
        match direction {
            Direction::Older => &mut self.older,
            Direction::Newer => &mut self.newer,
        }
    }

    pub fn is_mounted(&self) -> bool {
        !self.torn_down && self.scroll != ScrollPhase::Initializing
    }

    /// Boundary to show, hidden once the episode is dismissed.
    pub fn visible_unread_index(&self) -> Option<MessageIndex> {
        if self.unread_dismissed { None } else { self.unread_index }
    }
}
