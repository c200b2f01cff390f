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

use std::time::Duration;

pub const DEFAULT_OVERSCAN: usize = 10;
pub const DEFAULT_FETCH_THRESHOLD: usize = 5;
pub const DEFAULT_IDLE_THRESHOLD: usize = 3;
pub const DEFAULT_AT_END_THRESHOLD: usize = 4;
pub const DEFAULT_DISMISS_OFFSET: usize = 5;
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Tuning knobs for the virtualized list. Offsets and thresholds are counted
/// in messages from the newest end of the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPolicy {
    /// Rows mounted beyond each edge of the visible range.
    pub overscan: usize,
    /// Distance from a loaded edge at which a page fetch is requested.
    pub fetch_threshold: usize,
    /// Scrolling further than this from the newest message marks the window idle.
    pub idle_threshold: usize,
    /// Below this offset the viewport counts as "at the end".
    pub at_end_threshold: usize,
    /// Unread dismissal only fires when the offset is below this.
    pub dismiss_offset: usize,
    /// Inactivity after which a focused window goes idle.
    pub idle_timeout: Duration,
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self {
            overscan: DEFAULT_OVERSCAN,
            fetch_threshold: DEFAULT_FETCH_THRESHOLD,
            idle_threshold: DEFAULT_IDLE_THRESHOLD,
            at_end_threshold: DEFAULT_AT_END_THRESHOLD,
            dismiss_offset: DEFAULT_DISMISS_OFFSET,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }
}

#[must_use]
pub fn default_window_policy() -> &'static WindowPolicy {
    static POLICY: WindowPolicy = WindowPolicy {
        overscan: DEFAULT_OVERSCAN,
        fetch_threshold: DEFAULT_FETCH_THRESHOLD,
        idle_threshold: DEFAULT_IDLE_THRESHOLD,
        at_end_threshold: DEFAULT_AT_END_THRESHOLD,
        dismiss_offset: DEFAULT_DISMISS_OFFSET,
        idle_timeout: DEFAULT_IDLE_TIMEOUT,
    };
    &POLICY
}
