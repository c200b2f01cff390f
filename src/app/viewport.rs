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

use crate::store::{MessageIndex, MessageSource};
use crate::window::Viewport;

/// Terminal implementation of the scroll capability.
///
/// A free-scrolling view is anchored to its newest visible message, so
/// appends below it never move what the reader sees. A `None` anchor pins the
/// view to the newest message.
#[derive(Debug, Clone, Default)]
pub struct TerminalViewport {
    anchor: Option<MessageIndex>,
    height: usize,
}

impl TerminalViewport {
    pub fn anchor(&self) -> Option<MessageIndex> {
        self.anchor
    }

    pub fn set_height(&mut self, rows: usize) {
        self.height = rows;
    }

    /// Newest visible message, if anything is loaded.
    pub fn bottom(&self, source: &dyn MessageSource) -> Option<MessageIndex> {
        self.anchor.filter(|a| source.contains(*a)).or_else(|| source.peek_largest())
    }

    /// Move the view `n` messages toward older history.
    pub fn scroll_up(&mut self, source: &dyn MessageSource, n: usize) {
        let Some(position) = self.bottom(source).and_then(|b| source.position_of(b)) else {
            return;
        };
        self.anchor = source.key_at(position.saturating_sub(n));
    }

    /// Move the view `n` messages toward the newest message, pinning at the end.
    pub fn scroll_down(&mut self, source: &dyn MessageSource, n: usize) {
        let Some(position) = self.bottom(source).and_then(|b| source.position_of(b)) else {
            return;
        };
        let last = source.len().saturating_sub(1);
        let next = position.saturating_add(n);
        self.anchor = if next >= last { None } else { source.key_at(next) };
    }
}

impl Viewport for TerminalViewport {
    fn scroll_to_index(&mut self, index: MessageIndex, source: &dyn MessageSource) {
        let Some(position) = source.position_of(index) else {
            return;
        };
        let last = source.len().saturating_sub(1);
        let bottom = position.saturating_add(self.visible_count() - 1).min(last);
        self.anchor = if bottom == last { None } else { source.key_at(bottom) };
    }

    fn scroll_to_latest(&mut self) {
        self.anchor = None;
    }

    fn current_offset(&self, source: &dyn MessageSource) -> usize {
        let Some(position) = self.anchor.and_then(|a| source.position_of(a)) else {
            return 0;
        };
        source.len().saturating_sub(1).saturating_sub(position)
    }

    fn visible_count(&self) -> usize {
        self.height.max(1)
    }
}
