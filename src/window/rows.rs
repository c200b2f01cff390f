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

use super::virtual_list::MountedWindow;
use crate::store::{Message, MessageIndex, MessageSource};
use chrono::TimeZone;

/// Render-time facts about one mounted row. Nothing here is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView<'a> {
    pub index: MessageIndex,
    /// `None` for a deleted placeholder.
    pub message: Option<&'a Message>,
    /// Author changed relative to the preceding (older) message.
    pub show_author: bool,
    /// Calendar day changed relative to the preceding (older) message.
    pub day_break: bool,
    pub is_unread_marker: bool,
    pub highlighted: bool,
    pub is_last_message: bool,
}

impl RowView<'_> {
    pub fn is_deleted(&self) -> bool {
        self.message.is_none()
    }

    pub fn is_pending(&self) -> bool {
        self.message.is_some_and(|m| m.pending)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RowContext<'a> {
    pub unread_index: Option<MessageIndex>,
    pub target: Option<MessageIndex>,
    /// Our own identity; posts mentioning it are highlighted.
    pub our_identity: Option<&'a str>,
}

/// Annotate every mounted position, oldest first.
pub fn annotate<'a, Tz: TimeZone>(
    source: &'a dyn MessageSource,
    window: MountedWindow,
    ctx: RowContext<'_>,
    tz: &Tz,
) -> Vec<RowView<'a>> {
    let last = source.peek_largest();
    let mut rows = Vec::with_capacity(window.len());
    for position in window.positions() {
        let Some(index) = source.key_at(position) else {
            break;
        };
        let message = source.get(index).and_then(|node| node.post());
        let older = position
            .checked_sub(1)
            .and_then(|p| source.node_at(p))
            .map(|node| node.post());

        let is_unread_marker = ctx.unread_index == Some(index);
        let (show_author, day_break) = match (message, older) {
            (Some(msg), Some(Some(prev))) => {
                let changed_day = msg.time_sent.with_timezone(tz).date_naive()
                    != prev.time_sent.with_timezone(tz).date_naive();
                (msg.author != prev.author, changed_day && !is_unread_marker)
            }
            // Older neighbour is a tombstone or not loaded.
            (Some(_), _) => (true, false),
            (None, _) => (false, false),
        };

        let mentioned = match (message, ctx.our_identity) {
            (Some(msg), Some(me)) => msg.mentions(me),
            _ => false,
        };

        rows.push(RowView {
            index,
            message,
            show_author,
            day_break,
            is_unread_marker,
            highlighted: ctx.target == Some(index) || mentioned,
            is_last_message: last == Some(index),
        });
    }
    rows
}
