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

/// Locate the oldest unread message that is still a real post.
///
/// Starts at position `len - unread_count` and steps through the unread
/// episode toward the newest message until a non-deleted post is found.
/// Returns `None` when there is nothing unread, when the boundary lies in
/// history that has not been loaded yet, or when every unread slot is a
/// tombstone.
pub fn calculate_unread_index(source: &dyn MessageSource, unread_count: usize) -> Option<MessageIndex> {
    let len = source.len();
    if unread_count == 0 || unread_count > len {
        return None;
    }

    let mut attempted = unread_count;
    while attempted > 0 {
        let position = len - attempted;
        let index = source.key_at(position)?;
        match source.get(index) {
            Some(node) if !node.is_deleted() => return Some(index),
            _ => attempted -= 1,
        }
    }
    tracing::debug!(unread_count, "every unread slot is deleted; no unread boundary");
    None
}
