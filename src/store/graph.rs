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

use super::message::{Message, MessageIndex, MessageNode};
use std::collections::BTreeMap;
use std::ops::Range;

/// Read side of an ordered message collection.
///
/// Positions are ascending ranks: position 0 is the oldest loaded message and
/// `len() - 1` the newest. The window never mutates the collection.
pub trait MessageSource {
    fn len(&self) -> usize;

    fn get(&self, index: MessageIndex) -> Option<&MessageNode>;

    fn key_at(&self, position: usize) -> Option<MessageIndex>;

    fn position_of(&self, index: MessageIndex) -> Option<usize>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, index: MessageIndex) -> bool {
        self.get(index).is_some()
    }

    /// Largest key currently loaded.
    fn peek_largest(&self) -> Option<MessageIndex> {
        self.len().checked_sub(1).and_then(|last| self.key_at(last))
    }

    fn node_at(&self, position: usize) -> Option<&MessageNode> {
        self.key_at(position).and_then(|index| self.get(index))
    }

    /// Keys for a clamped range of positions.
    fn range(&self, positions: Range<usize>) -> Vec<MessageIndex> {
        let end = positions.end.min(self.len());
        (positions.start.min(end)..end).filter_map(|p| self.key_at(p)).collect()
    }
}

/// In-memory sorted collection fed by subscription updates and page fetches.
#[derive(Debug, Clone, Default)]
pub struct MessageGraph {
    nodes: BTreeMap<MessageIndex, MessageNode>,
    /// Sorted mirror of `nodes` keys for O(1) rank lookups.
    keys: Vec<MessageIndex>,
}

impl MessageGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a node. Returns true when the key is new.
    pub fn insert(&mut self, index: MessageIndex, node: impl Into<MessageNode>) -> bool {
        let is_new = self.nodes.insert(index, node.into()).is_none();
        if is_new {
            match self.keys.last() {
                Some(last) if *last < index => self.keys.push(index),
                None => self.keys.push(index),
                Some(_) => {
                    let at = self.keys.partition_point(|k| *k < index);
                    self.keys.insert(at, index);
                }
            }
        }
        is_new
    }

    /// Merge a page of nodes. Returns how many keys were new.
    pub fn extend<I, N>(&mut self, page: I) -> usize
    where
        I: IntoIterator<Item = (MessageIndex, N)>,
        N: Into<MessageNode>,
    {
        let mut added = 0;
        for (index, node) in page {
            if self.insert(index, node) {
                added += 1;
            }
        }
        added
    }

    /// Clear the pending flag once the backend has acknowledged the post.
    pub fn acknowledge(&mut self, index: MessageIndex) -> bool {
        match self.nodes.get_mut(&index) {
            Some(MessageNode::Post(msg)) if msg.pending => {
                msg.pending = false;
                true
            }
            _ => false,
        }
    }

    /// Replace a post with a tombstone, keeping its slot.
    pub fn delete(&mut self, index: MessageIndex) -> bool {
        match self.nodes.get_mut(&index) {
            Some(node @ MessageNode::Post(_)) => {
                *node = MessageNode::Deleted;
                true
            }
            _ => false,
        }
    }

    /// Drop every node, e.g. before loading a range that does not join the current one.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.keys.clear();
    }

    pub fn smallest(&self) -> Option<MessageIndex> {
        self.keys.first().copied()
    }

    pub fn post(&self, index: MessageIndex) -> Option<&Message> {
        self.nodes.get(&index).and_then(MessageNode::post)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (MessageIndex, &MessageNode)> {
        self.nodes.iter().map(|(k, v)| (*k, v))
    }
}

impl MessageSource for MessageGraph {
    fn len(&self) -> usize {
        self.keys.len()
    }

    fn get(&self, index: MessageIndex) -> Option<&MessageNode> {
        self.nodes.get(&index)
    }

    fn key_at(&self, position: usize) -> Option<MessageIndex> {
        self.keys.get(position).copied()
    }

    fn position_of(&self, index: MessageIndex) -> Option<usize> {
        self.keys.binary_search(&index).ok()
    }
}
