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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Position of a message in channel order, derived from the backend sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageIndex(pub u64);

impl MessageIndex {
    #[must_use]
    pub const fn new(seq: u64) -> Self {
        Self(seq)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MessageIndex {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Backend renders large sequence numbers with `.` group separators.
        let digits: String = s.trim().chars().filter(|c| *c != '.').collect();
        digits.parse().map(Self)
    }
}

impl From<u64> for MessageIndex {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Content {
    Text(String),
    Url(String),
    Code(String),
    Mention(String),
}

impl Content {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(s) | Self::Url(s) | Self::Code(s) | Self::Mention(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub author: String,
    pub contents: Vec<Content>,
    pub time_sent: DateTime<Utc>,
    /// Submitted locally, not yet acknowledged by the backend.
    #[serde(default)]
    pub pending: bool,
}

impl Message {
    pub fn new(author: impl Into<String>, contents: Vec<Content>, time_sent: DateTime<Utc>) -> Self {
        Self { author: author.into(), contents, time_sent, pending: false }
    }

    #[must_use]
    pub fn text(author: impl Into<String>, text: impl Into<String>, time_sent: DateTime<Utc>) -> Self {
        Self::new(author, vec![Content::Text(text.into())], time_sent)
    }

    #[must_use]
    pub fn into_pending(mut self) -> Self {
        self.pending = true;
        self
    }

    /// Concatenated plain text of all content parts.
    pub fn plain_text(&self) -> String {
        self.contents.iter().map(Content::as_str).collect()
    }

    pub fn mentions(&self, who: &str) -> bool {
        self.contents.iter().any(|c| matches!(c, Content::Mention(m) if m == who))
    }
}

/// A slot in the collection. Deleted posts keep their slot as a tombstone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageNode {
    Post(Message),
    Deleted,
}

impl MessageNode {
    pub fn post(&self) -> Option<&Message> {
        match self {
            Self::Post(msg) => Some(msg),
            Self::Deleted => None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted)
    }
}

impl From<Message> for MessageNode {
    fn from(value: Message) -> Self {
        Self::Post(value)
    }
}
