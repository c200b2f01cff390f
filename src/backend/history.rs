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

use crate::error::HistoryError;
use crate::store::{Content, Message, MessageIndex, MessageNode};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

const AUTHORS: &[&str] = &["zod", "nec", "bus", "wes", "sev", "per"];
const LINES: &[&str] = &[
    "morning all",
    "has anyone tried the new build?",
    "pushed a fix for the sync stall",
    "looks good to me",
    "can we move standup to 10?",
    "reading through the design doc now",
    "the relay was down for a few minutes",
    "ack",
    "will review after lunch",
    "that is exactly the edge case I hit yesterday",
];

/// Gap between synthetic messages; spreads a few hundred posts over several days.
const SPACING_MINUTES: i64 = 37;
const DELETED_EVERY: u64 = 47;
const MENTION_EVERY: u64 = 29;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub index: MessageIndex,
    #[serde(flatten)]
    pub node: MessageNode,
}

/// Remote-side history, oldest first, unique indices.
pub type History = Vec<(MessageIndex, MessageNode)>;

/// Deterministic channel backlog of `count` messages ending at `now`.
#[allow(clippy::cast_possible_truncation)]
pub fn synthetic(count: usize, our_identity: &str, now: DateTime<Utc>) -> History {
    let count = count as u64;
    (1..=count)
        .map(|seq| {
            let index = MessageIndex(seq);
            if seq % DELETED_EVERY == 0 {
                return (index, MessageNode::Deleted);
            }
            let back = i64::try_from(count - seq).unwrap_or(i64::MAX / SPACING_MINUTES);
            let time_sent = now - Duration::minutes(back.saturating_mul(SPACING_MINUTES));
            let author = AUTHORS[(seq as usize / 3) % AUTHORS.len()];
            let line = LINES[(seq as usize * 7) % LINES.len()];
            let mut contents = vec![Content::Text(line.to_owned())];
            if seq % MENTION_EVERY == 0 && author != our_identity {
                contents.push(Content::Text(" cc ".to_owned()));
                contents.push(Content::Mention(our_identity.to_owned()));
            }
            (index, MessageNode::Post(Message::new(author, contents, time_sent)))
        })
        .collect()
}

/// Load a JSON array of `{"index": .., "kind": "post" | "deleted", ..}` entries.
pub fn load(path: &Path) -> Result<History, HistoryError> {
    let raw = std::fs::read_to_string(path)?;
    let entries: Vec<HistoryEntry> = serde_json::from_str(&raw)?;
    let mut sorted = BTreeMap::new();
    for entry in entries {
        if sorted.insert(entry.index, entry.node).is_some() {
            return Err(HistoryError::DuplicateIndex(entry.index));
        }
    }
    tracing::info!(path = %path.display(), messages = sorted.len(), "loaded history");
    Ok(sorted.into_iter().collect())
}
