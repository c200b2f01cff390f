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

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    #[error("Message history could not be loaded")]
    HistoryUnreadable,
    #[error("Permalink does not name a message")]
    InvalidPermalink,
    #[error("Channel not found")]
    ChannelNotFound,
}

impl AppError {
    pub const HISTORY_UNREADABLE_EXIT_CODE: i32 = 20;
    pub const INVALID_PERMALINK_EXIT_CODE: i32 = 21;
    pub const CHANNEL_NOT_FOUND_EXIT_CODE: i32 = 22;

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::HistoryUnreadable => Self::HISTORY_UNREADABLE_EXIT_CODE,
            Self::InvalidPermalink => Self::INVALID_PERMALINK_EXIT_CODE,
            Self::ChannelNotFound => Self::CHANNEL_NOT_FOUND_EXIT_CODE,
        }
    }

    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::HistoryUnreadable => {
                "Message history could not be read. Check the --history path and JSON format."
            }
            Self::InvalidPermalink => {
                "The permalink has no `msg` parameter. Expected something like `/chat/general?msg=42`."
            }
            Self::ChannelNotFound => "The requested channel has no messages to show.",
        }
    }
}

/// Failure of a single page request. The window never retries on its own.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("page request timed out")]
    Timeout,
    #[error("channel not found")]
    ChannelNotFound,
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("failed to read history file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid history JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate message index {0}")]
    DuplicateIndex(crate::store::MessageIndex),
}
