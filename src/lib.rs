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

pub mod app;
pub mod backend;
pub mod error;
pub mod permalink;
pub mod store;
pub mod ui;
pub mod window;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "landscape-chat", about = "Terminal chat window over a virtualized message list")]
pub struct Cli {
    /// Channel name shown in the header and used for permalinks
    #[arg(long, default_value = "general")]
    pub channel: String,

    /// JSON file holding the channel history (array of index-tagged nodes)
    #[arg(long, value_name = "PATH")]
    pub history: Option<std::path::PathBuf>,

    /// Size of the generated history when no --history is given
    #[arg(long, value_name = "N", default_value_t = 500)]
    pub messages: usize,

    /// Messages delivered per page request
    #[arg(long, default_value_t = 50)]
    pub page_size: usize,

    /// Unread count at startup
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub unread: usize,

    /// Open scrolled to the message a permalink points at
    #[arg(long, value_name = "URL", conflicts_with = "scroll_to")]
    pub permalink: Option<String>,

    /// Open scrolled to this message index
    #[arg(long, value_name = "INDEX")]
    pub scroll_to: Option<crate::store::MessageIndex>,

    /// Simulated latency of each page request, in milliseconds
    #[arg(long, default_value_t = 250)]
    pub latency_ms: u64,

    /// Deliver a new message from another author at this interval
    #[arg(long, value_name = "MS")]
    pub incoming_every_ms: Option<u64>,

    /// Fail page requests that take longer than this, in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Make every Nth page request fail
    #[arg(long, value_name = "N")]
    pub fail_every: Option<u32>,

    /// Write tracing diagnostics to a file (enables logging when set)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<std::path::PathBuf>,

    /// Tracing filter directives (e.g. `info,landscape_chat::window=trace`)
    /// Falls back to `RUST_LOG` when omitted.
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,

    /// Append to --log-file instead of truncating on startup
    #[arg(long)]
    pub log_append: bool,
}
