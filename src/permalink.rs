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

use crate::store::MessageIndex;
use url::Url;

const MSG_PARAM: &str = "msg";

fn base() -> Option<Url> {
    Url::parse("chat://local/").ok()
}

/// Extract the deep-link target from a permalink URL, path, or bare query.
pub fn parse_permalink(input: &str) -> Option<MessageIndex> {
    let input = input.trim();
    let url = match Url::parse(input) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => base()?.join(input).ok()?,
        Err(_) => return None,
    };
    url.query_pairs()
        .find(|(key, _)| key == MSG_PARAM)
        .and_then(|(_, value)| value.parse().ok())
}

/// Relative permalink for a message in a channel.
pub fn permalink_for(channel: &str, index: MessageIndex) -> String {
    let Some(mut url) = base() else {
        return format!("/chat/{channel}?{MSG_PARAM}={index}");
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().push("chat").push(channel);
    }
    url.query_pairs_mut().append_pair(MSG_PARAM, &index.to_string());
    match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_owned(),
    }
}
