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

use ratatui::style::Color;

// Accent
pub const ACCENT: Color = Color::Rgb(244, 118, 0);

// UI chrome
pub const DIM: Color = Color::DarkGray;
pub const SEPARATOR_CHAR: &str = "─";

// Author colors
pub const AUTHOR_SELF: Color = Color::White;
pub const AUTHOR_OTHER: Color = ACCENT;

// Row decorations
pub const HIGHLIGHT_BG: Color = Color::Rgb(40, 44, 52);
pub const CODE_BG: Color = Color::Rgb(30, 30, 30);
pub const MENTION: Color = Color::Yellow;
pub const UNREAD_MARKER: Color = Color::Red;

// Status colors (footer fetch state)
pub const STATUS_LOADING: Color = Color::Cyan;
pub const STATUS_ERROR: Color = Color::Red;

pub const DELETED_PLACEHOLDER: &str = "This message has been deleted.";

pub fn author_color(author: &str, our_identity: &str) -> Color {
    if author == our_identity { AUTHOR_SELF } else { AUTHOR_OTHER }
}
