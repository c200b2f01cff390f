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

mod chat;
mod header;
mod layout;
pub mod theme;

pub use layout::body_height;

use crate::app::App;
use crate::window::{Direction, FetchGate};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

pub fn render(frame: &mut Frame, app: &mut App) {
    let areas = layout::compute(frame.area());

    if areas.header.height > 0 {
        header::render(frame, areas.header, app);
        render_separator(frame, areas.header_sep);
    }

    chat::render(frame, areas.body, app);

    if let Some(footer_area) = areas.footer {
        render_separator(frame, areas.footer_sep);
        render_footer(frame, footer_area, app);
    }
}

const FOOTER_PAD: u16 = 2;
const KEY_HELP: &[(&str, &str)] = &[
    ("↑↓", "scroll"),
    ("u", "unread"),
    ("End", "latest"),
    ("s", "send"),
    ("q", "quit"),
];

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let padded = Rect {
        x: area.x + FOOTER_PAD,
        y: area.y,
        width: area.width.saturating_sub(FOOTER_PAD * 2),
        height: area.height,
    };

    let mut help = Vec::new();
    for (i, (key, label)) in KEY_HELP.iter().enumerate() {
        if i > 0 {
            help.push(Span::raw("  "));
        }
        help.push(Span::styled(*key, Style::default().fg(Color::White)));
        help.push(Span::styled(format!(" {label}"), Style::default().fg(theme::DIM)));
    }

    let [left, right] =
        Layout::horizontal([Constraint::Min(0), Constraint::Percentage(50)]).areas(padded);
    frame.render_widget(Paragraph::new(Line::from(help)), left);
    if let Some((text, color)) = footer_status(app) {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(text, Style::default().fg(color))))
                .alignment(Alignment::Right),
            right,
        );
    }
}

/// Fetch failure first, then loading, then the jump-to-latest hint.
fn footer_status(app: &App) -> Option<(String, Color)> {
    if let Some((direction, error)) = &app.last_fetch_error {
        return Some((
            format!("Loading {} messages failed: {error} · r to retry", direction.label()),
            theme::STATUS_ERROR,
        ));
    }
    for direction in [Direction::Older, Direction::Newer] {
        if app.window.gate(direction) == FetchGate::Pending {
            return Some((format!("Loading {} messages…", direction.label()), theme::STATUS_LOADING));
        }
    }
    let graph = app.graph.borrow();
    if !app.window.is_at_end(&*graph) {
        return Some(("↓ Jump to latest (End)".to_owned(), theme::ACCENT));
    }
    None
}

fn render_separator(frame: &mut Frame, area: Rect) {
    if area.height == 0 {
        return;
    }
    let rule = theme::SEPARATOR_CHAR.repeat(usize::from(area.width));
    frame.render_widget(Paragraph::new(Span::styled(rule, Style::default().fg(theme::DIM))), area);
}
