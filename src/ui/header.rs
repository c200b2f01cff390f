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

use crate::app::App;
use crate::window::UnreadNotice;
use crate::ui::theme;
use chrono::Local;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

const HEADER_PAD: u16 = 2;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let padded = Rect {
        x: area.x + HEADER_PAD,
        y: area.y,
        width: area.width.saturating_sub(HEADER_PAD * 2),
        height: area.height,
    };

    let mut spans = vec![Span::styled(
        format!("# {}", app.channel),
        Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
    )];

    let notice = {
        let graph = app.graph.borrow();
        app.window.unread_notice(&*graph, app.unread_count, Some(app.our_identity.as_str()))
    };
    if let Some(notice) = notice {
        spans.push(Span::styled("  \u{2502}  ", Style::default().fg(theme::DIM)));
        spans.push(Span::styled(notice_text(&notice), Style::default().fg(Color::White)));
        spans.push(Span::styled("  (u to jump)", Style::default().fg(theme::DIM)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), padded);
}

fn notice_text(notice: &UnreadNotice) -> String {
    let noun = if notice.count == 1 { "message" } else { "messages" };
    match notice.since {
        Some(at) => {
            let local = at.with_timezone(&Local);
            format!("{} new {noun} since {}", notice.count, local.format("%H:%M on %B %-d"))
        }
        None => format!("{} new {noun}", notice.count),
    }
}
