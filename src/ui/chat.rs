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
use crate::store::{Content, Message, MessageSource as _};
use crate::ui::theme;
use crate::window::RowView;
use chrono::{Local, TimeZone};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};

pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
    app.window.viewport_mut().set_height(usize::from(area.height));
    render_in(frame, area, app, &Local);
}

#[allow(clippy::cast_possible_truncation)]
fn render_in<Tz: TimeZone>(frame: &mut Frame, area: Rect, app: &App, tz: &Tz)
where
    Tz::Offset: std::fmt::Display,
{
    let graph = app.graph.borrow();
    if graph.is_empty() {
        let text = if app.window.gate(crate::window::Direction::Older).is_pending() {
            "Loading history..."
        } else {
            "No messages yet."
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(text, Style::default().fg(theme::DIM)))),
            area,
        );
        return;
    }

    let bottom = app.window.viewport().bottom(&*graph);
    let rows = app.window.rows(&*graph, Some(app.our_identity.as_str()), tz);
    let mut lines = Vec::new();
    for row in rows.iter().filter(|row| bottom.is_none_or(|b| row.index <= b)) {
        lines.extend(row_lines(row, &app.our_identity, tz, area.width));
    }

    // line_count gives the real wrapped height; the newest visible row sits on the last line.
    let paragraph = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false });
    let content_height = paragraph.line_count(area.width);
    let viewport_height = usize::from(area.height);

    if content_height <= viewport_height {
        let offset = (viewport_height - content_height) as u16;
        let render_area = Rect {
            x: area.x,
            y: area.y + offset,
            width: area.width,
            height: content_height as u16,
        };
        frame.render_widget(paragraph, render_area);
    } else {
        let scroll = (content_height - viewport_height).min(usize::from(u16::MAX)) as u16;
        frame.render_widget(paragraph.scroll((scroll, 0)), area);
    }
}

fn row_lines<Tz: TimeZone>(
    row: &RowView<'_>,
    our_identity: &str,
    tz: &Tz,
    width: u16,
) -> Vec<Line<'static>>
where
    Tz::Offset: std::fmt::Display,
{
    let mut lines = Vec::new();

    if row.is_unread_marker {
        lines.push(divider("New messages", theme::UNREAD_MARKER, width));
    }

    let Some(message) = row.message else {
        lines.push(Line::from(Span::styled(
            theme::DELETED_PLACEHOLDER,
            Style::default().fg(theme::DIM).add_modifier(Modifier::ITALIC),
        )));
        return lines;
    };

    let local = message.time_sent.with_timezone(tz);
    if row.day_break {
        lines.push(divider(&local.format("%A, %B %-d").to_string(), theme::DIM, width));
    }
    if row.show_author {
        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::styled(
                message.author.clone(),
                Style::default()
                    .fg(theme::author_color(&message.author, our_identity))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", local.format("%H:%M")), Style::default().fg(theme::DIM)),
        ]));
    }

    let mut body = Line::from(content_spans(message));
    if row.is_pending() {
        body.spans.push(Span::raw("  (sending)"));
        body = body.patch_style(Style::default().fg(theme::DIM));
    }
    if row.highlighted {
        body = body.patch_style(Style::default().bg(theme::HIGHLIGHT_BG));
    }
    lines.push(body);
    lines
}

fn content_spans(message: &Message) -> Vec<Span<'static>> {
    message
        .contents
        .iter()
        .map(|content| match content {
            Content::Text(text) => Span::raw(text.clone()),
            Content::Url(url) => {
                Span::styled(url.clone(), Style::default().add_modifier(Modifier::UNDERLINED))
            }
            Content::Code(code) => Span::styled(code.clone(), Style::default().bg(theme::CODE_BG)),
            Content::Mention(who) => Span::styled(
                format!("~{who}"),
                Style::default().fg(theme::MENTION).add_modifier(Modifier::BOLD),
            ),
        })
        .collect()
}

fn divider(label: &str, color: ratatui::style::Color, width: u16) -> Line<'static> {
    let label_width = unicode_width::UnicodeWidthStr::width(label) + 2;
    let side = usize::from(width).saturating_sub(label_width) / 2;
    let rule = theme::SEPARATOR_CHAR.repeat(side);
    Line::from(Span::styled(format!("{rule} {label} {rule}"), Style::default().fg(color)))
}
