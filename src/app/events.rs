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

use super::commands::{dispatch, retry_failed_fetch, send_message};
use super::state::App;
use crate::window::{Viewport as _, WindowEvent};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};

const MOUSE_SCROLL_MESSAGES: usize = 3;
const FAST_SCROLL_MESSAGES: usize = 5;
const CANNED_REPLY: &str = "on it, will report back shortly";

pub fn handle_terminal_event(app: &mut App, event: Event) {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        Event::FocusGained => {
            app.focus.set(true);
            dispatch(app, WindowEvent::FocusChanged(true));
        }
        Event::FocusLost => {
            app.focus.set(false);
            dispatch(app, WindowEvent::FocusChanged(false));
        }
        // Resize is picked up by the next render
        _ => {}
    }
}

fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => scroll_up(app, MOUSE_SCROLL_MESSAGES),
        MouseEventKind::ScrollDown => scroll_down(app, MOUSE_SCROLL_MESSAGES),
        _ => {}
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    let page = app.window.viewport().visible_count().saturating_sub(1).max(1);
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => app.should_quit = true,
        (KeyCode::Char('q') | KeyCode::Esc, _) => app.should_quit = true,
        (KeyCode::Up, m) if m.contains(KeyModifiers::CONTROL) => {
            scroll_up(app, FAST_SCROLL_MESSAGES);
        }
        (KeyCode::Down, m) if m.contains(KeyModifiers::CONTROL) => {
            scroll_down(app, FAST_SCROLL_MESSAGES);
        }
        (KeyCode::Up | KeyCode::Char('k'), _) => scroll_up(app, 1),
        (KeyCode::Down | KeyCode::Char('j'), _) => scroll_down(app, 1),
        (KeyCode::PageUp, _) => scroll_up(app, page),
        (KeyCode::PageDown, _) => scroll_down(app, page),
        (KeyCode::End | KeyCode::Char('G'), _) => dispatch(app, WindowEvent::JumpToLatest),
        (KeyCode::Char('u'), _) => dispatch(app, WindowEvent::JumpToUnread),
        (KeyCode::Char('r'), _) => retry_failed_fetch(app),
        (KeyCode::Char('s'), _) => send_message(app, CANNED_REPLY),
        _ => {}
    }
}

fn scroll_up(app: &mut App, n: usize) {
    {
        let graph = app.graph.borrow();
        app.window.viewport_mut().scroll_up(&*graph, n);
    }
    notify_scrolled(app);
}

fn scroll_down(app: &mut App, n: usize) {
    {
        let graph = app.graph.borrow();
        app.window.viewport_mut().scroll_down(&*graph, n);
    }
    notify_scrolled(app);
}

fn notify_scrolled(app: &mut App) {
    let offset = {
        let graph = app.graph.borrow();
        app.window.viewport().current_offset(&*graph)
    };
    dispatch(app, WindowEvent::Scroll { offset });
}
