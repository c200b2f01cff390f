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

use super::state::{App, AppEvent};
use crate::backend::{BackendEvent, LatestPage};
use crate::window::{Command, Direction, PageFetcher as _, WindowEvent};
use std::collections::VecDeque;
use std::rc::Rc;

/// Feed one event to the window and run every command it produces.
///
/// Commands that change the data the window reads queue a follow-up `Update`.
/// A replaced collection queues `Reset` instead.
pub fn dispatch(app: &mut App, event: WindowEvent) {
    let mut queue = VecDeque::from([event]);
    while let Some(event) = queue.pop_front() {
        let commands = {
            let graph = app.graph.borrow();
            app.window.handle(event, &*graph, app.unread_count)
        };
        let mut replaced = false;
        for command in commands {
            // Page requests decided against a replaced collection are stale; Reset asks again.
            if replaced && matches!(command, Command::Fetch(_)) {
                continue;
            }
            if let Some(follow_up) = execute(app, command) {
                replaced |= follow_up == WindowEvent::Reset;
                queue.push_back(follow_up);
            }
        }
    }
}

/// Returns the event to feed back when the command changed what the window reads.
fn execute(app: &mut App, command: Command) -> Option<WindowEvent> {
    match command {
        Command::Fetch(direction) => {
            spawn_fetch(app, direction);
            None
        }
        Command::DismissUnread => {
            tracing::info!(channel = %app.channel, unread = app.unread_count, "unread dismissed");
            let changed = app.unread_count != 0;
            app.unread_count = 0;
            changed.then_some(WindowEvent::Update)
        }
        Command::GetMostRecent => match app.backend.jump_to_latest() {
            LatestPage::Extended(added) => {
                tracing::debug!(added, "loaded most recent page");
                (added > 0).then_some(WindowEvent::Update)
            }
            LatestPage::Replaced => {
                app.last_fetch_error = None;
                Some(WindowEvent::Reset)
            }
        },
        Command::FetchFailed { direction, error } => {
            app.last_fetch_error = Some((direction, error));
            None
        }
    }
}

fn spawn_fetch(app: &App, direction: Direction) {
    let backend = Rc::clone(&app.backend);
    let tx = app.event_tx.clone();
    tokio::task::spawn_local(async move {
        let result = backend.fetch_more(direction).await;
        // Receiver is gone once the app has shut down.
        let _ = tx.send(AppEvent::FetchSettled { direction, result });
    });
}

pub fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::FetchSettled { direction, result } => {
            if result.is_ok() && app.last_fetch_error.as_ref().is_some_and(|(d, _)| *d == direction) {
                app.last_fetch_error = None;
            }
            dispatch(app, WindowEvent::Update);
            dispatch(app, WindowEvent::FetchSettled { direction, result });
        }
    }
}

pub fn handle_backend_event(app: &mut App, event: BackendEvent) {
    match event {
        BackendEvent::Incoming { index, ours } => {
            if !ours {
                app.unread_count += 1;
            }
            tracing::trace!(%index, ours, unread = app.unread_count, "message arrived");
            dispatch(app, WindowEvent::Update);
        }
        BackendEvent::Acknowledged(sent) => {
            tracing::debug!(index = %sent.index, nonce = %sent.nonce, "message acknowledged");
        }
    }
}

/// Send a canned message as pending and schedule its acknowledgement.
pub fn send_message(app: &mut App, text: &str) {
    let sent = app.backend.send(text);
    app.backend.spawn_ack(sent, app.backend_tx.clone());
    dispatch(app, WindowEvent::Update);
}

/// Retry the direction whose last page request failed.
pub fn retry_failed_fetch(app: &mut App) {
    if let Some((direction, _)) = app.last_fetch_error.take() {
        dispatch(app, WindowEvent::RetryFetch(direction));
    }
}
