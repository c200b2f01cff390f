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

use super::viewport::TerminalViewport;
use crate::backend::{BackendEvent, DemoBackend, SharedGraph};
use crate::error::FetchError;
use crate::window::{ChatWindow, Direction, FetchOutcome, SharedFocus};
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::mpsc;

pub type Window = ChatWindow<TerminalViewport, SharedFocus>;

/// Results from background tasks spawned by the app.
#[derive(Debug)]
pub enum AppEvent {
    FetchSettled { direction: Direction, result: Result<FetchOutcome, FetchError> },
}

pub struct App {
    pub channel: String,
    pub our_identity: String,
    pub graph: SharedGraph,
    pub backend: Rc<DemoBackend>,
    pub window: Window,
    /// Shared with the window; flipped by terminal focus events.
    pub focus: SharedFocus,
    /// Owned by the notification side; the window only reads it.
    pub unread_count: usize,
    /// Most recent page failure, cleared when that direction loads again.
    pub last_fetch_error: Option<(Direction, FetchError)>,
    pub should_quit: bool,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
    pub event_rx: mpsc::UnboundedReceiver<AppEvent>,
    pub backend_tx: mpsc::UnboundedSender<BackendEvent>,
    pub backend_rx: mpsc::UnboundedReceiver<BackendEvent>,
    /// Interval of the simulated subscription; `None` disables it.
    pub incoming_every: Option<Duration>,
}

impl App {
    pub fn new(
        channel: String,
        our_identity: String,
        backend: Rc<DemoBackend>,
        window: Window,
        focus: SharedFocus,
        unread_count: usize,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (backend_tx, backend_rx) = mpsc::unbounded_channel();
        Self {
            channel,
            our_identity,
            graph: Rc::clone(backend.graph()),
            backend,
            window,
            focus,
            unread_count,
            last_fetch_error: None,
            should_quit: false,
            event_tx,
            event_rx,
            backend_tx,
            backend_rx,
            incoming_every: None,
        }
    }

    /// Small app over a synthetic 100-message channel with instant pages.
    pub fn test_default() -> Self {
        use crate::backend::{BackendConfig, history};
        use crate::window::WindowPolicy;

        let config = BackendConfig {
            page_size: 20,
            latency: Duration::ZERO,
            ..BackendConfig::default()
        };
        let remote = history::synthetic(100, &config.our_identity, chrono::Utc::now());
        let our_identity = config.our_identity.clone();
        let backend = DemoBackend::new(remote, SharedGraph::default(), config);
        backend.load_latest();

        let focus = SharedFocus::new(true);
        let mut viewport = TerminalViewport::default();
        viewport.set_height(10);
        let window = ChatWindow::new(viewport, focus.clone(), WindowPolicy::default(), None);
        Self::new("general".to_owned(), our_identity, backend, window, focus, 0)
    }
}
