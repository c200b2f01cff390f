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

use super::state::App;
use super::viewport::TerminalViewport;
use crate::Cli;
use crate::backend::{BackendConfig, DemoBackend, SharedGraph, history};
use crate::error::AppError;
use crate::permalink::{parse_permalink, permalink_for};
use crate::store::MessageIndex;
use crate::window::{ChatWindow, SharedFocus, default_window_policy};
use std::time::Duration;

/// Build the app from CLI flags. Runs before `ratatui::init()` so errors
/// print to stderr normally.
pub fn create_app(cli: &Cli) -> anyhow::Result<App> {
    let config = BackendConfig {
        page_size: cli.page_size.max(1),
        latency: Duration::from_millis(cli.latency_ms),
        fail_every: cli.fail_every.filter(|n| *n > 0),
        timeout: cli.timeout_ms.map(Duration::from_millis),
        ..BackendConfig::default()
    };

    let remote = match cli.history.as_deref() {
        Some(path) => {
            let remote = history::load(path).map_err(|e| {
                tracing::error!(path = %path.display(), error = %e, "history load failed");
                anyhow::Error::new(AppError::HistoryUnreadable).context(e)
            })?;
            if remote.is_empty() {
                return Err(AppError::ChannelNotFound.into());
            }
            remote
        }
        None => history::synthetic(cli.messages, &config.our_identity, chrono::Utc::now()),
    };

    let target = resolve_target(cli)?;
    let our_identity = config.our_identity.clone();
    let backend = DemoBackend::new(remote, SharedGraph::default(), config);
    let loaded = match target {
        Some(index) => backend.load_around(index),
        None => backend.load_latest(),
    };
    tracing::info!(
        channel = %cli.channel,
        remote = backend.remote_len(),
        loaded,
        target = ?target,
        "channel opened"
    );
    if let Some(index) = target {
        tracing::debug!(link = %permalink_for(&cli.channel, index), "opening at permalink");
    }

    let focus = SharedFocus::new(true);
    let window = ChatWindow::new(
        TerminalViewport::default(),
        focus.clone(),
        *default_window_policy(),
        target,
    );
    let mut app = App::new(cli.channel.clone(), our_identity, backend, window, focus, cli.unread);
    app.incoming_every = cli.incoming_every_ms.filter(|ms| *ms > 0).map(Duration::from_millis);
    Ok(app)
}

fn resolve_target(cli: &Cli) -> anyhow::Result<Option<MessageIndex>> {
    if let Some(link) = cli.permalink.as_deref() {
        return match parse_permalink(link) {
            Some(index) => Ok(Some(index)),
            None => {
                tracing::warn!(link, "permalink without a message parameter");
                Err(AppError::InvalidPermalink.into())
            }
        };
    }
    Ok(cli.scroll_to)
}
