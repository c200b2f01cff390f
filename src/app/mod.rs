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

mod commands;
mod connect;
mod events;
mod state;
mod viewport;

pub use commands::{dispatch, handle_app_event, handle_backend_event, retry_failed_fetch, send_message};
pub use connect::create_app;
pub use events::handle_terminal_event;
pub use state::{App, AppEvent, Window};
pub use viewport::TerminalViewport;

use crate::window::WindowEvent;
use futures::{FutureExt as _, StreamExt};
use std::time::{Duration, Instant};

/// Clock for the inactivity timer.
const IDLE_TICK: Duration = Duration::from_secs(1);

pub async fn run_tui(app: &mut App) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    // Mouse wheel and focus reporting are optional; unsupported terminals just skip them
    let _ = crossterm::execute!(
        std::io::stdout(),
        crossterm::event::EnableMouseCapture,
        crossterm::event::EnableFocusChange,
    );

    // The window needs a real height before it decides where to scroll.
    let size = terminal.size()?;
    app.window.viewport_mut().set_height(crate::ui::body_height(size.height));
    dispatch(app, WindowEvent::Mount);
    if let Some(every) = app.incoming_every {
        app.backend.spawn_incoming(every, app.backend_tx.clone());
    }

    let mut events = crossterm::event::EventStream::new();
    let frame_duration = Duration::from_millis(16);
    let mut idle_clock = tokio::time::interval(IDLE_TICK);
    let mut last_render = Instant::now();

    loop {
        // Phase 1: wait for at least one event or the next frame tick
        let time_to_next = frame_duration.saturating_sub(last_render.elapsed());
        tokio::select! {
            Some(Ok(event)) = events.next() => {
                events::handle_terminal_event(app, event);
            }
            Some(event) = app.event_rx.recv() => {
                commands::handle_app_event(app, event);
            }
            Some(event) = app.backend_rx.recv() => {
                commands::handle_backend_event(app, event);
            }
            _ = idle_clock.tick() => {
                dispatch(app, WindowEvent::Tick);
            }
            () = tokio::time::sleep(time_to_next) => {}
        }

        // Phase 2: drain all remaining queued events (non-blocking)
        loop {
            // Terminal input first so scrolling stays responsive
            if let Some(Some(Ok(event))) = events.next().now_or_never() {
                events::handle_terminal_event(app, event);
                continue;
            }
            if let Ok(event) = app.event_rx.try_recv() {
                commands::handle_app_event(app, event);
                continue;
            }
            match app.backend_rx.try_recv() {
                Ok(event) => commands::handle_backend_event(app, event),
                Err(_) => break,
            }
        }

        if app.should_quit {
            break;
        }

        // Phase 3: render once
        terminal.draw(|f| crate::ui::render(f, app))?;
        last_render = Instant::now();
    }

    // Fetches still in flight settle into a torn-down window and are dropped.
    dispatch(app, WindowEvent::Teardown);

    let _ = crossterm::execute!(
        std::io::stdout(),
        crossterm::event::DisableMouseCapture,
        crossterm::event::DisableFocusChange,
    );
    ratatui::restore();
    Ok(())
}
