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

use super::fetch::Direction;
use super::policy::WindowPolicy;
use super::rows::{RowContext, RowView, annotate};
use super::state::{FetchGate, WindowPhase, WindowState};
use super::transition::{Effect, Inputs, WindowEvent, step};
use super::virtual_list::MountedWindow;
use crate::error::FetchError;
use crate::store::{MessageIndex, MessageSource};
use chrono::{DateTime, TimeZone, Utc};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Scroll capability of whatever layer draws the list.
pub trait Viewport {
    /// Bring `index` into view as the oldest visible row, or as close to it
    /// as the loaded history allows.
    fn scroll_to_index(&mut self, index: MessageIndex, source: &dyn MessageSource);

    fn scroll_to_latest(&mut self);

    /// Messages between the newest loaded message and the newest visible one.
    fn current_offset(&self, source: &dyn MessageSource) -> usize;

    /// Upper bound on how many messages fit on screen at once.
    fn visible_count(&self) -> usize;
}

/// Whether the reader is currently looking at the window.
pub trait FocusProvider {
    fn has_focus(&self) -> bool;
}

/// Focus flag shared between the event loop and the window.
#[derive(Debug, Clone)]
pub struct SharedFocus(Rc<Cell<bool>>);

impl SharedFocus {
    #[must_use]
    pub fn new(focused: bool) -> Self {
        Self(Rc::new(Cell::new(focused)))
    }

    pub fn set(&self, focused: bool) {
        self.0.set(focused);
    }
}

impl Default for SharedFocus {
    fn default() -> Self {
        Self::new(true)
    }
}

impl FocusProvider for SharedFocus {
    fn has_focus(&self) -> bool {
        self.0.get()
    }
}

/// Requests the window hands back to its host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Fetch(Direction),
    DismissUnread,
    GetMostRecent,
    FetchFailed { direction: Direction, error: FetchError },
}

/// Banner shown while an unread episode is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreadNotice {
    pub count: usize,
    pub boundary: Option<MessageIndex>,
    /// Time of the first unread message; omitted when we wrote the only one.
    pub since: Option<DateTime<Utc>>,
}

/// Virtualized message list driven by discrete events.
pub struct ChatWindow<V, F> {
    state: WindowState,
    viewport: V,
    focus: F,
    policy: WindowPolicy,
    target: Option<MessageIndex>,
}

impl<V: Viewport, F: FocusProvider> ChatWindow<V, F> {
    pub fn new(viewport: V, focus: F, policy: WindowPolicy, target: Option<MessageIndex>) -> Self {
        Self { state: WindowState::default(), viewport, focus, policy, target }
    }

    pub fn handle(
        &mut self,
        event: WindowEvent,
        source: &dyn MessageSource,
        unread_count: usize,
    ) -> Vec<Command> {
        self.handle_at(event, source, unread_count, Instant::now())
    }

    /// Run one transition and apply its scroll effects to the viewport.
    pub fn handle_at(
        &mut self,
        event: WindowEvent,
        source: &dyn MessageSource,
        unread_count: usize,
        now: Instant,
    ) -> Vec<Command> {
        let inputs = Inputs {
            source,
            unread_count,
            target: self.target,
            has_focus: self.focus.has_focus(),
            offset: self.viewport.current_offset(source),
            visible: self.viewport.visible_count(),
            now,
            policy: &self.policy,
        };
        let transition = step(&self.state, &event, &inputs);
        self.state = transition.state;

        let mut commands = Vec::new();
        for effect in transition.effects {
            match effect {
                Effect::ScrollToIndex(index) => self.viewport.scroll_to_index(index, source),
                Effect::ScrollToLatest => self.viewport.scroll_to_latest(),
                Effect::Fetch(direction) => commands.push(Command::Fetch(direction)),
                Effect::DismissUnread => commands.push(Command::DismissUnread),
                Effect::GetMostRecent => commands.push(Command::GetMostRecent),
                Effect::FetchFailed { direction, error } => {
                    commands.push(Command::FetchFailed { direction, error });
                }
            }
        }
        commands
    }

    pub fn mount(&mut self, source: &dyn MessageSource, unread_count: usize) -> Vec<Command> {
        self.handle(WindowEvent::Mount, source, unread_count)
    }

    pub fn update(&mut self, source: &dyn MessageSource, unread_count: usize) -> Vec<Command> {
        self.handle(WindowEvent::Update, source, unread_count)
    }

    /// Forward a scroll notification from the rendering layer.
    pub fn on_scroll(&mut self, source: &dyn MessageSource, unread_count: usize) -> Vec<Command> {
        let offset = self.viewport.current_offset(source);
        self.handle(WindowEvent::Scroll { offset }, source, unread_count)
    }

    pub fn state(&self) -> &WindowState {
        &self.state
    }

    pub fn phase(&self) -> WindowPhase {
        self.state.phase()
    }

    pub fn gate(&self, direction: Direction) -> FetchGate {
        self.state.gate(direction)
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    pub fn policy(&self) -> &WindowPolicy {
        &self.policy
    }

    pub fn target(&self) -> Option<MessageIndex> {
        self.target
    }

    pub fn unread_boundary(&self) -> Option<MessageIndex> {
        self.state.visible_unread_index()
    }

    pub fn is_at_end(&self, source: &dyn MessageSource) -> bool {
        self.viewport.current_offset(source) < self.policy.at_end_threshold
    }

    pub fn mounted_window(&self, source: &dyn MessageSource) -> MountedWindow {
        MountedWindow::compute(
            source.len(),
            self.viewport.current_offset(source),
            self.viewport.visible_count(),
            self.policy.overscan,
        )
    }

    pub fn rows<'a, Tz: TimeZone>(
        &self,
        source: &'a dyn MessageSource,
        our_identity: Option<&str>,
        tz: &Tz,
    ) -> Vec<RowView<'a>> {
        let ctx = RowContext {
            unread_index: self.unread_boundary(),
            target: self.target,
            our_identity,
        };
        annotate(source, self.mounted_window(source), ctx, tz)
    }

    pub fn unread_notice(
        &self,
        source: &dyn MessageSource,
        unread_count: usize,
        our_identity: Option<&str>,
    ) -> Option<UnreadNotice> {
        if unread_count == 0 || self.state.unread_dismissed || !self.state.is_mounted() {
            return None;
        }
        let boundary = self.state.unread_index;
        let message = boundary.and_then(|index| source.get(index)).and_then(|node| node.post());
        let ours_alone =
            unread_count == 1 && message.is_some_and(|m| Some(m.author.as_str()) == our_identity);
        Some(UnreadNotice {
            count: unread_count,
            boundary,
            since: if ours_alone { None } else { message.map(|m| m.time_sent) },
        })
    }
}
