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

use super::fetch::{Direction, FetchOutcome};
use super::policy::WindowPolicy;
use super::state::{FetchGate, ScrollPhase, WindowState};
use super::unread::calculate_unread_index;
use super::virtual_list::MountedWindow;
use crate::error::FetchError;
use crate::store::{MessageIndex, MessageSource};
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowEvent {
    Mount,
    /// The data layer changed the collection or the unread count.
    Update,
    /// The rendering layer reports a new offset from the newest message.
    Scroll { offset: usize },
    FetchSettled { direction: Direction, result: Result<FetchOutcome, FetchError> },
    FocusChanged(bool),
    /// Periodic clock for the inactivity timer.
    Tick,
    JumpToLatest,
    JumpToUnread,
    RetryFetch(Direction),
    /// Channel switched under the same window.
    Reset,
    Teardown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ScrollToIndex(MessageIndex),
    ScrollToLatest,
    Fetch(Direction),
    DismissUnread,
    GetMostRecent,
    FetchFailed { direction: Direction, error: FetchError },
}

/// Everything a transition may read besides the previous state.
#[derive(Clone, Copy)]
pub struct Inputs<'a> {
    pub source: &'a dyn MessageSource,
    pub unread_count: usize,
    pub target: Option<MessageIndex>,
    pub has_focus: bool,
    /// Viewport offset, in messages from the newest one, before this event.
    pub offset: usize,
    pub visible: usize,
    pub now: Instant,
    pub policy: &'a WindowPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: WindowState,
    pub effects: Vec<Effect>,
}

/// Pure transition function for the virtualized list.
///
/// Repeating an event with unchanged inputs after its first application
/// produces no further effects.
pub fn step(prev: &WindowState, event: &WindowEvent, inputs: &Inputs<'_>) -> Transition {
    let mut run = Step { state: prev.clone(), effects: Vec::new(), offset: inputs.offset, inputs };

    if run.state.torn_down {
        if matches!(event, WindowEvent::FetchSettled { .. }) {
            tracing::debug!("dropping fetch result that settled after teardown");
        }
        return run.finish();
    }
    if run.state.scroll == ScrollPhase::Initializing
        && !matches!(event, WindowEvent::Mount | WindowEvent::Teardown)
    {
        return run.finish();
    }

    match event {
        WindowEvent::Mount => run.mount(),
        WindowEvent::Update => run.update(),
        WindowEvent::Scroll { offset } => run.scrolled(*offset),
        WindowEvent::FetchSettled { direction, result } => run.settled(*direction, result),
        WindowEvent::FocusChanged(focused) => run.focus_changed(*focused),
        WindowEvent::Tick => run.tick(),
        WindowEvent::JumpToLatest => {
            run.touch();
            run.effects.push(Effect::GetMostRecent);
            run.scroll_to_latest();
            run.try_dismiss();
            run.check_edges();
        }
        WindowEvent::JumpToUnread => {
            run.touch();
            if let Some(index) = run.state.visible_unread_index() {
                run.scroll_to_index(index);
                run.check_edges();
            }
        }
        WindowEvent::RetryFetch(direction) => {
            run.request_if_idle(*direction);
        }
        WindowEvent::Reset => run.reset(),
        WindowEvent::Teardown => run.state.torn_down = true,
    }
    run.finish()
}

struct Step<'i, 'a> {
    state: WindowState,
    effects: Vec<Effect>,
    offset: usize,
    inputs: &'i Inputs<'a>,
}

impl Step<'_, '_> {
    fn finish(self) -> Transition {
        Transition { state: self.state, effects: self.effects }
    }

    fn mount(&mut self) {
        if self.state.scroll != ScrollPhase::Initializing {
            return;
        }
        let inputs = self.inputs;
        self.state.prev_size = inputs.source.len();
        self.state.prev_unread = inputs.unread_count;
        self.state.unread_index = calculate_unread_index(inputs.source, inputs.unread_count);

        if let Some(target) = inputs.target.filter(|t| inputs.source.contains(*t)) {
            self.state.target_reached = true;
            self.scroll_to_index(target);
        } else if let Some(unread) = self.state.visible_unread_index() {
            self.scroll_to_index(unread);
        } else {
            self.scroll_to_latest();
        }
        self.state.target_reached |= inputs.target.is_none();
        self.touch();
        tracing::debug!(
            size = inputs.source.len(),
            unread = inputs.unread_count,
            offset = self.offset,
            "chat window mounted"
        );
        self.check_edges();
    }

    fn update(&mut self) {
        let inputs = self.inputs;
        self.track_unread_episode();

        let size = inputs.source.len();
        let resized = size != self.state.prev_size;
        if resized {
            self.state.prev_size = size;
            self.recompute_unread_if_unset();
            if self.state.scroll == ScrollPhase::LockedToBottom {
                self.effects.push(Effect::ScrollToLatest);
                self.offset = 0;
            }
            // Arrivals only count as read while the reader is active.
            if !self.state.idle {
                self.try_dismiss();
            }
        }

        self.reach_deferred_target();
        // Edges only move when the collection does.
        if resized {
            self.check_edges();
        }
    }

    fn scrolled(&mut self, offset: usize) {
        let inputs = self.inputs;
        self.offset = offset;
        if offset > inputs.policy.idle_threshold {
            self.state.idle = true;
        } else if inputs.has_focus {
            self.mark_active();
        }

        let next = if offset == 0 { ScrollPhase::LockedToBottom } else { ScrollPhase::FreeScroll };
        if next != self.state.scroll {
            tracing::trace!(?next, offset, "scroll lock changed");
            self.state.scroll = next;
        }
        self.try_dismiss();
        self.check_edges();
    }

    fn settled(&mut self, direction: Direction, result: &Result<FetchOutcome, FetchError>) {
        let gate = self.state.gate_mut(direction);
        if !gate.is_pending() {
            tracing::debug!(direction = direction.label(), "ignoring unexpected fetch result");
            return;
        }
        match result {
            Ok(outcome) => {
                *gate = match outcome {
                    FetchOutcome::More => FetchGate::Idle,
                    FetchOutcome::Exhausted => FetchGate::Exhausted,
                };
                tracing::debug!(direction = direction.label(), ?outcome, "fetch settled");
                if direction == Direction::Older {
                    self.recompute_unread_if_unset();
                }
                self.reach_deferred_target();
                self.check_edges();
            }
            Err(error) => {
                *gate = FetchGate::Idle;
                tracing::warn!(direction = direction.label(), %error, "page fetch failed");
                self.effects.push(Effect::FetchFailed { direction, error: error.clone() });
            }
        }
    }

    fn focus_changed(&mut self, focused: bool) {
        if focused {
            self.mark_active();
            self.try_dismiss();
        } else {
            self.state.idle = true;
        }
    }

    fn tick(&mut self) {
        let inputs = self.inputs;
        if self.state.idle {
            return;
        }
        let expired = self
            .state
            .last_activity
            .is_some_and(|at| inputs.now.saturating_duration_since(at) >= inputs.policy.idle_timeout);
        if expired {
            tracing::trace!("chat window idle after inactivity");
            self.state.idle = true;
        }
    }

    fn reset(&mut self) {
        let inputs = self.inputs;
        self.state.older = FetchGate::Idle;
        self.state.newer = FetchGate::Idle;
        self.state.prev_size = inputs.source.len();
        self.state.prev_unread = inputs.unread_count;
        self.state.unread_dismissed = false;
        self.state.unread_index = calculate_unread_index(inputs.source, inputs.unread_count);
        self.state.target_reached = true;
        self.scroll_to_latest();
        self.check_edges();
    }

    /// Explicit reader input counts as activity while focused.
    fn touch(&mut self) {
        if self.inputs.has_focus {
            self.mark_active();
        }
    }

    fn mark_active(&mut self) {
        self.state.idle = false;
        self.state.last_activity = Some(self.inputs.now);
    }

    /// Open a new episode when unread grows; close it when unread drops to zero.
    fn track_unread_episode(&mut self) {
        let unread = self.inputs.unread_count;
        let prev = self.state.prev_unread;
        self.state.prev_unread = unread;
        if unread > prev {
            self.state.unread_dismissed = false;
            self.state.unread_index = calculate_unread_index(self.inputs.source, unread);
        } else if unread == 0 && prev > 0 {
            self.state.unread_dismissed = true;
        }
    }

    fn recompute_unread_if_unset(&mut self) {
        if self.state.unread_index.is_none() && !self.state.unread_dismissed {
            self.state.unread_index =
                calculate_unread_index(self.inputs.source, self.inputs.unread_count);
        }
    }

    /// Dismiss the unread episode when the reader is at its top and looking.
    fn try_dismiss(&mut self) {
        let inputs = self.inputs;
        if self.state.unread_dismissed || inputs.unread_count == 0 {
            return;
        }
        if !inputs.has_focus || self.offset >= inputs.policy.dismiss_offset {
            return;
        }
        self.state.unread_dismissed = true;
        tracing::debug!(unread = inputs.unread_count, offset = self.offset, "dismissing unread");
        self.effects.push(Effect::DismissUnread);
    }

    fn reach_deferred_target(&mut self) {
        if self.state.target_reached {
            return;
        }
        let Some(target) = self.inputs.target else {
            self.state.target_reached = true;
            return;
        };
        if self.inputs.source.contains(target) {
            tracing::debug!(%target, "deferred scroll target loaded");
            self.state.target_reached = true;
            self.scroll_to_index(target);
        }
    }

    fn scroll_to_index(&mut self, index: MessageIndex) {
        let source = self.inputs.source;
        let Some(position) = source.position_of(index) else {
            return;
        };
        // The viewport shows `index` as its oldest visible row where history allows.
        let below = source.len() - 1 - position;
        self.offset = below.saturating_sub(self.inputs.visible.max(1) - 1);
        self.state.scroll =
            if self.offset == 0 { ScrollPhase::LockedToBottom } else { ScrollPhase::FreeScroll };
        self.effects.push(Effect::ScrollToIndex(index));
    }

    fn scroll_to_latest(&mut self) {
        self.offset = 0;
        self.state.scroll = ScrollPhase::LockedToBottom;
        self.effects.push(Effect::ScrollToLatest);
    }

    /// Which way an unloaded scroll target lies, if any.
    fn target_direction(&self) -> Option<Direction> {
        if self.state.target_reached {
            return None;
        }
        let target = self.inputs.target?;
        let source = self.inputs.source;
        let newest = source.peek_largest()?;
        let oldest = source.key_at(0)?;
        if target < oldest {
            Some(Direction::Older)
        } else if target > newest {
            Some(Direction::Newer)
        } else {
            None
        }
    }

    fn check_edges(&mut self) {
        let inputs = self.inputs;
        let len = inputs.source.len();
        if len == 0 {
            self.request_if_idle(Direction::Older);
            return;
        }
        let window = MountedWindow::compute(len, self.offset, inputs.visible, inputs.policy.overscan);
        let toward_target = self.target_direction();
        let threshold = inputs.policy.fetch_threshold;
        if window.near_oldest(threshold) || toward_target == Some(Direction::Older) {
            self.request_if_idle(Direction::Older);
        }
        if window.near_newest(len, threshold) || toward_target == Some(Direction::Newer) {
            self.request_if_idle(Direction::Newer);
        }
    }

    fn request_if_idle(&mut self, direction: Direction) {
        if self.state.gate(direction) == FetchGate::Idle {
            self.request(direction);
        }
    }

    fn request(&mut self, direction: Direction) {
        *self.state.gate_mut(direction) = FetchGate::Pending;
        tracing::debug!(direction = direction.label(), "requesting page");
        self.effects.push(Effect::Fetch(direction));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Message, MessageGraph};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn graph(range: std::ops::RangeInclusive<u64>) -> MessageGraph {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut graph = MessageGraph::new();
        for i in range {
            graph.insert(MessageIndex(i), Message::text("zod", format!("m{i}"), at));
        }
        graph
    }

    fn inputs<'a>(source: &'a MessageGraph, policy: &'a WindowPolicy, now: Instant) -> Inputs<'a> {
        Inputs {
            source,
            unread_count: 0,
            target: None,
            has_focus: true,
            offset: 0,
            visible: 10,
            now,
            policy,
        }
    }

    fn mounted(inp: &Inputs<'_>) -> WindowState {
        step(&WindowState::default(), &WindowEvent::Mount, inp).state
    }

    #[test]
    fn events_before_mount_are_ignored() {
        let g = graph(1..=100);
        let policy = WindowPolicy::default();
        let inp = inputs(&g, &policy, Instant::now());
        let t = step(&WindowState::default(), &WindowEvent::Scroll { offset: 3 }, &inp);
        assert_eq!(t.state, WindowState::default());
        assert!(t.effects.is_empty());
    }

    #[test]
    fn mount_without_target_or_unread_locks_to_bottom() {
        let g = graph(1..=100);
        let policy = WindowPolicy::default();
        let inp = inputs(&g, &policy, Instant::now());
        let t = step(&WindowState::default(), &WindowEvent::Mount, &inp);
        assert_eq!(t.state.scroll, ScrollPhase::LockedToBottom);
        assert_eq!(t.effects, vec![Effect::ScrollToLatest, Effect::Fetch(Direction::Newer)]);
    }

    #[test]
    fn mount_prefers_present_target_over_unread() {
        let g = graph(1..=100);
        let policy = WindowPolicy::default();
        let inp = Inputs { target: Some(MessageIndex(40)), unread_count: 5, ..inputs(&g, &policy, Instant::now()) };
        let t = step(&WindowState::default(), &WindowEvent::Mount, &inp);
        assert_eq!(t.effects[0], Effect::ScrollToIndex(MessageIndex(40)));
        assert!(t.state.target_reached);
        assert_eq!(t.state.scroll, ScrollPhase::FreeScroll);
    }

    #[test]
    fn mount_scrolls_to_unread_boundary() {
        let g = graph(1..=100);
        let policy = WindowPolicy::default();
        let inp = Inputs { unread_count: 30, ..inputs(&g, &policy, Instant::now()) };
        let t = step(&WindowState::default(), &WindowEvent::Mount, &inp);
        assert_eq!(t.effects, vec![Effect::ScrollToIndex(MessageIndex(71))]);
        assert_eq!(t.state.unread_index, Some(MessageIndex(71)));
        assert_eq!(t.state.scroll, ScrollPhase::FreeScroll);
    }

    #[test]
    fn empty_collection_requests_older_page() {
        let g = MessageGraph::new();
        let policy = WindowPolicy::default();
        let inp = inputs(&g, &policy, Instant::now());
        let t = step(&WindowState::default(), &WindowEvent::Mount, &inp);
        assert!(t.effects.contains(&Effect::Fetch(Direction::Older)));
        assert_eq!(t.state.older, FetchGate::Pending);
    }

    #[test]
    fn manual_scroll_releases_lock_and_bottom_reengages() {
        let g = graph(1..=100);
        let policy = WindowPolicy::default();
        let inp = inputs(&g, &policy, Instant::now());
        let state = mounted(&inp);
        let t = step(&state, &WindowEvent::Scroll { offset: 12 }, &inp);
        assert_eq!(t.state.scroll, ScrollPhase::FreeScroll);
        assert!(t.state.idle);
        let t = step(&t.state, &WindowEvent::Scroll { offset: 0 }, &Inputs { offset: 12, ..inp });
        assert_eq!(t.state.scroll, ScrollPhase::LockedToBottom);
        assert!(!t.state.idle);
    }

    #[test]
    fn failed_fetch_clears_gate_without_retrying() {
        let g = graph(1..=100);
        let policy = WindowPolicy::default();
        let inp = inputs(&g, &policy, Instant::now());
        let state = mounted(&inp);
        assert_eq!(state.newer, FetchGate::Pending);

        let failed = WindowEvent::FetchSettled {
            direction: Direction::Newer,
            result: Err(FetchError::Timeout),
        };
        let t = step(&state, &failed, &inp);
        assert_eq!(t.state.newer, FetchGate::Idle);
        assert_eq!(
            t.effects,
            vec![Effect::FetchFailed { direction: Direction::Newer, error: FetchError::Timeout }]
        );

        // Still at the bottom edge, but nothing asks again on its own.
        let t = step(&t.state, &WindowEvent::Update, &inp);
        assert!(t.effects.is_empty());

        let t = step(&t.state, &WindowEvent::RetryFetch(Direction::Newer), &inp);
        assert_eq!(t.effects, vec![Effect::Fetch(Direction::Newer)]);
        assert_eq!(t.state.newer, FetchGate::Pending);
    }

    #[test]
    fn scrolling_back_to_edge_after_failure_fetches_again() {
        let g = graph(1..=100);
        let policy = WindowPolicy::default();
        let inp = inputs(&g, &policy, Instant::now());
        let failed = WindowEvent::FetchSettled {
            direction: Direction::Newer,
            result: Err(FetchError::Unavailable("503".to_owned())),
        };
        let t = step(&mounted(&inp), &failed, &inp);

        let t = step(&t.state, &WindowEvent::Scroll { offset: 50 }, &inp);
        assert!(t.effects.is_empty());
        let t = step(&t.state, &WindowEvent::Scroll { offset: 0 }, &Inputs { offset: 50, ..inp });
        assert_eq!(t.effects, vec![Effect::Fetch(Direction::Newer)]);

        // A retry while the new request is in flight is a no-op.
        let t = step(&t.state, &WindowEvent::RetryFetch(Direction::Newer), &inp);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn exhausted_direction_stops_triggering() {
        let g = graph(1..=100);
        let policy = WindowPolicy::default();
        let inp = inputs(&g, &policy, Instant::now());
        let state = mounted(&inp);
        let done = WindowEvent::FetchSettled {
            direction: Direction::Newer,
            result: Ok(FetchOutcome::Exhausted),
        };
        let t = step(&state, &done, &inp);
        assert_eq!(t.state.newer, FetchGate::Exhausted);
        assert!(t.effects.is_empty());
        let t = step(&t.state, &WindowEvent::RetryFetch(Direction::Newer), &inp);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn focus_gain_at_bottom_dismisses_once() {
        let g = graph(1..=100);
        let policy = WindowPolicy::default();
        let inp = Inputs { unread_count: 2, has_focus: false, ..inputs(&g, &policy, Instant::now()) };
        let state = mounted(&inp);
        assert!(!state.unread_dismissed);

        let focused = Inputs { has_focus: true, offset: 1, ..inp };
        let t = step(&state, &WindowEvent::FocusChanged(true), &focused);
        assert_eq!(t.effects, vec![Effect::DismissUnread]);
        let t = step(&t.state, &WindowEvent::FocusChanged(true), &focused);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn tick_marks_idle_after_timeout() {
        let g = graph(1..=100);
        let policy = WindowPolicy::default();
        let start = Instant::now();
        let inp = inputs(&g, &policy, start);
        let t = step(&mounted(&inp), &WindowEvent::FocusChanged(true), &inp);
        assert!(!t.state.idle);

        let early = Inputs { now: start + policy.idle_timeout / 2, ..inp };
        let t = step(&t.state, &WindowEvent::Tick, &early);
        assert!(!t.state.idle);

        let late = Inputs { now: start + policy.idle_timeout, ..inp };
        let t = step(&t.state, &WindowEvent::Tick, &late);
        assert!(t.state.idle);
    }

    #[test]
    fn arrivals_stay_unread_once_idle() {
        let before = graph(1..=100);
        let policy = WindowPolicy::default();
        let start = Instant::now();
        let inp = inputs(&before, &policy, start);
        let state = mounted(&inp);
        assert!(!state.idle);

        let late = Inputs { now: start + policy.idle_timeout, ..inp };
        let state = step(&state, &WindowEvent::Tick, &late).state;
        assert!(state.idle);

        let after = graph(1..=101);
        let arrived = Inputs { source: &after, unread_count: 1, ..late };
        let t = step(&state, &WindowEvent::Update, &arrived);
        assert_eq!(t.effects, vec![Effect::ScrollToLatest]);
        assert_eq!(t.state.visible_unread_index(), Some(MessageIndex(101)));
    }

    #[test]
    fn arrivals_are_dismissed_while_active() {
        let before = graph(1..=100);
        let policy = WindowPolicy::default();
        let inp = inputs(&before, &policy, Instant::now());
        let state = mounted(&inp);

        let after = graph(1..=101);
        let arrived = Inputs { source: &after, unread_count: 1, ..inp };
        let t = step(&state, &WindowEvent::Update, &arrived);
        assert_eq!(t.effects, vec![Effect::ScrollToLatest, Effect::DismissUnread]);
    }

    #[test]
    fn teardown_drops_late_results() {
        let g = graph(1..=100);
        let policy = WindowPolicy::default();
        let inp = inputs(&g, &policy, Instant::now());
        let state = mounted(&inp);
        let t = step(&state, &WindowEvent::Teardown, &inp);
        assert!(t.state.torn_down);
        let late = WindowEvent::FetchSettled { direction: Direction::Newer, result: Ok(FetchOutcome::More) };
        let after = step(&t.state, &late, &inp);
        assert_eq!(after.state, t.state);
        assert!(after.effects.is_empty());
    }

    #[test]
    fn repeated_update_with_same_inputs_is_quiet() {
        let g = graph(1..=100);
        let policy = WindowPolicy::default();
        let inp = Inputs { unread_count: 3, ..inputs(&g, &policy, Instant::now()) };
        let first = step(&mounted(&inp), &WindowEvent::Update, &inp);
        let second = step(&first.state, &WindowEvent::Update, &inp);
        assert!(second.effects.is_empty());
        assert_eq!(second.state, first.state);
    }

    #[test]
    fn reset_unlocks_gates_and_returns_to_bottom() {
        let g = graph(1..=100);
        let policy = WindowPolicy::default();
        let inp = inputs(&g, &policy, Instant::now());
        let mut state = mounted(&inp);
        state.older = FetchGate::Exhausted;
        state.newer = FetchGate::Exhausted;
        state.scroll = ScrollPhase::FreeScroll;
        let t = step(&state, &WindowEvent::Reset, &Inputs { offset: 50, ..inp });
        assert_eq!(t.state.scroll, ScrollPhase::LockedToBottom);
        assert_eq!(t.effects, vec![Effect::ScrollToLatest, Effect::Fetch(Direction::Newer)]);
        assert_eq!(t.state.older, FetchGate::Idle);
    }
}
