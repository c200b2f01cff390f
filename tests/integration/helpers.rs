use chrono::{DateTime, Duration, TimeZone, Utc};
use landscape_chat::store::{Message, MessageGraph, MessageIndex, MessageSource};
use landscape_chat::window::{ChatWindow, Command, FocusProvider, Viewport, WindowPolicy};
use std::cell::Cell;
use std::ops::RangeInclusive;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollCall {
    ToIndex(MessageIndex),
    Latest,
}

/// Viewport that records every programmatic scroll. Offsets are anchored to
/// the newest visible message, like the terminal viewport.
#[derive(Debug, Default)]
pub struct RecordingViewport {
    anchor: Option<MessageIndex>,
    visible: usize,
    pub calls: Vec<ScrollCall>,
}

impl RecordingViewport {
    pub fn new(visible: usize) -> Self {
        Self { anchor: None, visible, calls: Vec::new() }
    }

    /// Simulate the reader dragging the list `offset` messages up from the newest.
    pub fn drag_to(&mut self, source: &dyn MessageSource, offset: usize) {
        let last = source.len().saturating_sub(1);
        self.anchor = if offset == 0 { None } else { source.key_at(last - offset.min(last)) };
    }

    pub fn bottom(&self, source: &dyn MessageSource) -> Option<MessageIndex> {
        self.anchor.filter(|a| source.contains(*a)).or_else(|| source.peek_largest())
    }

    pub fn top(&self, source: &dyn MessageSource) -> Option<MessageIndex> {
        let position = source.position_of(self.bottom(source)?)?;
        source.key_at(position.saturating_sub(self.visible - 1))
    }
}

impl Viewport for RecordingViewport {
    fn scroll_to_index(&mut self, index: MessageIndex, source: &dyn MessageSource) {
        self.calls.push(ScrollCall::ToIndex(index));
        let Some(position) = source.position_of(index) else {
            return;
        };
        let last = source.len().saturating_sub(1);
        let bottom = (position + self.visible - 1).min(last);
        self.anchor = if bottom == last { None } else { source.key_at(bottom) };
    }

    fn scroll_to_latest(&mut self) {
        self.calls.push(ScrollCall::Latest);
        self.anchor = None;
    }

    fn current_offset(&self, source: &dyn MessageSource) -> usize {
        self.anchor
            .and_then(|a| source.position_of(a))
            .map_or(0, |p| source.len().saturating_sub(1) - p)
    }

    fn visible_count(&self) -> usize {
        self.visible
    }
}

/// Focus flag the test flips by hand.
#[derive(Debug, Clone, Default)]
pub struct ManualFocus(Rc<Cell<bool>>);

impl ManualFocus {
    pub fn set(&self, focused: bool) {
        self.0.set(focused);
    }
}

impl FocusProvider for ManualFocus {
    fn has_focus(&self) -> bool {
        self.0.get()
    }
}

pub type TestWindow = ChatWindow<RecordingViewport, ManualFocus>;

pub const VISIBLE: usize = 10;

pub fn test_window(target: Option<MessageIndex>) -> (TestWindow, ManualFocus) {
    let focus = ManualFocus::default();
    focus.set(true);
    let window = ChatWindow::new(
        RecordingViewport::new(VISIBLE),
        focus.clone(),
        WindowPolicy::default(),
        target,
    );
    (window, focus)
}

pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap() + Duration::minutes(minutes)
}

pub fn post(i: u64) -> Message {
    let author = if (i / 2) % 2 == 0 { "zod" } else { "bus" };
    Message::text(author, format!("message {i}"), at(i64::try_from(i).unwrap()))
}

pub fn graph(range: RangeInclusive<u64>) -> MessageGraph {
    let mut graph = MessageGraph::new();
    for i in range {
        graph.insert(MessageIndex(i), post(i));
    }
    graph
}

pub fn delete(graph: &mut MessageGraph, indices: &[u64]) {
    for i in indices {
        graph.delete(MessageIndex(*i));
    }
}

pub fn count_fetches(commands: &[Command], direction: landscape_chat::window::Direction) -> usize {
    commands.iter().filter(|c| **c == Command::Fetch(direction)).count()
}
