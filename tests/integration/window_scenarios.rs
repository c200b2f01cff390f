// =====
// TESTS: 10
// =====
//
// Multi-event scenarios driving `ChatWindow` through a recording viewport.

use landscape_chat::store::{MessageIndex, MessageSource};
use landscape_chat::window::{
    Command, Direction, FetchGate, FetchOutcome, WindowEvent, WindowPhase, calculate_unread_index,
};
use pretty_assertions::assert_eq;
use std::time::Instant;

use crate::helpers::{ScrollCall, count_fetches, delete, graph, post, test_window};

// --- Scroll lock ---

#[test]
fn locked_appends_keep_bottom_at_newest() {
    let mut g = graph(1..=100);
    let (mut window, _focus) = test_window(None);
    window.mount(&g, 0);
    assert_eq!(window.phase(), WindowPhase::FetchingNewer);

    for i in 101..=105 {
        g.insert(MessageIndex(i), post(i));
        window.update(&g, 0);
        assert_eq!(window.viewport().bottom(&g), g.peek_largest());
        assert_eq!(window.viewport().calls.last(), Some(&ScrollCall::Latest));
    }
}

#[test]
fn unlocked_appends_do_not_move_the_view() {
    let mut g = graph(1..=100);
    let (mut window, _focus) = test_window(None);
    window.mount(&g, 0);

    window.viewport_mut().drag_to(&g, 30);
    window.on_scroll(&g, 0);
    assert_eq!(window.state().scroll, landscape_chat::window::ScrollPhase::FreeScroll);
    let top = window.viewport().top(&g);
    assert_eq!(top, Some(MessageIndex(61)));
    let calls = window.viewport().calls.len();

    for i in 101..=103 {
        g.insert(MessageIndex(i), post(i));
        window.update(&g, 0);
    }
    assert_eq!(window.viewport().top(&g), top);
    assert_eq!(window.viewport().calls.len(), calls);
}

// --- Unread boundary ---

#[test]
fn ten_messages_three_unread_marks_eighth() {
    let g = graph(1..=10);
    let (mut window, _focus) = test_window(None);
    window.mount(&g, 3);
    assert_eq!(window.unread_boundary(), Some(MessageIndex(8)));
    assert_eq!(window.viewport().calls, vec![ScrollCall::ToIndex(MessageIndex(8))]);
}

#[test]
fn unread_boundary_skips_deleted_posts() {
    let mut g = graph(1..=10);
    delete(&mut g, &[8]);
    assert_eq!(calculate_unread_index(&g, 3), Some(MessageIndex(9)));

    delete(&mut g, &[9, 10]);
    assert_eq!(calculate_unread_index(&g, 3), None);
}

#[test]
fn unread_boundary_is_stable_across_repeated_updates() {
    let g = graph(1..=10);
    let (mut window, _focus) = test_window(None);
    window.mount(&g, 3);
    let calls = window.viewport().calls.clone();
    for _ in 0..3 {
        let commands = window.update(&g, 3);
        assert!(commands.is_empty());
        assert_eq!(window.unread_boundary(), Some(MessageIndex(8)));
    }
    assert_eq!(window.viewport().calls, calls);
}

// --- Dismissal ---

#[test]
fn dismissal_fires_once_per_episode() {
    let mut g = graph(1..=100);
    let (mut window, focus) = test_window(None);
    focus.set(false);
    let mut commands = window.mount(&g, 0);

    // Two messages arrive while the reader looks elsewhere.
    g.insert(MessageIndex(101), post(101));
    g.insert(MessageIndex(102), post(102));
    commands.extend(window.update(&g, 2));
    assert_eq!(window.unread_boundary(), Some(MessageIndex(101)));

    focus.set(true);
    commands.extend(window.handle(WindowEvent::FocusChanged(true), &g, 2));
    commands.extend(window.handle(WindowEvent::FocusChanged(true), &g, 2));
    assert_eq!(commands.iter().filter(|c| **c == Command::DismissUnread).count(), 1);

    // Host clears the count, then a new episode starts at the bottom.
    commands.extend(window.update(&g, 0));
    g.insert(MessageIndex(103), post(103));
    commands.extend(window.update(&g, 1));
    assert_eq!(commands.iter().filter(|c| **c == Command::DismissUnread).count(), 2);
}

#[test]
fn idle_reader_keeps_new_arrivals_unread() {
    let mut g = graph(1..=100);
    let (mut window, _focus) = test_window(None);
    let start = Instant::now();
    window.handle_at(WindowEvent::Mount, &g, 0, start);
    assert!(!window.state().idle);

    let later = start + window.policy().idle_timeout;
    window.handle_at(WindowEvent::Tick, &g, 0, later);
    assert!(window.state().idle);

    g.insert(MessageIndex(101), post(101));
    let commands = window.handle_at(WindowEvent::Update, &g, 1, later);
    assert!(!commands.contains(&Command::DismissUnread));
    assert_eq!(window.unread_boundary(), Some(MessageIndex(101)));
    // Still locked, so the view follows the new message.
    assert_eq!(window.viewport().calls.last(), Some(&ScrollCall::Latest));
}

// --- Fetching ---

#[test]
fn duplicate_newer_fetch_is_suppressed_while_pending() {
    let g = graph(1..=100);
    let (mut window, _focus) = test_window(None);
    let mut commands = window.mount(&g, 0);
    commands.extend(window.update(&g, 0));
    commands.extend(window.on_scroll(&g, 0));
    assert_eq!(count_fetches(&commands, Direction::Newer), 1);
    assert_eq!(window.gate(Direction::Newer), FetchGate::Pending);

    let settled = WindowEvent::FetchSettled { direction: Direction::Newer, result: Ok(FetchOutcome::More) };
    let commands = window.handle(settled, &g, 0);
    // Still at the newest edge, so exactly one follow-up request.
    assert_eq!(count_fetches(&commands, Direction::Newer), 1);
}

#[test]
fn deferred_target_scrolls_exactly_once() {
    let target = MessageIndex(20);
    let mut g = graph(50..=100);
    let (mut window, _focus) = test_window(Some(target));
    let commands = window.mount(&g, 0);
    assert_eq!(count_fetches(&commands, Direction::Older), 1);
    assert_eq!(window.viewport().calls, vec![ScrollCall::Latest]);

    // First page does not reach the target yet.
    for i in 30..50 {
        g.insert(MessageIndex(i), post(i));
    }
    let settled = WindowEvent::FetchSettled { direction: Direction::Older, result: Ok(FetchOutcome::More) };
    let commands = window.handle(settled.clone(), &g, 0);
    assert_eq!(count_fetches(&commands, Direction::Older), 1);

    for i in 10..30 {
        g.insert(MessageIndex(i), post(i));
    }
    window.handle(WindowEvent::Update, &g, 0);
    window.handle(settled, &g, 0);
    window.handle(WindowEvent::Update, &g, 0);

    let target_scrolls =
        window.viewport().calls.iter().filter(|c| **c == ScrollCall::ToIndex(target)).count();
    assert_eq!(target_scrolls, 1);
    assert_eq!(window.viewport().top(&g), Some(target));
}

#[test]
fn jump_to_latest_requests_most_recent_and_relocks() {
    let g = graph(1..=100);
    let (mut window, _focus) = test_window(None);
    window.mount(&g, 0);
    window.viewport_mut().drag_to(&g, 40);
    window.on_scroll(&g, 0);
    assert!(!window.is_at_end(&g));

    let commands = window.handle(WindowEvent::JumpToLatest, &g, 0);
    assert!(commands.contains(&Command::GetMostRecent));
    assert!(window.is_at_end(&g));
    assert_eq!(window.state().scroll, landscape_chat::window::ScrollPhase::LockedToBottom);
}
