// =====
// TESTS: 6
// =====
//
// End-to-end flows through the app: window, command execution and the
// simulated backend, run on a `LocalSet` the way `main` does.

use landscape_chat::app::{
    App, TerminalViewport, dispatch, handle_app_event, handle_backend_event, retry_failed_fetch,
};
use landscape_chat::backend::{BackendConfig, BackendEvent, DemoBackend, SharedGraph, history};
use landscape_chat::error::FetchError;
use landscape_chat::store::{MessageIndex, MessageSource};
use landscape_chat::window::{
    ChatWindow, Direction, FetchGate, SharedFocus, Viewport as _, WindowEvent, WindowPolicy,
};
use pretty_assertions::assert_eq;
use std::time::Duration;
use tokio::task::LocalSet;

fn app_with(config: BackendConfig, messages: usize) -> App {
    app_at(config, messages, None)
}

/// App opened the way `create_app` does: around `target`, or at the newest page.
fn app_at(config: BackendConfig, messages: usize, target: Option<MessageIndex>) -> App {
    let remote = history::synthetic(messages, &config.our_identity, chrono::Utc::now());
    let our_identity = config.our_identity.clone();
    let backend = DemoBackend::new(remote, SharedGraph::default(), config);
    match target {
        Some(index) => backend.load_around(index),
        None => backend.load_latest(),
    };
    let focus = SharedFocus::new(true);
    let mut viewport = TerminalViewport::default();
    viewport.set_height(10);
    let window = ChatWindow::new(viewport, focus.clone(), WindowPolicy::default(), target);
    App::new("general".to_owned(), our_identity, backend, window, focus, 0)
}

fn instant_pages(page_size: usize) -> BackendConfig {
    BackendConfig { page_size, latency: Duration::ZERO, ..BackendConfig::default() }
}

/// Wait for `n` fetch results and feed them back into the app.
async fn settle(app: &mut App, n: usize) {
    for _ in 0..n {
        let event = app.event_rx.recv().await.unwrap();
        handle_app_event(app, event);
    }
}

/// Feed fetch results back until no request is left in flight.
async fn settle_all(app: &mut App) {
    while let Ok(Some(event)) =
        tokio::time::timeout(Duration::from_millis(100), app.event_rx.recv()).await
    {
        handle_app_event(app, event);
    }
}

#[tokio::test]
async fn mount_pages_in_older_history_and_exhausts_newer() {
    LocalSet::new()
        .run_until(async {
            let mut app = app_with(instant_pages(20), 100);
            dispatch(&mut app, WindowEvent::Mount);
            assert_eq!(app.window.gate(Direction::Older), FetchGate::Pending);
            assert_eq!(app.window.gate(Direction::Newer), FetchGate::Pending);

            settle(&mut app, 2).await;
            assert_eq!(app.graph.borrow().len(), 40);
            assert_eq!(app.window.gate(Direction::Newer), FetchGate::Exhausted);
            assert_eq!(app.window.gate(Direction::Older), FetchGate::Idle);
            // Still locked: the newest message stays at the bottom.
            assert_eq!(app.window.viewport().anchor(), None);
        })
        .await;
}

#[tokio::test]
async fn failed_fetch_releases_gates_and_waits_for_retry() {
    LocalSet::new()
        .run_until(async {
            let config = BackendConfig { fail_every: Some(1), ..instant_pages(20) };
            let mut app = app_with(config, 100);
            dispatch(&mut app, WindowEvent::Mount);
            settle(&mut app, 2).await;

            assert_eq!(app.window.gate(Direction::Older), FetchGate::Idle);
            assert_eq!(app.window.gate(Direction::Newer), FetchGate::Idle);
            let (direction, error) = app.last_fetch_error.clone().unwrap();
            assert_eq!(error, FetchError::Unavailable("simulated outage".to_owned()));

            // Nothing retries on its own.
            dispatch(&mut app, WindowEvent::Update);
            assert!(app.event_rx.try_recv().is_err());

            retry_failed_fetch(&mut app);
            assert_eq!(app.window.gate(direction), FetchGate::Pending);
            assert!(app.last_fetch_error.is_none());
        })
        .await;
}

#[tokio::test]
async fn incoming_message_while_watching_is_dismissed_at_once() {
    LocalSet::new()
        .run_until(async {
            let mut app = app_with(instant_pages(20), 100);
            dispatch(&mut app, WindowEvent::Mount);

            let index = app.backend.receive("wes", "hello");
            handle_backend_event(&mut app, BackendEvent::Incoming { index, ours: false });
            assert_eq!(app.unread_count, 0);
            assert_eq!(app.window.unread_boundary(), None);
        })
        .await;
}

#[tokio::test]
async fn incoming_message_while_away_keeps_boundary() {
    LocalSet::new()
        .run_until(async {
            let mut app = app_with(instant_pages(20), 100);
            dispatch(&mut app, WindowEvent::Mount);
            app.focus.set(false);
            dispatch(&mut app, WindowEvent::FocusChanged(false));

            let first = app.backend.receive("wes", "one");
            handle_backend_event(&mut app, BackendEvent::Incoming { index: first, ours: false });
            let second = app.backend.receive("bus", "two");
            handle_backend_event(&mut app, BackendEvent::Incoming { index: second, ours: false });
            assert_eq!(app.unread_count, 2);
            assert_eq!(app.window.unread_boundary(), Some(first));

            let notice = {
                let graph = app.graph.borrow();
                app.window.unread_notice(&*graph, app.unread_count, Some("nec"))
            };
            assert_eq!(notice.map(|n| n.boundary), Some(Some(first)));

            app.focus.set(true);
            dispatch(&mut app, WindowEvent::FocusChanged(true));
            assert_eq!(app.unread_count, 0);
        })
        .await;
}

#[tokio::test]
async fn sent_message_is_pending_until_acknowledged() {
    LocalSet::new()
        .run_until(async {
            let mut app = app_with(instant_pages(20), 100);
            dispatch(&mut app, WindowEvent::Mount);
            landscape_chat::app::send_message(&mut app, "on my way");

            let index = MessageIndex(101);
            assert!(app.graph.borrow().post(index).is_some_and(|m| m.pending));
            assert_eq!(app.unread_count, 0);

            let event = app.backend_rx.recv().await.unwrap();
            assert!(matches!(event, BackendEvent::Acknowledged(sent) if sent.index == index));
            handle_backend_event(&mut app, event);
            assert!(app.graph.borrow().post(index).is_some_and(|m| !m.pending));
            assert_eq!(app.window.viewport().current_offset(&*app.graph.borrow()), 0);
        })
        .await;
}

#[tokio::test]
async fn jump_to_latest_from_permalink_leaves_no_gap() {
    LocalSet::new()
        .run_until(async {
            let target = MessageIndex(40);
            let mut app = app_at(instant_pages(20), 300, Some(target));
            dispatch(&mut app, WindowEvent::Mount);
            assert!(app.graph.borrow().contains(target));

            dispatch(&mut app, WindowEvent::JumpToLatest);
            settle_all(&mut app).await;

            let graph = app.graph.borrow();
            assert_eq!(graph.peek_largest(), Some(MessageIndex(300)));
            let keys: Vec<u64> = (0..graph.len()).filter_map(|p| graph.key_at(p)).map(|k| k.get()).collect();
            assert!(keys.windows(2).all(|pair| pair[1] == pair[0] + 1), "gap in {keys:?}");
            assert!(!graph.contains(target));
            assert_eq!(app.window.viewport().anchor(), None);
            assert_eq!(app.window.gate(Direction::Newer), FetchGate::Exhausted);
        })
        .await;
}
