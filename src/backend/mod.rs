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

//! In-process stand-in for the remote channel store.

pub mod history;

use crate::error::FetchError;
use crate::store::{Message, MessageGraph, MessageIndex, MessageNode, MessageSource};
use crate::window::{Direction, FetchOutcome, PageFetcher};
use chrono::Utc;
use history::History;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

pub type SharedGraph = Rc<RefCell<MessageGraph>>;

/// Pushes from the simulated subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    /// A new message was appended; `ours` is true for locally sent posts.
    Incoming { index: MessageIndex, ours: bool },
    Acknowledged(PendingSend),
}

/// A locally sent post awaiting acknowledgement. The nonce pairs the
/// acknowledgement with the send that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSend {
    pub index: MessageIndex,
    pub nonce: Uuid,
}

/// Result of loading the newest page on a jump to the live end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatestPage {
    /// The page joined onto the loaded range; this many keys were new.
    Extended(usize),
    /// The loaded range stopped short of the page, so it was replaced.
    Replaced,
}

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub page_size: usize,
    pub latency: Duration,
    /// Every Nth page request fails, to exercise the retry path.
    pub fail_every: Option<u32>,
    /// Page requests slower than this fail with `FetchError::Timeout`.
    pub timeout: Option<Duration>,
    pub our_identity: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            page_size: 50,
            latency: Duration::from_millis(250),
            fail_every: None,
            timeout: None,
            our_identity: "nec".to_owned(),
        }
    }
}

/// Serves pages out of a full remote history into the shared local graph.
pub struct DemoBackend {
    remote: RefCell<History>,
    graph: SharedGraph,
    config: BackendConfig,
    requests: Cell<u32>,
    pending: RefCell<HashMap<MessageIndex, Uuid>>,
}

impl DemoBackend {
    pub fn new(remote: History, graph: SharedGraph, config: BackendConfig) -> Rc<Self> {
        Rc::new(Self {
            remote: RefCell::new(remote),
            graph,
            config,
            requests: Cell::new(0),
            pending: RefCell::default(),
        })
    }

    pub fn graph(&self) -> &SharedGraph {
        &self.graph
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    pub fn remote_len(&self) -> usize {
        self.remote.borrow().len()
    }

    /// Copy the newest page into the local graph. Returns how many keys were new.
    pub fn load_latest(&self) -> usize {
        let remote = self.remote.borrow();
        let start = remote.len().saturating_sub(self.config.page_size);
        let page = remote[start..].iter().cloned();
        self.graph.borrow_mut().extend(page)
    }

    /// Bring the local graph to the live end without leaving a hole behind
    /// the newest page.
    pub fn jump_to_latest(&self) -> LatestPage {
        let reaches_page = {
            let remote = self.remote.borrow();
            let start = remote.len().saturating_sub(self.config.page_size);
            let graph = self.graph.borrow();
            match (graph.peek_largest(), start.checked_sub(1)) {
                (Some(newest), Some(before)) => remote[before].0 <= newest,
                _ => true,
            }
        };
        if reaches_page {
            return LatestPage::Extended(self.load_latest());
        }
        let dropped = self.graph.borrow().len();
        self.graph.borrow_mut().clear();
        let loaded = self.load_latest();
        tracing::debug!(dropped, loaded, "replaced loaded range with newest page");
        LatestPage::Replaced
    }

    /// Copy the page surrounding `target` so a permalink can resolve.
    pub fn load_around(&self, target: MessageIndex) -> usize {
        let remote = self.remote.borrow();
        let at = remote.partition_point(|(k, _)| *k < target);
        let half = self.config.page_size / 2;
        let start = at.saturating_sub(half);
        let end = (at + half).min(remote.len());
        let page = remote[start..end].iter().cloned();
        self.graph.borrow_mut().extend(page)
    }

    /// Append a message written by someone else.
    pub fn receive(&self, author: &str, text: &str) -> MessageIndex {
        self.append(Message::text(author, text, Utc::now()))
    }

    /// Append our own message as pending. The caller schedules acknowledgement.
    pub fn send(&self, text: &str) -> PendingSend {
        let message = Message::text(self.config.our_identity.clone(), text, Utc::now());
        let index = self.append(message.into_pending());
        let nonce = Uuid::new_v4();
        self.pending.borrow_mut().insert(index, nonce);
        tracing::debug!(%index, %nonce, "sending message");
        PendingSend { index, nonce }
    }

    /// Confirm a pending post. An acknowledgement whose nonce does not match
    /// the outstanding send is ignored.
    pub fn acknowledge(&self, sent: PendingSend) -> bool {
        let PendingSend { index, nonce } = sent;
        {
            let mut pending = self.pending.borrow_mut();
            if pending.get(&index) != Some(&nonce) {
                tracing::warn!(%index, %nonce, "acknowledgement for unknown send");
                return false;
            }
            pending.remove(&index);
        }
        if let Some((_, MessageNode::Post(msg))) =
            self.remote.borrow_mut().iter_mut().rev().find(|(k, _)| *k == index)
        {
            msg.pending = false;
        }
        // The local graph may no longer hold the post after a jump.
        self.graph.borrow_mut().acknowledge(index);
        true
    }

    /// Spawn a subscription that appends a message from another author every `every`.
    pub fn spawn_incoming(self: &Rc<Self>, every: Duration, tx: mpsc::UnboundedSender<BackendEvent>) {
        let this = Rc::clone(self);
        tokio::task::spawn_local(async move {
            let mut interval = tokio::time::interval(every);
            interval.tick().await;
            let mut n = 0usize;
            loop {
                interval.tick().await;
                n += 1;
                let author = if n % 2 == 0 { "bus" } else { "wes" };
                let index = this.receive(author, &format!("live update #{n}"));
                if tx.send(BackendEvent::Incoming { index, ours: false }).is_err() {
                    break;
                }
            }
        });
    }

    /// Spawn the delayed server acknowledgement for a pending post.
    pub fn spawn_ack(self: &Rc<Self>, sent: PendingSend, tx: mpsc::UnboundedSender<BackendEvent>) {
        let this = Rc::clone(self);
        tokio::task::spawn_local(async move {
            tokio::time::sleep(this.config.latency).await;
            if this.acknowledge(sent) {
                let _ = tx.send(BackendEvent::Acknowledged(sent));
            }
        });
    }

    fn append(&self, message: Message) -> MessageIndex {
        let mut remote = self.remote.borrow_mut();
        let previous = remote.last().map(|(k, _)| *k);
        let index = MessageIndex(previous.map_or(1, |k| k.get() + 1));
        remote.push((index, MessageNode::Post(message.clone())));

        // Only extend the local graph when it already holds the live end.
        let mut graph = self.graph.borrow_mut();
        if graph.peek_largest() == previous {
            graph.insert(index, message);
        }
        index
    }

    fn next_request_fails(&self) -> bool {
        let n = self.requests.get() + 1;
        self.requests.set(n);
        self.config.fail_every.is_some_and(|every| every > 0 && n % every == 0)
    }

    fn serve_page(&self, direction: Direction) -> FetchOutcome {
        let remote = self.remote.borrow();
        let mut graph = self.graph.borrow_mut();
        let page_size = self.config.page_size;

        let (start, end) = match direction {
            Direction::Older => {
                let end = graph
                    .smallest()
                    .map_or(remote.len(), |oldest| remote.partition_point(|(k, _)| *k < oldest));
                (end.saturating_sub(page_size), end)
            }
            Direction::Newer => {
                let start = graph
                    .peek_largest()
                    .map_or(remote.len(), |newest| remote.partition_point(|(k, _)| *k <= newest));
                (start, (start + page_size).min(remote.len()))
            }
        };
        let added = graph.extend(remote[start..end].iter().cloned());
        let exhausted = match direction {
            Direction::Older => start == 0,
            Direction::Newer => end == remote.len(),
        };
        tracing::debug!(direction = direction.label(), added, exhausted, "served page");
        if exhausted { FetchOutcome::Exhausted } else { FetchOutcome::More }
    }
}

#[async_trait::async_trait(?Send)]
impl PageFetcher for DemoBackend {
    async fn fetch_more(&self, direction: Direction) -> Result<FetchOutcome, FetchError> {
        let delay = tokio::time::sleep(self.config.latency);
        match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, delay).await.map_err(|_| FetchError::Timeout)?,
            None => delay.await,
        }
        if self.next_request_fails() {
            return Err(FetchError::Unavailable("simulated outage".to_owned()));
        }
        if self.remote.borrow().is_empty() {
            return Err(FetchError::ChannelNotFound);
        }
        Ok(self.serve_page(direction))
    }
}
