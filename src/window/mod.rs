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

//! Virtualized message list.
//!
//! The list keeps its behaviour in a pure transition function over
//! [`WindowState`]. [`ChatWindow`] feeds it events, applies scroll effects to a
//! [`Viewport`], and hands the remaining effects back to the host as
//! [`Command`]s.

mod controller;
mod fetch;
pub mod policy;
mod rows;
mod state;
mod transition;
mod unread;
mod virtual_list;

pub use controller::{ChatWindow, Command, FocusProvider, SharedFocus, UnreadNotice, Viewport};
pub use fetch::{Direction, FetchOutcome, PageFetcher};
pub use policy::{WindowPolicy, default_window_policy};
pub use rows::{RowContext, RowView, annotate};
pub use state::{FetchGate, ScrollPhase, WindowPhase, WindowState};
pub use transition::{Effect, Inputs, Transition, WindowEvent, step};
pub use unread::calculate_unread_index;
pub use virtual_list::MountedWindow;
