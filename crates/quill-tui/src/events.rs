//! Events consumed by the reducer.

use crossterm::event::Event;
use quill_core::api::SessionEvent;
use quill_core::store::Action;

use crate::common::{TaskCompleted, TaskKind, TaskStarted};

#[derive(Debug)]
pub enum UiEvent {
    /// Animation and notice-expiry clock; also the only event that triggers a render.
    Tick,
    Terminal(Event),
    TaskStarted {
        kind: TaskKind,
        started: TaskStarted,
    },
    /// A request finished; `result` is the action that settles it.
    TaskCompleted {
        kind: TaskKind,
        completed: TaskCompleted<Action>,
    },
    /// Token refresh or forced sign-out observed by the HTTP client.
    Session(SessionEvent),
}
