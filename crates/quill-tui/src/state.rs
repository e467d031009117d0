//! Application state composition.
//!
//! ```text
//! AppState
//! ├── tui: TuiState
//! │   ├── store: Store           (auth, blogs, ui slices)
//! │   ├── route / history        (current page, back stack)
//! │   ├── pages: Pages           (per-page cursors, inputs, forms)
//! │   ├── task_seq / tasks       (in-flight requests)
//! │   └── notice_at              (when the current notice appeared)
//! └── overlay: Option<Overlay>   (modal confirmation)
//! ```
//!
//! Overlays live beside `TuiState` so their key handlers can borrow both.

use std::time::{Duration, Instant};

use quill_core::i18n::{Language, t};
use quill_core::store::{Action, Notice, Store, UiAction};

use crate::common::{TaskSeq, Tasks};
use crate::effects::{Request, UiEffect};
use crate::overlays::Overlay;
use crate::pages::Pages;
use crate::route::Route;

/// How long a notice stays in the footer.
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Back-stack depth.
const HISTORY_LIMIT: usize = 32;

pub struct AppState {
    pub tui: TuiState,
    pub overlay: Option<Overlay>,
}

impl AppState {
    pub fn new(store: Store, api_url: impl Into<String>) -> Self {
        Self {
            tui: TuiState::new(store, api_url),
            overlay: None,
        }
    }
}

pub struct TuiState {
    pub store: Store,
    pub route: Route,
    pub history: Vec<Route>,
    pub pages: Pages,
    pub task_seq: TaskSeq,
    pub tasks: Tasks,
    pub spinner_frame: usize,
    pub notice_at: Option<Instant>,
    pub api_url: String,
    pub should_quit: bool,
}

impl TuiState {
    pub fn new(store: Store, api_url: impl Into<String>) -> Self {
        Self {
            store,
            route: Route::Home,
            history: Vec::new(),
            pages: Pages::default(),
            task_seq: TaskSeq::default(),
            tasks: Tasks::default(),
            spinner_frame: 0,
            notice_at: None,
            api_url: api_url.into(),
            should_quit: false,
        }
    }

    pub fn language(&self) -> Language {
        self.store.ui.language
    }

    pub fn t(&self, key: &str) -> String {
        t(self.language(), key)
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.auth.is_authenticated
    }

    pub fn dispatch(&mut self, action: impl Into<Action>) {
        self.store.dispatch(action);
    }

    /// Dispatches the pending action for `request` and asks the runtime to run it.
    pub fn request(&mut self, request: Request) -> UiEffect {
        self.store.dispatch(request.pending());
        UiEffect::Spawn {
            task: self.task_seq.next_id(),
            request,
        }
    }

    pub fn notify(&mut self, notice: Notice) {
        self.store.dispatch(UiAction::Notify(notice));
        self.notice_at = Some(Instant::now());
    }

    /// Drops the notice once it has been visible for `NOTICE_TTL`.
    pub fn expire_notice(&mut self, now: Instant) {
        if let Some(at) = self.notice_at
            && now.duration_since(at) >= NOTICE_TTL
        {
            self.store.dispatch(UiAction::DismissNotice);
            self.notice_at = None;
        }
    }

    pub(crate) fn push_history(&mut self, route: Route) {
        if self.history.last() != Some(&route) {
            self.history.push(route);
        }
        if self.history.len() > HISTORY_LIMIT {
            self.history.remove(0);
        }
    }

    /// Whether any request or store slice is loading.
    pub fn is_busy(&self) -> bool {
        self.tasks.is_any_running() || self.store.blogs.loading
    }
}
