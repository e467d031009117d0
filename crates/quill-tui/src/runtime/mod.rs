//! TUI runtime: owns the terminal, runs the event loop, executes effects.
//!
//! Async results arrive through an inbox channel that the loop drains every
//! frame. Session events from the HTTP client (token refresh, forced
//! sign-out) have their own channel and are mirrored into the store.

mod handlers;

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use quill_core::api::{ApiClient, SessionEvent};
use quill_core::config::Config;
use quill_core::persist;
use quill_core::store::Store;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub use self::handlers::RequestSettings;
use crate::common::{TaskCompleted, TaskId, TaskStarted};
use crate::effects::{Request, UiEffect};
use crate::events::UiEvent;
use crate::route::Route;
use crate::state::AppState;
use crate::terminal::{self, QuillTerminal};
use crate::{navigation, render, update};

/// Tick cadence while requests are in flight or keys are arriving.
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Tick cadence when nothing is happening.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

pub struct TuiRuntime {
    terminal: QuillTerminal,
    pub state: AppState,
    client: ApiClient,
    settings: RequestSettings,
    inbox_tx: mpsc::UnboundedSender<UiEvent>,
    inbox_rx: mpsc::UnboundedReceiver<UiEvent>,
    session_rx: mpsc::UnboundedReceiver<SessionEvent>,
    /// Cancelled on exit so in-flight requests stop with the UI.
    shutdown: CancellationToken,
    last_tick: Instant,
    last_terminal_event: Instant,
}

impl TuiRuntime {
    /// Sets up the terminal and wires the client's session events to the UI.
    pub fn new(config: &Config, client: ApiClient, store: Store) -> Result<Self> {
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let (session_tx, session_rx) = mpsc::unbounded_channel();
        let client = client.with_events(session_tx);
        let state = AppState::new(store, client.base_url());
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        let now = Instant::now();
        Ok(Self {
            terminal,
            state,
            client,
            settings: RequestSettings {
                page_size: config.page_size,
                all_posts_limit: config.all_posts_limit,
            },
            inbox_tx,
            inbox_rx,
            session_rx,
            shutdown: CancellationToken::new(),
            last_tick: now,
            last_terminal_event: now,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_input_features()?;

        let effects = navigation::replace(&mut self.state.tui, Route::Home);
        self.execute_effects(effects);
        let result = self.event_loop();

        let _ = terminal::disable_input_features();
        self.shutdown.cancel();
        self.save_snapshot();
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.tui.should_quit {
            let events = self.collect_events()?;

            for event in events {
                if matches!(&event, UiEvent::Terminal(_)) {
                    self.last_terminal_event = Instant::now();
                }
                // Only Tick renders; other events batch into the next frame.
                if matches!(&event, UiEvent::Tick) {
                    dirty = true;
                }
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal.draw(|frame| render::render(&self.state, frame))?;
                dirty = false;
            }
        }
        Ok(())
    }

    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let needs_fast_poll = self.state.tui.is_busy()
            || self.last_terminal_event.elapsed() < IDLE_POLL_DURATION;
        let tick_interval = if needs_fast_poll {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        while let Ok(session_event) = self.session_rx.try_recv() {
            events.push(UiEvent::Session(session_event));
        }
        while let Ok(event) = self.inbox_rx.try_recv() {
            events.push(event);
        }

        let poll_duration = if events.is_empty() {
            tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::ZERO
        };
        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }
        Ok(events)
    }

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => self.state.tui.should_quit = true,
            UiEffect::Spawn { task, request } => self.spawn_request(task, request),
            UiEffect::PersistLanguage(language) => {
                if let Err(e) = Config::save_language(language) {
                    warn!("Failed to save language: {e:#}");
                }
            }
            UiEffect::SaveSnapshot => self.save_snapshot(),
        }
    }

    /// Runs `request` on the tokio runtime with a TaskStarted/TaskCompleted
    /// lifecycle reported through the inbox.
    fn spawn_request(&self, id: TaskId, request: Request) {
        let kind = request.kind();
        let tx = self.inbox_tx.clone();
        let client = self.client.clone();
        let settings = self.settings;
        let shutdown = self.shutdown.clone();
        debug!(?kind, task = id.0, "spawning request");

        let _ = tx.send(UiEvent::TaskStarted {
            kind,
            started: TaskStarted { id },
        });
        tokio::spawn(async move {
            tokio::select! {
                () = shutdown.cancelled() => {}
                action = handlers::run_request(&client, settings, request) => {
                    let _ = tx.send(UiEvent::TaskCompleted {
                        kind,
                        completed: TaskCompleted { id, result: action },
                    });
                }
            }
        });
    }

    fn save_snapshot(&self) {
        if let Err(e) = persist::save(&self.state.tui.store) {
            warn!("Failed to save state snapshot: {e:#}");
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
