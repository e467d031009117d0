//! TUI reducer.
//!
//! All state changes happen here or in the page handlers it calls. The
//! runtime feeds events to `update` and executes the returned effects.

use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use quill_core::api::SessionEvent;
use quill_core::store::{Action, AuthAction, BlogAction, Notice, Phase, UiAction};

use crate::effects::{Request, UiEffect};
use crate::events::UiEvent;
use crate::navigation;
use crate::overlays::OverlayTransition;
use crate::pages::{self, KeyOutcome};
use crate::route::{Route, Tab};
use crate::state::{AppState, TuiState};

pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.tui.spinner_frame = app.tui.spinner_frame.wrapping_add(1);
            app.tui.expire_notice(Instant::now());
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::TaskStarted { kind, started } => {
            app.tui.tasks.state_mut(kind).on_started(started);
            vec![]
        }
        UiEvent::TaskCompleted { kind, completed } => {
            app.tui.tasks.state_mut(kind).finish_if_active(completed.id);
            apply_action(&mut app.tui, completed.result)
        }
        UiEvent::Session(session_event) => handle_session_event(&mut app.tui, session_event),
    }
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
        Event::Paste(text) if app.overlay.is_none() => {
            pages::handle_paste(&mut app.tui, &text);
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return vec![UiEffect::Quit];
    }
    if key.code == KeyCode::F(2) {
        return toggle_language(&mut app.tui);
    }

    if let Some(overlay) = app.overlay.as_mut() {
        let update = overlay.handle_key(key);
        if update.transition == OverlayTransition::Close {
            app.overlay = None;
        }
        return update
            .requests
            .into_iter()
            .map(|request| app.tui.request(request))
            .collect();
    }

    match pages::handle_key(&mut app.tui, key) {
        KeyOutcome::Handled(effects) => effects,
        KeyOutcome::OpenOverlay(overlay) => {
            app.overlay = Some(overlay);
            vec![]
        }
        KeyOutcome::Ignored => handle_global_key(&mut app.tui, key),
    }
}

/// Bindings that apply on every page that did not consume the key.
fn handle_global_key(tui: &mut TuiState, key: KeyEvent) -> Vec<UiEffect> {
    match key.code {
        KeyCode::Esc => navigation::back(tui),
        // Forms keep letters for their fields; only Esc reaches here.
        _ if tui.route.is_form() => vec![],
        KeyCode::Backspace => navigation::back(tui),
        KeyCode::Char('q') => vec![UiEffect::Quit],
        KeyCode::Char('g') => toggle_language(tui),
        KeyCode::Char(digit @ '1'..='4') => {
            let index = digit as usize - '1' as usize;
            let tab = Tab::ALL[index];
            if tab.visible(tui.is_authenticated()) {
                navigation::navigate(tui, tab.route())
            } else {
                navigation::navigate(tui, Route::Login)
            }
        }
        KeyCode::Char('l') if tui.is_authenticated() => vec![tui.request(Request::Logout)],
        KeyCode::Char('l') => navigation::navigate(tui, Route::Login),
        KeyCode::Char('r') if !tui.is_authenticated() => navigation::navigate(tui, Route::Register),
        _ => vec![],
    }
}

fn toggle_language(tui: &mut TuiState) -> Vec<UiEffect> {
    let language = tui.language().next();
    tui.dispatch(UiAction::SetLanguage(language));
    vec![UiEffect::PersistLanguage(language)]
}

fn handle_session_event(tui: &mut TuiState, event: SessionEvent) -> Vec<UiEffect> {
    let cleared = event == SessionEvent::Cleared;
    let was_authenticated = tui.is_authenticated();
    tui.dispatch(event);
    if !cleared || !was_authenticated {
        return vec![];
    }
    let text = tui.t("notice.session_expired");
    tui.notify(Notice::error(text));
    if tui.route.requires_auth() {
        navigation::replace(tui, Route::Login)
    } else {
        vec![]
    }
}

/// What to do after an action lands in the store.
#[derive(Debug)]
enum FollowUp {
    None,
    SignedIn(String),
    SignedOut,
    PostCreated(String),
    PostUpdated(String),
    PostDeleted(String),
    PostLoaded { id: String, has_comments: bool },
    ListsRefreshed,
    Failed(String),
}

impl FollowUp {
    fn of(action: &Action) -> Self {
        match action {
            Action::Auth(
                AuthAction::Login(Phase::Fulfilled(payload))
                | AuthAction::Register(Phase::Fulfilled(payload)),
            ) => {
                FollowUp::SignedIn(payload.user.name.clone())
            }
            Action::Auth(AuthAction::Logout(Phase::Fulfilled(()) | Phase::Rejected(_))) => {
                FollowUp::SignedOut
            }
            Action::Blogs(BlogAction::CreatePost(Phase::Fulfilled(post))) => {
                FollowUp::PostCreated(post.id.clone())
            }
            Action::Blogs(BlogAction::UpdatePost(Phase::Fulfilled(post))) => {
                FollowUp::PostUpdated(post.id.clone())
            }
            Action::Blogs(BlogAction::DeletePost(Phase::Fulfilled(id))) => {
                FollowUp::PostDeleted(id.clone())
            }
            Action::Blogs(BlogAction::FetchPostById(Phase::Fulfilled(post))) => {
                FollowUp::PostLoaded {
                    id: post.id.clone(),
                    has_comments: post.comments.is_some(),
                }
            }
            Action::Blogs(
                BlogAction::FetchBlogs(Phase::Fulfilled(_))
                | BlogAction::FetchUserPosts(Phase::Fulfilled(_)),
            ) => FollowUp::ListsRefreshed,
            Action::Blogs(action) => match action.rejection() {
                Some(message) => FollowUp::Failed(message.to_string()),
                None => FollowUp::None,
            },
            _ => FollowUp::None,
        }
    }
}

/// Dispatches a settled request and reacts to it.
pub(crate) fn apply_action(tui: &mut TuiState, action: Action) -> Vec<UiEffect> {
    let follow_up = FollowUp::of(&action);
    tui.dispatch(action);

    match follow_up {
        FollowUp::None => vec![],
        FollowUp::SignedIn(name) => {
            let text = format!("{}, {name}!", tui.t("notice.welcome"));
            tui.notify(Notice::success(text));
            tui.history.clear();
            navigation::replace(tui, Route::Home)
        }
        FollowUp::SignedOut => {
            let text = tui.t("notice.signed_out");
            tui.notify(Notice::info(text));
            let mut effects = vec![UiEffect::SaveSnapshot];
            if tui.route.requires_auth() {
                effects.extend(navigation::replace(tui, Route::Home));
            }
            effects
        }
        FollowUp::PostCreated(id) => {
            let text = tui.t("notice.post_created");
            tui.notify(Notice::success(text));
            navigation::replace(tui, Route::Post(id))
        }
        FollowUp::PostUpdated(id) => {
            let text = tui.t("notice.post_updated");
            tui.notify(Notice::success(text));
            if tui.route == Route::EditPost(id.clone()) {
                navigation::replace(tui, Route::Post(id))
            } else {
                vec![]
            }
        }
        FollowUp::PostDeleted(id) => {
            let text = tui.t("notice.post_deleted");
            tui.notify(Notice::success(text));
            if tui.route == Route::Post(id.clone()) || tui.route == Route::EditPost(id) {
                navigation::replace(tui, Route::Blogs)
            } else {
                vec![]
            }
        }
        FollowUp::PostLoaded { id, has_comments } => match &tui.route {
            Route::Post(current) if *current == id && !has_comments => {
                vec![tui.request(Request::FetchComments(id))]
            }
            Route::EditPost(current) if *current == id => {
                if !tui.pages.editor.loaded
                    && let Some(post) = tui.store.blogs.current_post.as_ref()
                {
                    tui.pages.editor.load(post);
                }
                navigation::guard_author(tui, &id)
            }
            _ => vec![],
        },
        FollowUp::ListsRefreshed => vec![UiEffect::SaveSnapshot],
        FollowUp::Failed(message) => {
            tui.notify(Notice::error(message));
            vec![]
        }
    }
}
