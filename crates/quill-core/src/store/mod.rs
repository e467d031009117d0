//! Client-side cache of server state.
//!
//! Reducers are synchronous and do no I/O. Network work happens in
//! [`thunks`], which resolve to the action that settles an operation; callers
//! dispatch the matching `Phase::Pending` action first.

pub mod auth;
pub mod blogs;
pub mod filters;
pub mod thunks;
pub mod ui;

pub use auth::{AuthAction, AuthState};
pub use blogs::{BlogAction, BlogState};
pub use filters::ActiveFilters;
pub use ui::{Notice, NoticeLevel, UiAction, UiState};

use crate::api::SessionEvent;
use crate::i18n::Language;
use crate::session::Session;

/// Lifecycle of one async operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase<T> {
    Pending,
    Fulfilled(T),
    Rejected(String),
}

impl<T> Phase<T> {
    pub fn rejection(&self) -> Option<&str> {
        match self {
            Phase::Rejected(message) => Some(message),
            Phase::Pending | Phase::Fulfilled(_) => None,
        }
    }
}

/// Coarse request status shown by the UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Auth(AuthAction),
    Blogs(BlogAction),
    Ui(UiAction),
}

impl Action {
    /// Error message of a rejected request, if this action settles one.
    pub fn rejection(&self) -> Option<&str> {
        match self {
            Action::Auth(action) => action.rejection(),
            Action::Blogs(action) => action.rejection(),
            Action::Ui(_) => None,
        }
    }
}

impl From<AuthAction> for Action {
    fn from(action: AuthAction) -> Self {
        Action::Auth(action)
    }
}

impl From<BlogAction> for Action {
    fn from(action: BlogAction) -> Self {
        Action::Blogs(action)
    }
}

impl From<UiAction> for Action {
    fn from(action: UiAction) -> Self {
        Action::Ui(action)
    }
}

impl From<SessionEvent> for Action {
    fn from(event: SessionEvent) -> Self {
        match event {
            SessionEvent::Refreshed(refresh) => {
                AuthAction::RefreshTokens(Phase::Fulfilled(refresh)).into()
            }
            SessionEvent::Cleared => AuthAction::ClearAuth.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Store {
    pub auth: AuthState,
    pub blogs: BlogState,
    pub ui: UiState,
}

impl Store {
    /// A store whose auth slice mirrors the stored session.
    pub fn new(session: &Session, language: Language) -> Self {
        Self {
            auth: AuthState::from_session(session),
            blogs: BlogState::default(),
            ui: UiState::new(language),
        }
    }

    pub fn dispatch(&mut self, action: impl Into<Action>) {
        match action.into() {
            Action::Auth(action) => auth::reduce(&mut self.auth, action),
            Action::Blogs(action) => blogs::reduce(&mut self.blogs, action),
            Action::Ui(action) => ui::reduce(&mut self.ui, action),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuthTokens, Token, TokenRefresh};

    #[test]
    fn test_session_events_map_to_auth_actions() {
        let mut store = Store::new(
            &Session {
                access_token: Some("a".into()),
                refresh_token: Some("r".into()),
                user: None,
            },
            Language::En,
        );
        assert!(store.auth.is_authenticated);

        store.dispatch(SessionEvent::Refreshed(TokenRefresh {
            tokens: AuthTokens {
                access: Token {
                    token: "a2".into(),
                    expires: None,
                },
                refresh: Token {
                    token: "r2".into(),
                    expires: None,
                },
            },
            user: None,
        }));
        assert_eq!(store.auth.access_token.as_deref(), Some("a2"));

        store.dispatch(SessionEvent::Cleared);
        assert!(!store.auth.is_authenticated);
        assert!(store.auth.refresh_token.is_none());
    }

    #[test]
    fn test_rejection_message() {
        let rejected: Action =
            BlogAction::DeletePost(Phase::Rejected("Failed to delete post".into())).into();
        assert_eq!(rejected.rejection(), Some("Failed to delete post"));

        let settled: Action = AuthAction::Logout(Phase::Fulfilled(())).into();
        assert_eq!(settled.rejection(), None);
        assert_eq!(Action::from(BlogAction::ClearFilters).rejection(), None);
    }
}
