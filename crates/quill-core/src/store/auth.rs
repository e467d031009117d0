use super::{Phase, Status};
use crate::models::{AuthPayload, TokenRefresh, User};
use crate::session::Session;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub is_authenticated: bool,
    pub status: Status,
    pub error: Option<String>,
    /// Other registered users.
    pub users: Vec<User>,
}

impl AuthState {
    /// Rehydrates from stored tokens; authenticated iff an access token exists.
    pub fn from_session(session: &Session) -> Self {
        Self {
            user: session.user.clone(),
            access_token: session.access_token.clone(),
            refresh_token: session.refresh_token.clone(),
            is_authenticated: session.is_authenticated(),
            ..Self::default()
        }
    }

    /// Id of the logged-in user, if known.
    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }

    fn establish(&mut self, payload: AuthPayload) {
        self.status = Status::Succeeded;
        self.user = Some(payload.user);
        self.access_token = Some(payload.tokens.access.token);
        self.refresh_token = Some(payload.tokens.refresh.token);
        self.is_authenticated = true;
    }

    fn clear(&mut self) {
        self.user = None;
        self.access_token = None;
        self.refresh_token = None;
        self.is_authenticated = false;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    Login(Phase<AuthPayload>),
    Register(Phase<AuthPayload>),
    RefreshTokens(Phase<TokenRefresh>),
    Logout(Phase<()>),
    FetchUserProfile(Phase<User>),
    FetchAllUsers(Phase<Vec<User>>),
    ClearError,
    ClearAuth,
}

impl AuthAction {
    pub fn rejection(&self) -> Option<&str> {
        match self {
            AuthAction::Login(phase) | AuthAction::Register(phase) => phase.rejection(),
            AuthAction::RefreshTokens(phase) => phase.rejection(),
            AuthAction::Logout(phase) => phase.rejection(),
            AuthAction::FetchUserProfile(phase) => phase.rejection(),
            AuthAction::FetchAllUsers(phase) => phase.rejection(),
            AuthAction::ClearError | AuthAction::ClearAuth => None,
        }
    }
}

pub fn reduce(state: &mut AuthState, action: AuthAction) {
    match action {
        AuthAction::Login(phase) | AuthAction::Register(phase) => match phase {
            Phase::Pending => {
                state.status = Status::Loading;
                state.error = None;
            }
            Phase::Fulfilled(payload) => state.establish(payload),
            Phase::Rejected(error) => {
                state.status = Status::Failed;
                state.error = Some(error);
            }
        },
        AuthAction::RefreshTokens(phase) => match phase {
            Phase::Pending => {}
            Phase::Fulfilled(refresh) => {
                state.access_token = Some(refresh.tokens.access.token);
                state.refresh_token = Some(refresh.tokens.refresh.token);
                state.is_authenticated = true;
                if let Some(user) = refresh.user {
                    state.user = Some(user);
                }
            }
            Phase::Rejected(_) => state.clear(),
        },
        AuthAction::Logout(phase) => match phase {
            Phase::Pending => state.status = Status::Loading,
            // A failed server logout still ends the local session.
            Phase::Fulfilled(()) | Phase::Rejected(_) => {
                state.clear();
                state.status = Status::Idle;
            }
        },
        AuthAction::FetchUserProfile(phase) => match phase {
            Phase::Pending => state.status = Status::Loading,
            Phase::Fulfilled(user) => {
                state.status = Status::Succeeded;
                state.user = Some(user);
            }
            Phase::Rejected(error) => {
                state.status = Status::Failed;
                state.error = Some(error);
            }
        },
        AuthAction::FetchAllUsers(phase) => match phase {
            Phase::Pending => {}
            Phase::Fulfilled(users) => state.users = users,
            Phase::Rejected(error) => state.error = Some(error),
        },
        AuthAction::ClearError => state.error = None,
        AuthAction::ClearAuth => state.clear(),
    }
}
