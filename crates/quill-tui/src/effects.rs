//! Side effects requested by the reducer and executed by the runtime.

use quill_core::i18n::Language;
use quill_core::models::{Credentials, PostDraft, RegisterRequest};
use quill_core::store::{Action, AuthAction, BlogAction, Phase};

use crate::common::{TaskId, TaskKind};

#[derive(Debug)]
pub enum UiEffect {
    Quit,
    /// Run `request` against the API; the runtime reports back through
    /// `TaskStarted` / `TaskCompleted` events.
    Spawn { task: TaskId, request: Request },
    /// Write the chosen language into the config file.
    PersistLanguage(Language),
    /// Write the store snapshot to disk.
    SaveSnapshot,
}

/// One API operation, resolved by the matching thunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Login(Credentials),
    Register(RegisterRequest),
    Logout,
    FetchUserProfile,
    FetchBlogs,
    FetchPost(String),
    FetchComments(String),
    CreatePost(PostDraft),
    UpdatePost {
        id: String,
        draft: PostDraft,
    },
    DeletePost(String),
    LikePost(String),
    FetchUserPosts,
    CreateComment {
        post_id: String,
        content: String,
        parent_id: Option<String>,
    },
    UpdateComment {
        comment_id: String,
        content: String,
    },
    DeleteComment {
        comment_id: String,
        post_id: String,
    },
    LikeComment {
        comment_id: String,
        post_id: String,
    },
    FetchReplies(String),
}

impl Request {
    pub fn kind(&self) -> TaskKind {
        match self {
            Request::Login(_) | Request::Register(_) | Request::Logout => TaskKind::Auth,
            Request::FetchBlogs => TaskKind::Posts,
            Request::FetchPost(_)
            | Request::CreatePost(_)
            | Request::UpdatePost { .. }
            | Request::DeletePost(_)
            | Request::LikePost(_) => TaskKind::Post,
            Request::FetchComments(_)
            | Request::CreateComment { .. }
            | Request::UpdateComment { .. }
            | Request::DeleteComment { .. }
            | Request::LikeComment { .. }
            | Request::FetchReplies(_) => TaskKind::Comments,
            Request::FetchUserProfile | Request::FetchUserPosts => TaskKind::Profile,
        }
    }

    /// The action dispatched before the request leaves.
    pub fn pending(&self) -> Action {
        match self {
            Request::Login(_) => AuthAction::Login(Phase::Pending).into(),
            Request::Register(_) => AuthAction::Register(Phase::Pending).into(),
            Request::Logout => AuthAction::Logout(Phase::Pending).into(),
            Request::FetchUserProfile => AuthAction::FetchUserProfile(Phase::Pending).into(),
            Request::FetchBlogs => BlogAction::FetchBlogs(Phase::Pending).into(),
            Request::FetchPost(_) => BlogAction::FetchPostById(Phase::Pending).into(),
            Request::FetchComments(post_id) => BlogAction::FetchPostComments {
                post_id: post_id.clone(),
                phase: Phase::Pending,
            }
            .into(),
            Request::CreatePost(_) => BlogAction::CreatePost(Phase::Pending).into(),
            Request::UpdatePost { .. } => BlogAction::UpdatePost(Phase::Pending).into(),
            Request::DeletePost(_) => BlogAction::DeletePost(Phase::Pending).into(),
            Request::LikePost(_) => BlogAction::ToggleLikePost(Phase::Pending).into(),
            Request::FetchUserPosts => BlogAction::FetchUserPosts(Phase::Pending).into(),
            Request::CreateComment { .. } => BlogAction::CreateComment(Phase::Pending).into(),
            Request::UpdateComment { .. } => BlogAction::UpdateComment(Phase::Pending).into(),
            Request::DeleteComment { .. } => BlogAction::DeleteComment(Phase::Pending).into(),
            Request::LikeComment { .. } => BlogAction::ToggleLikeComment(Phase::Pending).into(),
            Request::FetchReplies(comment_id) => BlogAction::FetchCommentReplies {
                comment_id: comment_id.clone(),
                phase: Phase::Pending,
            }
            .into(),
        }
    }
}
