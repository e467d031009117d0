//! Async operations that resolve to the action settling them.
//!
//! Auth thunks also keep the shared session in step: login, register and
//! refresh store tokens; logout forgets them whether or not the server call
//! succeeded.

use tracing::warn;

use super::auth::AuthAction;
use super::blogs::{BlogAction, CommentLike, CommentRef, NewComment, PostLike};
use super::{Action, Phase};
use crate::api::{ApiClient, ApiError, ApiErrorKind, ApiResult};
use crate::models::{Credentials, PostDraft, PostQuery, RegisterRequest};

fn settle<T>(operation: &str, result: ApiResult<T>) -> Phase<T> {
    match result {
        Ok(value) => Phase::Fulfilled(value),
        Err(err) => {
            warn!(
                operation,
                kind = %err.kind,
                status = ?err.status,
                details = err.details.as_deref().unwrap_or(""),
                "{}",
                err.message
            );
            Phase::Rejected(err.message)
        }
    }
}

fn persist_warning(result: anyhow::Result<()>) {
    if let Err(e) = result {
        warn!("Failed to persist session: {e:#}");
    }
}

pub async fn login(client: &ApiClient, credentials: Credentials) -> Action {
    let phase = settle("login", client.auth().login(&credentials).await);
    if let Phase::Fulfilled(payload) = &phase {
        persist_warning(client.session().establish(payload));
    }
    AuthAction::Login(phase).into()
}

pub async fn register(client: &ApiClient, request: RegisterRequest) -> Action {
    let phase = settle("register", client.auth().register(&request).await);
    if let Phase::Fulfilled(payload) = &phase {
        persist_warning(client.session().establish(payload));
    }
    AuthAction::Register(phase).into()
}

/// Exchanges the stored refresh token; clears the session on failure.
pub async fn refresh_tokens(client: &ApiClient) -> Action {
    let result = match client.session().refresh_token() {
        Some(token) => client.auth().refresh_token(&token).await,
        None => Err(ApiError::new(
            ApiErrorKind::Unauthorized,
            "No refresh token stored",
        )),
    };
    let phase = settle("refresh_tokens", result);
    match &phase {
        Phase::Fulfilled(refresh) => persist_warning(client.session().set_tokens(&refresh.tokens)),
        Phase::Rejected(_) => persist_warning(client.session().clear()),
        Phase::Pending => {}
    }
    AuthAction::RefreshTokens(phase).into()
}

pub async fn logout(client: &ApiClient) -> Action {
    let phase = settle("logout", client.auth().logout().await);
    persist_warning(client.session().clear());
    AuthAction::Logout(phase).into()
}

pub async fn fetch_user_profile(client: &ApiClient) -> Action {
    let phase = settle("fetch_user_profile", client.auth().me().await);
    if let Phase::Fulfilled(user) = &phase {
        persist_warning(client.session().set_user(user.clone()));
    }
    AuthAction::FetchUserProfile(phase).into()
}

pub async fn fetch_all_users(client: &ApiClient) -> Action {
    AuthAction::FetchAllUsers(settle("fetch_all_users", client.auth().all_users().await)).into()
}

pub async fn fetch_posts(client: &ApiClient, query: PostQuery) -> Action {
    BlogAction::FetchPosts(settle("fetch_posts", client.blog().get_posts(&query).await)).into()
}

/// Fetches the first `limit` posts for client-side filtering.
pub async fn fetch_blogs(client: &ApiClient, limit: u64) -> Action {
    let query = PostQuery {
        page: 1,
        limit,
        ..PostQuery::default()
    };
    BlogAction::FetchBlogs(settle("fetch_blogs", client.blog().get_posts(&query).await)).into()
}

pub async fn fetch_post_by_id(client: &ApiClient, id: String) -> Action {
    BlogAction::FetchPostById(settle("fetch_post", client.blog().get_post(&id).await)).into()
}

pub async fn create_post(client: &ApiClient, draft: PostDraft) -> Action {
    BlogAction::CreatePost(settle("create_post", client.blog().create_post(&draft).await)).into()
}

pub async fn update_post(client: &ApiClient, id: String, draft: PostDraft) -> Action {
    BlogAction::UpdatePost(settle(
        "update_post",
        client.blog().update_post(&id, &draft).await,
    ))
    .into()
}

pub async fn delete_post(client: &ApiClient, id: String) -> Action {
    let result = client.blog().delete_post(&id).await.map(|()| id);
    BlogAction::DeletePost(settle("delete_post", result)).into()
}

pub async fn toggle_like_post(client: &ApiClient, id: String) -> Action {
    let result = client
        .blog()
        .toggle_like_post(&id)
        .await
        .map(|toggle| PostLike {
            id,
            liked: toggle.liked,
            like_count: toggle.like_count,
        });
    BlogAction::ToggleLikePost(settle("toggle_like_post", result)).into()
}

pub async fn fetch_user_posts(
    client: &ApiClient,
    page: u64,
    limit: u64,
    status: Option<String>,
) -> Action {
    let result = client
        .blog()
        .get_user_posts(page, limit, status.as_deref())
        .await;
    BlogAction::FetchUserPosts(settle("fetch_user_posts", result)).into()
}

pub async fn fetch_post_comments(
    client: &ApiClient,
    post_id: String,
    page: u64,
    limit: u64,
) -> Action {
    let result = client
        .blog()
        .get_post_comments(&post_id, page, limit)
        .await;
    BlogAction::FetchPostComments {
        post_id,
        phase: settle("fetch_post_comments", result),
    }
    .into()
}

pub async fn create_comment(
    client: &ApiClient,
    post_id: String,
    content: String,
    parent_id: Option<String>,
) -> Action {
    let result = client
        .blog()
        .create_comment(&post_id, &content, parent_id.as_deref())
        .await
        .map(|comment| NewComment { post_id, comment });
    BlogAction::CreateComment(settle("create_comment", result)).into()
}

pub async fn update_comment(client: &ApiClient, comment_id: String, content: String) -> Action {
    BlogAction::UpdateComment(settle(
        "update_comment",
        client.blog().update_comment(&comment_id, &content).await,
    ))
    .into()
}

pub async fn delete_comment(client: &ApiClient, comment_id: String, post_id: String) -> Action {
    let result = client
        .blog()
        .delete_comment(&comment_id)
        .await
        .map(|()| CommentRef {
            comment_id,
            post_id,
        });
    BlogAction::DeleteComment(settle("delete_comment", result)).into()
}

pub async fn toggle_like_comment(
    client: &ApiClient,
    comment_id: String,
    post_id: String,
) -> Action {
    let result = client
        .blog()
        .toggle_like_comment(&comment_id)
        .await
        .map(|toggle| CommentLike {
            comment_id,
            post_id,
            liked: toggle.liked,
            like_count: toggle.like_count,
        });
    BlogAction::ToggleLikeComment(settle("toggle_like_comment", result)).into()
}

pub async fn fetch_comment_replies(
    client: &ApiClient,
    comment_id: String,
    page: u64,
    limit: u64,
) -> Action {
    let result = client
        .blog()
        .get_comment_replies(&comment_id, page, limit)
        .await;
    BlogAction::FetchCommentReplies {
        comment_id,
        phase: settle("fetch_comment_replies", result),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::tempdir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::Config;
    use crate::i18n::Language;
    use crate::session::{Session, SessionFile, SessionHandle};
    use crate::store::{Status, Store};

    fn can_bind_localhost() -> bool {
        std::net::TcpListener::bind("127.0.0.1:0").is_ok()
    }

    #[tokio::test]
    async fn test_login_stores_session_and_store() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "user": {"_id": "u1", "name": "Ada", "email": "ada@example.com"},
                    "tokens": {"access": {"token": "a1"}, "refresh": {"token": "r1"}}
                }
            })))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let session_path = dir.path().join("session.json");
        let session = SessionHandle::persistent(SessionFile::new(&session_path)).unwrap();
        let client = ApiClient::with_base_url(server.uri(), &Config::default(), session).unwrap();

        let mut store = Store::new(&Session::default(), Language::En);
        store.dispatch(AuthAction::Login(Phase::Pending));
        let action = login(
            &client,
            Credentials {
                email: "ada@example.com".into(),
                password: "pw".into(),
            },
        )
        .await;
        store.dispatch(action);

        assert!(store.auth.is_authenticated);
        assert_eq!(store.auth.status, Status::Succeeded);
        let saved = SessionFile::new(&session_path).load().unwrap();
        assert_eq!(saved.access_token.as_deref(), Some("a1"));
    }

    #[tokio::test]
    async fn test_logout_clears_session_even_on_failure() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/logout"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let session = Session {
            access_token: Some("a1".into()),
            refresh_token: Some("r1".into()),
            user: None,
        };
        let handle = SessionHandle::in_memory(session.clone());
        let client = ApiClient::with_base_url(server.uri(), &Config::default(), handle).unwrap();
        let mut store = Store::new(&session, Language::En);

        let action = logout(&client).await;
        assert_eq!(
            action,
            Action::from(AuthAction::Logout(Phase::Rejected("Logout failed".into())))
        );
        store.dispatch(action);

        assert!(!store.auth.is_authenticated);
        assert!(!client.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_delete_comment_carries_ids_into_store() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/comments/c1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Deleted"})))
            .mount(&server)
            .await;

        let client =
            ApiClient::with_base_url(server.uri(), &Config::default(), SessionHandle::default())
                .unwrap();
        let action = delete_comment(&client, "c1".into(), "p1".into()).await;
        assert_eq!(
            action,
            Action::from(BlogAction::DeleteComment(Phase::Fulfilled(CommentRef {
                comment_id: "c1".into(),
                post_id: "p1".into(),
            })))
        );
    }
}
