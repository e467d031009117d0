//! Maps a `Request` onto the store thunk that performs it.

use quill_core::api::ApiClient;
use quill_core::store::{Action, thunks};

use crate::effects::Request;

/// Page sizes the thunks need from the config.
#[derive(Debug, Clone, Copy)]
pub struct RequestSettings {
    pub page_size: u64,
    pub all_posts_limit: u64,
}

pub async fn run_request(client: &ApiClient, settings: RequestSettings, request: Request) -> Action {
    match request {
        Request::Login(credentials) => thunks::login(client, credentials).await,
        Request::Register(request) => thunks::register(client, request).await,
        Request::Logout => thunks::logout(client).await,
        Request::FetchUserProfile => thunks::fetch_user_profile(client).await,
        Request::FetchBlogs => thunks::fetch_blogs(client, settings.all_posts_limit).await,
        Request::FetchPost(id) => thunks::fetch_post_by_id(client, id).await,
        Request::FetchComments(post_id) => {
            thunks::fetch_post_comments(client, post_id, 1, settings.page_size).await
        }
        Request::CreatePost(draft) => thunks::create_post(client, draft).await,
        Request::UpdatePost { id, draft } => thunks::update_post(client, id, draft).await,
        Request::DeletePost(id) => thunks::delete_post(client, id).await,
        Request::LikePost(id) => thunks::toggle_like_post(client, id).await,
        Request::FetchUserPosts => {
            thunks::fetch_user_posts(client, 1, settings.page_size, None).await
        }
        Request::CreateComment {
            post_id,
            content,
            parent_id,
        } => thunks::create_comment(client, post_id, content, parent_id).await,
        Request::UpdateComment {
            comment_id,
            content,
        } => thunks::update_comment(client, comment_id, content).await,
        Request::DeleteComment {
            comment_id,
            post_id,
        } => thunks::delete_comment(client, comment_id, post_id).await,
        Request::LikeComment {
            comment_id,
            post_id,
        } => thunks::toggle_like_comment(client, comment_id, post_id).await,
        Request::FetchReplies(comment_id) => {
            thunks::fetch_comment_replies(client, comment_id, 1, settings.page_size).await
        }
    }
}
