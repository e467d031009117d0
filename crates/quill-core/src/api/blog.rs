use serde::Serialize;

use super::client::ApiRequest;
use super::{ApiClient, ApiResult};
use crate::models::{
    Comment, CommentPage, LikeToggle, Post, PostDraft, PostPage, PostQuery, ReplyPage,
};

const API_PATH: &str = "/api/v1";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CommentBody<'a> {
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_id: Option<&'a str>,
}

/// Post and comment endpoints under `/api/v1`.
pub struct BlogApi<'a> {
    client: &'a ApiClient,
}

impl<'a> BlogApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_posts(&self, query: &PostQuery) -> ApiResult<PostPage> {
        let req = ApiRequest::get(format!("{API_PATH}/posts"))
            .query("page", query.page)
            .query("limit", query.limit)
            .query_opt("tag", query.tag.as_deref())
            .query_opt("author", query.author.as_deref());
        self.client
            .call(req, None)
            .await
            .map_err(|e| e.or_message("Failed to fetch posts"))
    }

    pub async fn get_post(&self, id: &str) -> ApiResult<Post> {
        self.client
            .call(ApiRequest::get(format!("{API_PATH}/posts/{id}")), Some("post"))
            .await
            .map_err(|e| e.or_message("Failed to fetch post"))
    }

    pub async fn create_post(&self, draft: &PostDraft) -> ApiResult<Post> {
        let req = ApiRequest::post(format!("{API_PATH}/posts")).json(draft)?;
        self.client
            .call(req, Some("post"))
            .await
            .map_err(|e| e.or_message("Failed to create post"))
    }

    pub async fn update_post(&self, id: &str, draft: &PostDraft) -> ApiResult<Post> {
        let req = ApiRequest::put(format!("{API_PATH}/posts/{id}")).json(draft)?;
        self.client
            .call(req, Some("post"))
            .await
            .map_err(|e| e.or_message("Failed to update post"))
    }

    pub async fn delete_post(&self, id: &str) -> ApiResult<()> {
        self.client
            .call_unit(ApiRequest::delete(format!("{API_PATH}/posts/{id}")))
            .await
            .map_err(|e| e.or_message("Failed to delete post"))
    }

    pub async fn toggle_like_post(&self, id: &str) -> ApiResult<LikeToggle> {
        self.client
            .call(ApiRequest::post(format!("{API_PATH}/posts/{id}/like")), None)
            .await
            .map_err(|e| e.or_message("Failed to like post"))
    }

    /// Posts written by the logged-in user, optionally by status.
    pub async fn get_user_posts(
        &self,
        page: u64,
        limit: u64,
        status: Option<&str>,
    ) -> ApiResult<PostPage> {
        let req = ApiRequest::get(format!("{API_PATH}/posts/user/me"))
            .query("page", page)
            .query("limit", limit)
            .query_opt("status", status);
        self.client
            .call(req, None)
            .await
            .map_err(|e| e.or_message("Failed to fetch user posts"))
    }

    pub async fn get_post_comments(
        &self,
        post_id: &str,
        page: u64,
        limit: u64,
    ) -> ApiResult<CommentPage> {
        let req = ApiRequest::get(format!("{API_PATH}/comments/post/{post_id}"))
            .query("page", page)
            .query("limit", limit);
        self.client
            .call(req, None)
            .await
            .map_err(|e| e.or_message("Failed to fetch comments"))
    }

    /// Adds a comment, or a reply when `parent_id` is set.
    pub async fn create_comment(
        &self,
        post_id: &str,
        content: &str,
        parent_id: Option<&str>,
    ) -> ApiResult<Comment> {
        let body = CommentBody {
            content,
            parent_id: parent_id.filter(|p| !p.is_empty()),
        };
        let req = ApiRequest::post(format!("{API_PATH}/comments/post/{post_id}")).json(&body)?;
        self.client
            .call(req, Some("comment"))
            .await
            .map_err(|e| e.or_message("Failed to create comment"))
    }

    pub async fn get_comment_replies(
        &self,
        comment_id: &str,
        page: u64,
        limit: u64,
    ) -> ApiResult<ReplyPage> {
        let req = ApiRequest::get(format!("{API_PATH}/comments/{comment_id}/replies"))
            .query("page", page)
            .query("limit", limit);
        self.client
            .call(req, None)
            .await
            .map_err(|e| e.or_message("Failed to fetch replies"))
    }

    pub async fn update_comment(&self, comment_id: &str, content: &str) -> ApiResult<Comment> {
        let body = CommentBody {
            content,
            parent_id: None,
        };
        let req = ApiRequest::put(format!("{API_PATH}/comments/{comment_id}")).json(&body)?;
        self.client
            .call(req, Some("comment"))
            .await
            .map_err(|e| e.or_message("Failed to update comment"))
    }

    pub async fn delete_comment(&self, comment_id: &str) -> ApiResult<()> {
        self.client
            .call_unit(ApiRequest::delete(format!(
                "{API_PATH}/comments/{comment_id}"
            )))
            .await
            .map_err(|e| e.or_message("Failed to delete comment"))
    }

    pub async fn toggle_like_comment(&self, comment_id: &str) -> ApiResult<LikeToggle> {
        self.client
            .call(
                ApiRequest::post(format!("{API_PATH}/comments/{comment_id}/like")),
                None,
            )
            .await
            .map_err(|e| e.or_message("Failed to like comment"))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::api::{ApiClient, ApiErrorKind};
    use crate::config::Config;
    use crate::models::{PostDraft, PostQuery};
    use crate::session::{Session, SessionHandle};

    fn can_bind_localhost() -> bool {
        std::net::TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn client(server: &MockServer) -> ApiClient {
        let session = Session {
            access_token: Some("a1".into()),
            refresh_token: Some("r1".into()),
            user: None,
        };
        ApiClient::with_base_url(
            server.uri(),
            &Config::default(),
            SessionHandle::in_memory(session),
        )
        .unwrap()
    }

    fn post_json(id: &str, title: &str) -> serde_json::Value {
        json!({
            "_id": id,
            "title": title,
            "content": "body",
            "tags": ["math"],
            "author": {"_id": "u1", "name": "Ada"},
            "likeCount": 0,
            "commentCount": 0
        })
    }

    #[tokio::test]
    async fn test_get_posts_sends_filters_and_reads_pagination() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/posts"))
            .and(query_param("page", "1"))
            .and(query_param("limit", "100"))
            .and(query_param("tag", "math"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "posts": [post_json("p1", "Primes"), post_json("p2", "Graphs")],
                    "pagination": {"total": 2, "page": 1, "limit": 100, "pages": 1}
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let query = PostQuery {
            limit: 100,
            tag: Some("math".into()),
            ..PostQuery::default()
        };
        let page = client(&server).blog().get_posts(&query).await.unwrap();
        assert_eq!(page.posts.len(), 2);
        assert_eq!(page.pagination.total, 2);
        assert_eq!(page.pagination.limit, 100);
    }

    #[tokio::test]
    async fn test_create_post_posts_draft() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/posts"))
            .and(body_json(json!({
                "title": "Primes",
                "content": "There are infinitely many.",
                "tags": ["math", "number-theory"]
            })))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({"data": {"post": post_json("p9", "Primes")}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let draft = PostDraft {
            title: "Primes".into(),
            content: "There are infinitely many.".into(),
            tags: vec!["math".into(), "number-theory".into()],
            status: None,
        };
        let post = client(&server).blog().create_post(&draft).await.unwrap();
        assert_eq!(post.id, "p9");
    }

    #[tokio::test]
    async fn test_toggle_like_reads_like_count() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/posts/p1/like"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": {"liked": true, "likeCount": 5}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let toggle = client(&server).blog().toggle_like_post("p1").await.unwrap();
        assert!(toggle.liked);
        assert_eq!(toggle.like_count, 5);
    }

    #[tokio::test]
    async fn test_create_reply_sends_parent_id() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/comments/post/p1"))
            .and(body_json(json!({"content": "agreed", "parentId": "c1"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": {"comment": {"_id": "c2", "post": "p1", "parent": "c1", "content": "agreed"}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = client(&server)
            .blog()
            .create_comment("p1", "agreed", Some("c1"))
            .await
            .unwrap();
        assert_eq!(reply.parent_id.as_deref(), Some("c1"));
    }

    #[tokio::test]
    async fn test_delete_post_accepts_empty_body() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/posts/p1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client(&server).blog().delete_post("p1").await.unwrap();
    }

    #[tokio::test]
    async fn test_replies_and_comment_errors() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/comments/c1/replies"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "replies": [{"_id": "c2", "post": "p1", "parent": "c1", "content": "hi"}],
                    "pagination": {"total": 1, "page": 1, "limit": 10, "pages": 1}
                }
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/v1/comments/c1"))
            .respond_with(
                ResponseTemplate::new(403).set_body_json(json!({"message": "Not your comment"})),
            )
            .mount(&server)
            .await;

        let client = client(&server);
        let replies = client.blog().get_comment_replies("c1", 1, 10).await.unwrap();
        assert_eq!(replies.replies.len(), 1);

        let err = client
            .blog()
            .update_comment("c1", "edited")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::HttpStatus);
        assert_eq!(err.status, Some(403));
        assert_eq!(err.message, "Not your comment");
    }
}
