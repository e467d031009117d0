//! Posts, comments and their filters.
//!
//! The same post can sit in up to four lists (`posts`, `all_posts`,
//! `filtered_posts`, `user_posts`) plus `current_post`. Every server response
//! that changes a post is applied to each copy.

use std::collections::HashMap;

use super::filters::ActiveFilters;
use super::{Phase, Status};
use crate::models::{Comment, CommentPage, Pagination, Post, PostPage, ReplyPage};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogPagination {
    pub posts: Pagination,
    pub user_posts: Pagination,
    /// Keyed by post id.
    pub comments: HashMap<String, Pagination>,
    /// Keyed by parent comment id.
    pub replies: HashMap<String, Pagination>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogState {
    /// Last server-paginated page.
    pub posts: Vec<Post>,
    /// Everything fetched for client-side filtering.
    pub all_posts: Vec<Post>,
    /// `all_posts` narrowed by `active_filters`.
    pub filtered_posts: Vec<Post>,
    /// The logged-in user's posts.
    pub user_posts: Vec<Post>,
    pub current_post: Option<Post>,
    /// Comment trees keyed by post id.
    pub comments: HashMap<String, Vec<Comment>>,
    pub active_filters: ActiveFilters,
    pub pagination: BlogPagination,
    pub loading: bool,
    /// Status of the full post list fetch.
    pub status: Status,
    pub error: Option<String>,
}

/// Like toggle result for a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostLike {
    pub id: String,
    pub liked: bool,
    pub like_count: u64,
}

/// Like toggle result for a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentLike {
    pub comment_id: String,
    pub post_id: String,
    pub liked: bool,
    pub like_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub post_id: String,
    pub comment: Comment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRef {
    pub comment_id: String,
    pub post_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlogAction {
    FetchPosts(Phase<PostPage>),
    FetchBlogs(Phase<PostPage>),
    FetchPostById(Phase<Post>),
    CreatePost(Phase<Post>),
    UpdatePost(Phase<Post>),
    DeletePost(Phase<String>),
    ToggleLikePost(Phase<PostLike>),
    FetchUserPosts(Phase<PostPage>),
    FetchPostComments {
        post_id: String,
        phase: Phase<CommentPage>,
    },
    CreateComment(Phase<NewComment>),
    UpdateComment(Phase<Comment>),
    DeleteComment(Phase<CommentRef>),
    ToggleLikeComment(Phase<CommentLike>),
    FetchCommentReplies {
        comment_id: String,
        phase: Phase<ReplyPage>,
    },
    ClearCurrentPost,
    ClearError,
    /// Selects a single tag, or none.
    FilterByTag(Option<String>),
    ToggleTag(String),
    FilterByAuthor(Option<String>),
    SearchPosts(String),
    ClearFilters,
    ApplyFilters,
}

impl BlogAction {
    pub fn rejection(&self) -> Option<&str> {
        match self {
            BlogAction::FetchPosts(phase)
            | BlogAction::FetchBlogs(phase)
            | BlogAction::FetchUserPosts(phase) => phase.rejection(),
            BlogAction::FetchPostById(phase)
            | BlogAction::CreatePost(phase)
            | BlogAction::UpdatePost(phase) => phase.rejection(),
            BlogAction::DeletePost(phase) => phase.rejection(),
            BlogAction::ToggleLikePost(phase) => phase.rejection(),
            BlogAction::FetchPostComments { phase, .. } => phase.rejection(),
            BlogAction::CreateComment(phase) => phase.rejection(),
            BlogAction::UpdateComment(phase) => phase.rejection(),
            BlogAction::DeleteComment(phase) => phase.rejection(),
            BlogAction::ToggleLikeComment(phase) => phase.rejection(),
            BlogAction::FetchCommentReplies { phase, .. } => phase.rejection(),
            BlogAction::ClearCurrentPost
            | BlogAction::ClearError
            | BlogAction::FilterByTag(_)
            | BlogAction::ToggleTag(_)
            | BlogAction::FilterByAuthor(_)
            | BlogAction::SearchPosts(_)
            | BlogAction::ClearFilters
            | BlogAction::ApplyFilters => None,
        }
    }
}

impl BlogState {
    fn refilter(&mut self) {
        self.filtered_posts = self.active_filters.apply(&self.all_posts);
    }

    /// Applies `f` to every cached copy of post `id`.
    fn for_each_copy(&mut self, id: &str, mut f: impl FnMut(&mut Post)) {
        for list in [
            &mut self.posts,
            &mut self.user_posts,
            &mut self.all_posts,
            &mut self.filtered_posts,
        ] {
            if let Some(post) = list.iter_mut().find(|p| p.id == id) {
                f(post);
            }
        }
        if let Some(post) = self.current_post.as_mut().filter(|p| p.id == id) {
            f(post);
        }
    }

    fn start(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn fail(&mut self, error: String) {
        self.loading = false;
        self.error = Some(error);
    }

    /// Comment `id` anywhere in the trees, preferring `post_id`'s tree.
    fn comment_mut(&mut self, post_id: &str, id: &str) -> Option<&mut Comment> {
        if self
            .comments
            .get(post_id)
            .is_some_and(|tree| find_comment(tree, id).is_some())
        {
            return self
                .comments
                .get_mut(post_id)
                .and_then(|tree| find_comment_mut(tree, id));
        }
        self.comments
            .values_mut()
            .find_map(|tree| find_comment_mut(tree, id))
    }

    /// Every cached comment tree for `post_id`, empty if none.
    pub fn comments_for(&self, post_id: &str) -> &[Comment] {
        self.comments
            .get(post_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

pub fn find_comment<'a>(tree: &'a [Comment], id: &str) -> Option<&'a Comment> {
    tree.iter().find_map(|c| {
        if c.id == id {
            Some(c)
        } else {
            find_comment(&c.replies, id)
        }
    })
}

pub fn find_comment_mut<'a>(tree: &'a mut [Comment], id: &str) -> Option<&'a mut Comment> {
    for comment in tree.iter_mut() {
        if comment.id == id {
            return Some(comment);
        }
        if let Some(found) = find_comment_mut(&mut comment.replies, id) {
            return Some(found);
        }
    }
    None
}

/// Removes comment `id` from anywhere in `tree`.
pub fn remove_comment(tree: &mut Vec<Comment>, id: &str) -> Option<Comment> {
    if let Some(index) = tree.iter().position(|c| c.id == id) {
        return Some(tree.remove(index));
    }
    tree.iter_mut()
        .find_map(|c| remove_comment(&mut c.replies, id))
}

/// Counts a comment and all of its nested replies.
pub fn count_comments(tree: &[Comment]) -> usize {
    tree.iter().map(|c| 1 + count_comments(&c.replies)).sum()
}

#[allow(clippy::too_many_lines)]
pub fn reduce(state: &mut BlogState, action: BlogAction) {
    match action {
        BlogAction::FetchPosts(phase) => match phase {
            Phase::Pending => state.start(),
            Phase::Fulfilled(page) => {
                state.loading = false;
                state.posts = page.posts;
                state.pagination.posts = page.pagination;
            }
            Phase::Rejected(error) => state.fail(error),
        },
        BlogAction::FetchBlogs(phase) => match phase {
            Phase::Pending => {
                state.start();
                state.status = Status::Loading;
            }
            Phase::Fulfilled(page) => {
                state.loading = false;
                state.status = Status::Succeeded;
                state.all_posts = page.posts;
                state.refilter();
            }
            Phase::Rejected(error) => {
                state.fail(error);
                state.status = Status::Failed;
            }
        },
        BlogAction::FetchPostById(phase) => match phase {
            Phase::Pending => state.start(),
            Phase::Fulfilled(post) => {
                state.loading = false;
                if let Some(comments) = &post.comments {
                    state.comments.insert(post.id.clone(), comments.clone());
                }
                state.current_post = Some(post);
            }
            Phase::Rejected(error) => state.fail(error),
        },
        BlogAction::CreatePost(phase) => match phase {
            Phase::Pending => state.start(),
            Phase::Fulfilled(post) => {
                state.loading = false;
                state.posts.insert(0, post.clone());
                state.user_posts.insert(0, post.clone());
                state.all_posts.insert(0, post.clone());
                if state.active_filters.is_active() {
                    state.refilter();
                } else {
                    state.filtered_posts.insert(0, post);
                }
            }
            Phase::Rejected(error) => state.fail(error),
        },
        BlogAction::UpdatePost(phase) => match phase {
            Phase::Pending => state.start(),
            Phase::Fulfilled(updated) => {
                state.loading = false;
                let id = updated.id.clone();
                state.for_each_copy(&id, |post| *post = updated.clone());
            }
            Phase::Rejected(error) => state.fail(error),
        },
        BlogAction::DeletePost(phase) => match phase {
            Phase::Pending => state.start(),
            Phase::Fulfilled(id) => {
                state.loading = false;
                state.posts.retain(|p| p.id != id);
                state.user_posts.retain(|p| p.id != id);
                state.all_posts.retain(|p| p.id != id);
                state.filtered_posts.retain(|p| p.id != id);
                if state.current_post.as_ref().is_some_and(|p| p.id == id) {
                    state.current_post = None;
                }
            }
            Phase::Rejected(error) => state.fail(error),
        },
        BlogAction::ToggleLikePost(phase) => match phase {
            Phase::Pending => {}
            Phase::Fulfilled(like) => state.for_each_copy(&like.id, |post| {
                post.like_count = like.like_count;
                post.liked = Some(like.liked);
            }),
            Phase::Rejected(error) => state.error = Some(error),
        },
        BlogAction::FetchUserPosts(phase) => match phase {
            Phase::Pending => state.start(),
            Phase::Fulfilled(page) => {
                state.loading = false;
                state.user_posts = page.posts;
                state.pagination.user_posts = page.pagination;
            }
            Phase::Rejected(error) => state.fail(error),
        },
        BlogAction::FetchPostComments { post_id, phase } => match phase {
            Phase::Pending => state.start(),
            Phase::Fulfilled(page) => {
                state.loading = false;
                state.comments.insert(post_id.clone(), page.comments);
                state.pagination.comments.insert(post_id, page.pagination);
            }
            Phase::Rejected(error) => state.fail(error),
        },
        BlogAction::CreateComment(phase) => match phase {
            Phase::Pending => {}
            Phase::Fulfilled(NewComment { post_id, comment }) => match comment.parent_id.clone() {
                None => {
                    state
                        .comments
                        .entry(post_id.clone())
                        .or_default()
                        .insert(0, comment);
                    state.for_each_copy(&post_id, |post| post.comment_count += 1);
                }
                Some(parent_id) => {
                    if let Some(parent) = state.comment_mut(&post_id, &parent_id) {
                        parent.replies.push(comment);
                    }
                }
            },
            Phase::Rejected(error) => state.error = Some(error),
        },
        BlogAction::UpdateComment(phase) => match phase {
            Phase::Pending => {}
            Phase::Fulfilled(mut updated) => {
                let id = updated.id.clone();
                let post_id = updated.post_id.clone();
                if let Some(existing) = state.comment_mut(&post_id, &id) {
                    // Edit responses don't embed replies.
                    if updated.replies.is_empty() {
                        updated.replies = std::mem::take(&mut existing.replies);
                    }
                    *existing = updated;
                }
            }
            Phase::Rejected(error) => state.error = Some(error),
        },
        BlogAction::DeleteComment(phase) => match phase {
            Phase::Pending => {}
            Phase::Fulfilled(CommentRef {
                comment_id,
                post_id,
            }) => {
                let Some(tree) = state.comments.get_mut(&post_id) else {
                    return;
                };
                if let Some(index) = tree.iter().position(|c| c.id == comment_id) {
                    tree.remove(index);
                    state.for_each_copy(&post_id, |post| {
                        post.comment_count = post.comment_count.saturating_sub(1);
                    });
                } else {
                    remove_comment(tree, &comment_id);
                }
            }
            Phase::Rejected(error) => state.error = Some(error),
        },
        BlogAction::ToggleLikeComment(phase) => match phase {
            Phase::Pending => {}
            Phase::Fulfilled(like) => {
                if let Some(comment) = state.comment_mut(&like.post_id, &like.comment_id) {
                    comment.like_count = like.like_count;
                }
            }
            Phase::Rejected(error) => state.error = Some(error),
        },
        BlogAction::FetchCommentReplies { comment_id, phase } => match phase {
            Phase::Pending => {}
            Phase::Fulfilled(page) => {
                if let Some(comment) = state
                    .comments
                    .values_mut()
                    .find_map(|tree| find_comment_mut(tree, &comment_id))
                {
                    comment.replies = page.replies;
                    state.pagination.replies.insert(comment_id, page.pagination);
                }
            }
            Phase::Rejected(error) => state.error = Some(error),
        },
        BlogAction::ClearCurrentPost => state.current_post = None,
        BlogAction::ClearError => state.error = None,
        BlogAction::FilterByTag(tag) => {
            state.active_filters.tags = tag.into_iter().collect();
            state.refilter();
        }
        BlogAction::ToggleTag(tag) => {
            state.active_filters.toggle_tag(&tag);
            state.refilter();
        }
        BlogAction::FilterByAuthor(author) => {
            state.active_filters.author = author;
            state.refilter();
        }
        BlogAction::SearchPosts(query) => {
            state.active_filters.search_query = query;
            state.refilter();
        }
        BlogAction::ClearFilters => {
            state.active_filters = ActiveFilters::default();
            state.refilter();
        }
        BlogAction::ApplyFilters => state.refilter(),
    }
}
