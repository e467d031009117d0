//! Comment command handlers.

use anyhow::Result;
use quill_core::store::blogs::{BlogAction, find_comment};
use quill_core::store::{Action, Phase, thunks};

use super::CommandContext;
use crate::cli::output;

fn require_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        anyhow::bail!("Comment content cannot be empty");
    }
    Ok(())
}

async fn load_comments(
    ctx: &mut CommandContext,
    post: &str,
    page: u64,
    limit: u64,
) -> Result<()> {
    let action = thunks::fetch_post_comments(&ctx.client, post.to_string(), page, limit).await;
    ctx.settle(action)
}

pub async fn list(
    ctx: &mut CommandContext,
    post: String,
    page: u64,
    limit: Option<u64>,
) -> Result<()> {
    let limit = ctx.page_size(limit);
    load_comments(ctx, &post, page.max(1), limit).await?;

    output::print_comments(ctx.store.blogs.comments_for(&post));
    if let Some(pagination) = ctx.store.blogs.pagination.comments.get(&post) {
        println!("{}", output::pagination_line(pagination, "comments"));
    }
    Ok(())
}

pub async fn add(
    ctx: &mut CommandContext,
    post: String,
    content: String,
    parent: Option<String>,
) -> Result<()> {
    ctx.require_login()?;
    require_content(&content)?;

    let action = thunks::create_comment(&ctx.client, post, content, parent.clone()).await;
    let created = match &action {
        Action::Blogs(BlogAction::CreateComment(Phase::Fulfilled(new))) => {
            Some(new.comment.id.clone())
        }
        _ => None,
    };
    ctx.settle(action)?;

    match (created, parent) {
        (Some(id), Some(parent)) => println!("Replied to {parent} with comment {id}"),
        (Some(id), None) => println!("Added comment {id}"),
        (None, _) => {}
    }
    Ok(())
}

pub async fn edit(ctx: &mut CommandContext, id: String, content: String) -> Result<()> {
    ctx.require_login()?;
    require_content(&content)?;
    let action = thunks::update_comment(&ctx.client, id.clone(), content).await;
    ctx.settle(action)?;
    println!("Updated comment {id}");
    Ok(())
}

pub async fn delete(ctx: &mut CommandContext, id: String, post: String) -> Result<()> {
    ctx.require_login()?;
    let action = thunks::delete_comment(&ctx.client, id.clone(), post).await;
    ctx.settle(action)?;
    println!("Deleted comment {id}");
    Ok(())
}

/// Toggles the like, reporting the new count from the cached thread.
pub async fn like(ctx: &mut CommandContext, id: String, post: String) -> Result<()> {
    ctx.require_login()?;
    let limit = ctx.page_size(None);
    load_comments(ctx, &post, 1, limit).await?;

    let action = thunks::toggle_like_comment(&ctx.client, id.clone(), post.clone()).await;
    let toggled = match &action {
        Action::Blogs(BlogAction::ToggleLikeComment(Phase::Fulfilled(like))) => Some(like.liked),
        _ => None,
    };
    ctx.settle(action)?;

    let verb = if toggled == Some(false) { "Unliked" } else { "Liked" };
    match find_comment(ctx.store.blogs.comments_for(&post), &id) {
        Some(comment) => println!("{verb} comment {id} ({} likes)", comment.like_count),
        None => println!("{verb} comment {id}"),
    }
    Ok(())
}

pub async fn replies(
    ctx: &mut CommandContext,
    id: String,
    page: u64,
    limit: Option<u64>,
) -> Result<()> {
    let limit = ctx.page_size(limit);
    let action = thunks::fetch_comment_replies(&ctx.client, id, page.max(1), limit).await;
    // Replies only land in the store under a cached parent, so read them off
    // the settled action.
    let fetched = match &action {
        Action::Blogs(BlogAction::FetchCommentReplies {
            phase: Phase::Fulfilled(page),
            ..
        }) => Some(page.clone()),
        _ => None,
    };
    ctx.settle(action)?;

    if let Some(page) = fetched {
        output::print_comments(&page.replies);
        println!("{}", output::pagination_line(&page.pagination, "replies"));
    }
    Ok(())
}
