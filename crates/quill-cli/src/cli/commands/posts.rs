//! Post command handlers.

use anyhow::{Context, Result};
use quill_core::models::{PostDraft, PostQuery};
use quill_core::persist;
use quill_core::present::{TagInput, is_author, parse_tags};
use quill_core::store::{BlogAction, thunks};
use tracing::warn;

use super::CommandContext;
use crate::cli::output;

/// Server-side listing parameters.
#[derive(Debug, Clone, Default)]
pub struct PageQuery {
    pub page: u64,
    pub limit: Option<u64>,
    pub tag: Option<String>,
    pub author: Option<String>,
}

/// Filters applied locally to the full post list.
#[derive(Debug, Clone, Default)]
pub struct LocalFilters {
    pub tags: Vec<String>,
    pub search: Option<String>,
}

impl LocalFilters {
    fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.search.as_deref().is_none_or(|s| s.trim().is_empty())
    }
}

pub async fn list_page(ctx: &mut CommandContext, query: PageQuery) -> Result<()> {
    let query = PostQuery {
        page: query.page.max(1),
        limit: ctx.page_size(query.limit),
        tag: query.tag,
        author: query.author,
    };
    let action = thunks::fetch_posts(&ctx.client, query).await;
    ctx.settle(action)?;

    output::print_posts(&ctx.store.blogs.posts);
    println!(
        "{}",
        output::pagination_line(&ctx.store.blogs.pagination.posts, "posts")
    );
    Ok(())
}

/// Lists the full post list, narrowed by `filters`.
///
/// Online, the list is refetched and the snapshot rewritten. Offline, the
/// snapshot is the only source.
pub async fn list_all(
    ctx: &mut CommandContext,
    filters: &LocalFilters,
    offline: bool,
) -> Result<()> {
    match persist::load() {
        Ok(Some(snapshot)) => snapshot.restore(&mut ctx.store),
        Ok(None) if offline => {
            anyhow::bail!("No cached posts. Run `quill posts list` while online first.")
        }
        Ok(None) => {}
        Err(e) if offline => return Err(e),
        Err(e) => warn!("Ignoring unreadable state snapshot: {e:#}"),
    }

    if !offline {
        let action = thunks::fetch_blogs(&ctx.client, ctx.config.all_posts_limit).await;
        ctx.settle(action)?;
        if let Err(e) = persist::save(&ctx.store) {
            warn!("Failed to save state snapshot: {e:#}");
        }
    }

    // Command-line filters replace whatever the UI left selected.
    ctx.store.dispatch(BlogAction::ClearFilters);
    for tag in &filters.tags {
        ctx.store.dispatch(BlogAction::ToggleTag(tag.clone()));
    }
    if let Some(search) = &filters.search {
        ctx.store.dispatch(BlogAction::SearchPosts(search.clone()));
    }

    let blogs = &ctx.store.blogs;
    output::print_posts(&blogs.filtered_posts);
    if !filters.is_empty() {
        println!(
            "{} of {} posts match",
            blogs.filtered_posts.len(),
            blogs.all_posts.len()
        );
    }
    Ok(())
}

pub async fn show(ctx: &mut CommandContext, id: String) -> Result<()> {
    let action = thunks::fetch_post_by_id(&ctx.client, id.clone()).await;
    ctx.settle(action)?;

    let embedded = ctx
        .store
        .blogs
        .current_post
        .as_ref()
        .is_some_and(|post| post.comments.is_some());
    if !embedded {
        let limit = ctx.page_size(None);
        let action = thunks::fetch_post_comments(&ctx.client, id.clone(), 1, limit).await;
        ctx.settle(action)?;
    }

    let post = ctx
        .store
        .blogs
        .current_post
        .as_ref()
        .with_context(|| format!("Post {id} not found"))?;
    print!("{}", output::post_details(post));
    println!();
    println!("Comments");
    output::print_comments(ctx.store.blogs.comments_for(&id));
    Ok(())
}

pub async fn mine(
    ctx: &mut CommandContext,
    status: Option<String>,
    page: u64,
    limit: Option<u64>,
) -> Result<()> {
    ctx.require_login()?;
    let limit = ctx.page_size(limit);
    let action = thunks::fetch_user_posts(&ctx.client, page.max(1), limit, status).await;
    ctx.settle(action)?;

    output::print_posts(&ctx.store.blogs.user_posts);
    println!(
        "{}",
        output::pagination_line(&ctx.store.blogs.pagination.user_posts, "posts")
    );
    Ok(())
}

fn validated(draft: PostDraft, require_tags: bool) -> Result<PostDraft> {
    match draft.validate(require_tags) {
        Ok(()) => Ok(draft),
        Err(errors) => anyhow::bail!("{}", errors.messages().join("\n")),
    }
}

pub async fn create(
    ctx: &mut CommandContext,
    title: String,
    content: String,
    tags: Vec<String>,
    status: Option<String>,
) -> Result<()> {
    ctx.require_login()?;
    let mut input = TagInput::default();
    for tag in tags.iter().flat_map(|t| parse_tags(t)) {
        input.add(&tag);
    }
    let draft = validated(
        PostDraft {
            title,
            content,
            tags: input.into_tags(),
            status,
        },
        true,
    )?;

    let action = thunks::create_post(&ctx.client, draft).await;
    ctx.settle(action)?;
    // New posts are prepended to every cached list.
    if let Some(post) = ctx.store.blogs.posts.first() {
        println!("Created post {} ({})", post.id, post.title);
    }
    Ok(())
}

/// Loads the post and checks that the logged-in user wrote it.
async fn ensure_author(ctx: &mut CommandContext, id: &str) -> Result<()> {
    ctx.require_login()?;
    if ctx.store.auth.user.is_none() {
        let action = thunks::fetch_user_profile(&ctx.client).await;
        ctx.settle(action)?;
    }
    let action = thunks::fetch_post_by_id(&ctx.client, id.to_string()).await;
    ctx.settle(action)?;

    let blogs = &ctx.store.blogs;
    let post = blogs
        .current_post
        .as_ref()
        .with_context(|| format!("Post {id} not found"))?;
    if !is_author(post, ctx.store.auth.user.as_ref()) {
        anyhow::bail!("Only the author can change this post");
    }
    Ok(())
}

pub async fn edit(
    ctx: &mut CommandContext,
    id: String,
    title: Option<String>,
    content: Option<String>,
    tags: Option<String>,
) -> Result<()> {
    if title.is_none() && content.is_none() && tags.is_none() {
        anyhow::bail!("Nothing to change: pass --title, --content or --tags");
    }
    ensure_author(ctx, &id).await?;

    let current = ctx
        .store
        .blogs
        .current_post
        .as_ref()
        .with_context(|| format!("Post {id} not found"))?;
    let draft = validated(
        PostDraft {
            title: title.unwrap_or_else(|| current.title.clone()),
            content: content.unwrap_or_else(|| current.content.clone()),
            tags: tags.map_or_else(|| current.tags.clone(), |t| parse_tags(&t)),
            status: None,
        },
        false,
    )?;

    let action = thunks::update_post(&ctx.client, id.clone(), draft).await;
    ctx.settle(action)?;
    println!("Updated post {id}");
    Ok(())
}

pub async fn delete(ctx: &mut CommandContext, id: String) -> Result<()> {
    ensure_author(ctx, &id).await?;
    let action = thunks::delete_post(&ctx.client, id.clone()).await;
    ctx.settle(action)?;
    println!("Deleted post {id}");
    Ok(())
}

pub async fn like(ctx: &mut CommandContext, id: String) -> Result<()> {
    ctx.require_login()?;
    let action = thunks::fetch_post_by_id(&ctx.client, id.clone()).await;
    ctx.settle(action)?;
    let action = thunks::toggle_like_post(&ctx.client, id.clone()).await;
    ctx.settle(action)?;

    if let Some(post) = &ctx.store.blogs.current_post {
        let verb = if post.liked == Some(false) {
            "Unliked"
        } else {
            "Liked"
        };
        println!("{verb} \"{}\" ({} likes)", post.title, post.like_count);
    }
    Ok(())
}
