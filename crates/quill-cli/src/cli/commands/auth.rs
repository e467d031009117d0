//! Account command handlers.

use anyhow::Result;
use quill_core::models::{Credentials, RegisterRequest, User};
use quill_core::store::thunks;

use super::CommandContext;
use crate::cli::output;

fn describe(user: &User) -> String {
    if user.email.is_empty() {
        user.name.clone()
    } else {
        format!("{} <{}>", user.name, user.email)
    }
}

pub async fn login(ctx: &mut CommandContext, email: String, password: String) -> Result<()> {
    let action = thunks::login(&ctx.client, Credentials { email, password }).await;
    ctx.settle(action)?;
    if let Some(user) = &ctx.store.auth.user {
        println!("Logged in as {}", describe(user));
    }
    Ok(())
}

pub async fn register(
    ctx: &mut CommandContext,
    name: String,
    email: String,
    password: String,
) -> Result<()> {
    if [&name, &email, &password].iter().any(|v| v.trim().is_empty()) {
        anyhow::bail!("Name, email and password are required");
    }
    let request = RegisterRequest {
        name,
        email,
        password,
    };
    let action = thunks::register(&ctx.client, request).await;
    ctx.settle(action)?;
    if let Some(user) = &ctx.store.auth.user {
        println!("Registered and logged in as {}", describe(user));
    }
    Ok(())
}

/// Forgets the local session even when the server call fails.
pub async fn logout(ctx: &mut CommandContext) -> Result<()> {
    if !ctx.store.auth.is_authenticated {
        println!("Not logged in.");
        return Ok(());
    }
    let action = thunks::logout(&ctx.client).await;
    if let Err(e) = ctx.settle(action) {
        tracing::warn!("Server logout failed: {e:#}");
    }
    println!("Logged out.");
    Ok(())
}

pub async fn whoami(ctx: &mut CommandContext) -> Result<()> {
    ctx.require_login()?;
    let action = thunks::fetch_user_profile(&ctx.client).await;
    ctx.settle(action)?;
    if let Some(user) = &ctx.store.auth.user {
        println!("{}", describe(user));
        println!("id: {}", user.id);
    }
    Ok(())
}

pub async fn users(ctx: &mut CommandContext) -> Result<()> {
    ctx.require_login()?;
    let action = thunks::fetch_all_users(&ctx.client).await;
    ctx.settle(action)?;
    if ctx.store.auth.users.is_empty() {
        println!("No users found.");
    } else {
        println!("{}", output::users_table(&ctx.store.auth.users));
    }
    Ok(())
}
