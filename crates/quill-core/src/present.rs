//! Small formatting helpers shared by the TUI and the CLI.

use chrono::{DateTime, Local, Utc};

use crate::models::{Post, User};

/// Length of post excerpts in list views.
pub const EXCERPT_CHARS: usize = 150;

/// Number of posts on the home page.
pub const LATEST_COUNT: usize = 3;

/// First letter of the first two words, uppercased.
pub fn author_initials(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// The first `max_chars` characters, with `...` appended when cut.
pub fn excerpt(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &content[..byte_index]),
        None => content.to_string(),
    }
}

/// Creation date in the local timezone, e.g. `March 1, 2024`.
pub fn format_date(created_at: Option<DateTime<Utc>>) -> String {
    created_at.map_or_else(String::new, |at| {
        at.with_timezone(&Local).format("%B %-d, %Y").to_string()
    })
}

pub fn latest(posts: &[Post], count: usize) -> &[Post] {
    &posts[..posts.len().min(count)]
}

/// Splits comma-separated tags, dropping blanks.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tag list built one entry at a time (trimmed, lowercased, unique).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagInput {
    tags: Vec<String>,
}

impl TagInput {
    /// Adds `raw`; returns false when it was blank or already present.
    pub fn add(&mut self, raw: &str) -> bool {
        let tag = raw.trim().to_lowercase();
        if tag.is_empty() || self.tags.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    pub fn remove(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
    }

    pub fn pop(&mut self) -> Option<String> {
        self.tags.pop()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn into_tags(self) -> Vec<String> {
        self.tags
    }
}

pub fn is_author(post: &Post, user: Option<&User>) -> bool {
    user.is_some_and(|u| !u.id.is_empty() && u.id == post.author.id)
}
