//! One module per route: page-local state, key handling and rendering.

pub mod auth;
pub mod blogs;
pub mod editor;
pub mod home;
pub mod post;
pub mod profile;

use crossterm::event::KeyEvent;
use quill_core::i18n::Language;
use quill_core::models::Post;
use quill_core::present::{EXCERPT_CHARS, excerpt, format_date};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::ListItem;

use crate::effects::UiEffect;
use crate::overlays::Overlay;
use crate::route::Route;
use crate::state::TuiState;

#[derive(Debug, Default)]
pub struct Pages {
    pub home: home::HomePage,
    pub blogs: blogs::BlogsPage,
    pub post: post::PostPage,
    pub profile: profile::ProfilePage,
    pub editor: editor::EditorPage,
    pub login: auth::LoginForm,
    pub register: auth::RegisterForm,
}

/// What a page did with a key press.
#[derive(Debug)]
pub enum KeyOutcome {
    /// Not a page key; global bindings apply.
    Ignored,
    Handled(Vec<UiEffect>),
    OpenOverlay(Overlay),
}

impl KeyOutcome {
    pub fn done() -> Self {
        KeyOutcome::Handled(Vec::new())
    }

    pub fn effect(effect: UiEffect) -> Self {
        KeyOutcome::Handled(vec![effect])
    }
}

pub fn handle_key(tui: &mut TuiState, key: KeyEvent) -> KeyOutcome {
    match tui.route.clone() {
        Route::Home => home::handle_key(tui, key),
        Route::Blogs => blogs::handle_key(tui, key),
        Route::Post(id) => post::handle_key(tui, &id, key),
        Route::Profile => profile::handle_key(tui, key),
        Route::CreatePost | Route::EditPost(_) => editor::handle_key(tui, key),
        Route::Login => auth::handle_login_key(tui, key),
        Route::Register => auth::handle_register_key(tui, key),
    }
}

/// Routes pasted text to the focused field, if any.
pub fn handle_paste(tui: &mut TuiState, text: &str) {
    match tui.route {
        Route::Blogs if tui.pages.blogs.searching => blogs::paste(tui, text),
        Route::Post(_) => tui.pages.post.paste(text),
        Route::CreatePost | Route::EditPost(_) => tui.pages.editor.paste(text),
        Route::Login => tui.pages.login.paste(text),
        Route::Register => tui.pages.register.paste(text),
        _ => {}
    }
}

pub fn render(tui: &TuiState, frame: &mut Frame, area: Rect) {
    match &tui.route {
        Route::Home => home::render(tui, frame, area),
        Route::Blogs => blogs::render(tui, frame, area),
        Route::Post(_) => post::render(tui, frame, area),
        Route::Profile => profile::render(tui, frame, area),
        Route::CreatePost | Route::EditPost(_) => editor::render(tui, frame, area),
        Route::Login => auth::render_login(tui, frame, area),
        Route::Register => auth::render_register(tui, frame, area),
    }
}

/// Moves a list cursor by `delta`, clamped to `len`.
pub(crate) fn step(selected: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    selected.saturating_add_signed(delta).min(len - 1)
}

/// A post card for list views: title, byline, excerpt and tags.
pub(crate) fn post_item(post: &Post, language: Language) -> ListItem<'static> {
    let likes = quill_core::i18n::t(language, "post.likes");
    let mut lines = vec![
        Line::styled(
            post.title.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(vec![
            Span::styled(post.author.name.clone(), Style::default().fg(Color::Green)),
            Span::styled(
                format!(
                    "  {}  ♥ {} {likes}  💬 {}",
                    format_date(post.created_at),
                    post.like_count,
                    post.comment_count
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::styled(
            excerpt(&post.content.replace('\n', " "), EXCERPT_CHARS),
            Style::default().fg(Color::Gray),
        ),
    ];
    if !post.tags.is_empty() {
        lines.push(tag_line(&post.tags, &[]));
    }
    lines.push(Line::default());
    ListItem::new(lines)
}

/// Tags as `#chip` spans; tags in `active` are highlighted.
pub(crate) fn tag_line(tags: &[String], active: &[String]) -> Line<'static> {
    let spans: Vec<Span<'static>> = tags
        .iter()
        .map(|tag| {
            let style = if active.contains(tag) {
                Style::default().fg(Color::Black).bg(Color::Green)
            } else {
                Style::default().fg(Color::Cyan)
            };
            Span::styled(format!(" #{tag} "), style)
        })
        .collect();
    Line::from(spans)
}

pub(crate) fn highlight() -> Style {
    Style::default().bg(Color::Rgb(30, 45, 35))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_clamps() {
        assert_eq!(step(0, -1, 3), 0);
        assert_eq!(step(2, 1, 3), 2);
        assert_eq!(step(1, 1, 3), 2);
        assert_eq!(step(5, 1, 0), 0);
    }
}
