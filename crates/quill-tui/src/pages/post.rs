//! Single post: body, likes, comment tree and the comment composer.

use crossterm::event::{KeyCode, KeyEvent};
use quill_core::models::{Comment, Post};
use quill_core::present::{format_date, is_author};
use quill_core::store::Notice;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use super::{KeyOutcome, highlight, step, tag_line};
use crate::common::TextField;
use crate::effects::Request;
use crate::navigation;
use crate::overlays::{ConfirmState, Overlay};
use crate::route::Route;
use crate::state::TuiState;

const SCROLL_PAGE: u16 = 10;

/// What the composer submits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Composer {
    Comment,
    Reply { parent_id: String, author: String },
    Edit { comment_id: String },
}

#[derive(Debug, Default)]
pub struct PostPage {
    pub selected: usize,
    pub scroll: u16,
    pub composer: Option<Composer>,
    pub input: TextField,
}

impl PostPage {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub(super) fn paste(&mut self, text: &str) {
        if self.composer.is_some() {
            self.input.insert_str(text);
        }
    }
}

/// Comment tree in display order with nesting depth.
pub(crate) fn flatten(tree: &[Comment]) -> Vec<(usize, &Comment)> {
    fn walk<'a>(tree: &'a [Comment], depth: usize, out: &mut Vec<(usize, &'a Comment)>) {
        for comment in tree {
            out.push((depth, comment));
            walk(&comment.replies, depth + 1, out);
        }
    }
    let mut out = Vec::new();
    walk(tree, 0, &mut out);
    out
}

fn loaded_post<'a>(tui: &'a TuiState, id: &str) -> Option<&'a Post> {
    tui.store
        .blogs
        .current_post
        .as_ref()
        .filter(|post| post.id == id)
}

fn selected_comment(tui: &TuiState, post_id: &str) -> Option<Comment> {
    flatten(tui.store.blogs.comments_for(post_id))
        .get(tui.pages.post.selected)
        .map(|(_, comment)| (*comment).clone())
}

fn owns(tui: &TuiState, comment: &Comment) -> bool {
    tui.store
        .auth
        .user_id()
        .is_some_and(|id| !id.is_empty() && id == comment.author.id)
}

fn login_required(tui: &mut TuiState) -> KeyOutcome {
    let text = tui.t("notice.login_required");
    tui.notify(Notice::info(text));
    KeyOutcome::done()
}

fn handle_composer_key(tui: &mut TuiState, post_id: &str, key: KeyEvent) -> KeyOutcome {
    let page = &mut tui.pages.post;
    match key.code {
        KeyCode::Esc => {
            page.composer = None;
            page.input.clear();
            KeyOutcome::done()
        }
        KeyCode::Enter => {
            if page.input.is_blank() {
                return KeyOutcome::done();
            }
            let content = page.input.take();
            let request = match page.composer.take() {
                Some(Composer::Edit { comment_id }) => Request::UpdateComment {
                    comment_id,
                    content,
                },
                Some(Composer::Reply { parent_id, .. }) => Request::CreateComment {
                    post_id: post_id.to_string(),
                    content,
                    parent_id: Some(parent_id),
                },
                Some(Composer::Comment) | None => Request::CreateComment {
                    post_id: post_id.to_string(),
                    content,
                    parent_id: None,
                },
            };
            KeyOutcome::effect(tui.request(request))
        }
        _ => {
            page.input.handle_key(key);
            KeyOutcome::done()
        }
    }
}

pub fn handle_key(tui: &mut TuiState, post_id: &str, key: KeyEvent) -> KeyOutcome {
    if tui.pages.post.composer.is_some() {
        return handle_composer_key(tui, post_id, key);
    }

    let comment_count = flatten(tui.store.blogs.comments_for(post_id)).len();
    let authenticated = tui.is_authenticated();
    let post_author = loaded_post(tui, post_id)
        .is_some_and(|post| is_author(post, tui.store.auth.user.as_ref()));

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            let page = &mut tui.pages.post;
            page.selected = step(page.selected, -1, comment_count);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let page = &mut tui.pages.post;
            page.selected = step(page.selected, 1, comment_count);
        }
        KeyCode::PageUp => {
            let page = &mut tui.pages.post;
            page.scroll = page.scroll.saturating_sub(SCROLL_PAGE);
        }
        KeyCode::PageDown => {
            let page = &mut tui.pages.post;
            page.scroll = page.scroll.saturating_add(SCROLL_PAGE);
        }
        KeyCode::Char('R') => {
            return KeyOutcome::effect(tui.request(Request::FetchPost(post_id.to_string())));
        }
        KeyCode::Char('f') => {
            if !authenticated {
                return login_required(tui);
            }
            return KeyOutcome::effect(tui.request(Request::LikePost(post_id.to_string())));
        }
        KeyCode::Char('c') => {
            if !authenticated {
                return login_required(tui);
            }
            tui.pages.post.composer = Some(Composer::Comment);
        }
        KeyCode::Char('r' | 'F' | 'E' | 'X' | 'v') => {
            let Some(comment) = selected_comment(tui, post_id) else {
                return KeyOutcome::done();
            };
            if key.code != KeyCode::Char('v') && !authenticated {
                return login_required(tui);
            }
            match key.code {
                KeyCode::Char('r') => {
                    tui.pages.post.composer = Some(Composer::Reply {
                        parent_id: comment.id,
                        author: comment.author.name,
                    });
                }
                KeyCode::Char('F') => {
                    return KeyOutcome::effect(tui.request(Request::LikeComment {
                        comment_id: comment.id,
                        post_id: post_id.to_string(),
                    }));
                }
                KeyCode::Char('E') if owns(tui, &comment) => {
                    tui.pages.post.input.set(comment.content);
                    tui.pages.post.composer = Some(Composer::Edit {
                        comment_id: comment.id,
                    });
                }
                KeyCode::Char('X') if owns(tui, &comment) => {
                    tui.pages.post.selected = tui.pages.post.selected.saturating_sub(1);
                    return KeyOutcome::effect(tui.request(Request::DeleteComment {
                        comment_id: comment.id,
                        post_id: post_id.to_string(),
                    }));
                }
                KeyCode::Char('v') => {
                    return KeyOutcome::effect(tui.request(Request::FetchReplies(comment.id)));
                }
                _ => {}
            }
        }
        KeyCode::Char('e') if post_author => {
            return KeyOutcome::Handled(navigation::navigate(
                tui,
                Route::EditPost(post_id.to_string()),
            ));
        }
        KeyCode::Char('d') if post_author => {
            return KeyOutcome::OpenOverlay(Overlay::Confirm(ConfirmState::new(
                "post.confirm_delete",
                Request::DeletePost(post_id.to_string()),
            )));
        }
        _ => return KeyOutcome::Ignored,
    }
    KeyOutcome::done()
}

pub fn render(tui: &TuiState, frame: &mut Frame, area: Rect) {
    let Route::Post(post_id) = &tui.route else {
        return;
    };
    let blogs = &tui.store.blogs;
    let Some(post) = loaded_post(tui, post_id) else {
        let (text, color) = if blogs.loading {
            (tui.t("status.loading"), Color::DarkGray)
        } else if let Some(error) = &blogs.error {
            (format!("Error: {error}"), Color::Red)
        } else {
            (tui.t("post.not_found"), Color::DarkGray)
        };
        frame.render_widget(Paragraph::new(text).style(Style::default().fg(color)), area);
        return;
    };

    let page = &tui.pages.post;
    let composer_height = if page.composer.is_some() { 3 } else { 0 };
    let [body_area, comments_area, composer_area, keys_area] = Layout::vertical([
        Constraint::Min(6),
        Constraint::Percentage(40),
        Constraint::Length(composer_height),
        Constraint::Length(1),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(post_lines(tui, post))
            .wrap(Wrap { trim: false })
            .scroll((page.scroll, 0)),
        body_area,
    );

    render_comments(tui, post, frame, comments_area);

    if let Some(composer) = &page.composer {
        let title = match composer {
            Composer::Comment => tui.t("post.add_comment"),
            Composer::Reply { author, .. } => format!("{} {author}", tui.t("post.reply_to")),
            Composer::Edit { .. } => tui.t("post.edit_comment"),
        };
        frame.render_widget(
            Paragraph::new(page.input.lines(true, None, "")).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Green))
                    .title(format!(" {title} ")),
            ),
            composer_area,
        );
    }

    frame.render_widget(
        Paragraph::new(Line::styled(
            tui.t("post.keys"),
            Style::default().fg(Color::DarkGray),
        )),
        keys_area,
    );
}

fn post_lines(tui: &TuiState, post: &Post) -> Vec<Line<'static>> {
    let mut byline = vec![
        Span::styled(post.author.name.clone(), Style::default().fg(Color::Green)),
        Span::styled(
            format!("  {}", format_date(post.created_at)),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(status) = &post.status {
        byline.push(Span::styled(
            format!("  [{status}]"),
            Style::default().fg(Color::Yellow),
        ));
    }
    let heart_color = if post.liked == Some(true) {
        Color::Red
    } else {
        Color::Gray
    };

    let mut lines = vec![
        Line::styled(
            post.title.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(byline),
        tag_line(&post.tags, &[]),
        Line::from(vec![
            Span::styled("♥ ", Style::default().fg(heart_color)),
            Span::raw(format!("{} {}", post.like_count, tui.t("post.likes"))),
            Span::styled(
                format!("   💬 {}", post.comment_count),
                Style::default().fg(Color::Gray),
            ),
        ]),
        Line::default(),
    ];
    lines.extend(post.content.lines().map(|line| Line::raw(line.to_string())));
    lines
}

fn render_comments(tui: &TuiState, post: &Post, frame: &mut Frame, area: Rect) {
    let tree = tui.store.blogs.comments_for(&post.id);
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ({}) ", tui.t("post.comments"), post.comment_count));

    if tree.is_empty() {
        let key = if tui.is_authenticated() {
            "post.no_comments"
        } else {
            "post.login_to_comment"
        };
        frame.render_widget(
            Paragraph::new(tui.t(key))
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem<'static>> = flatten(tree)
        .into_iter()
        .map(|(depth, comment)| comment_item(tui, depth, comment))
        .collect();
    let mut state = ListState::default().with_selected(Some(tui.pages.post.selected));
    frame.render_stateful_widget(
        List::new(items).block(block).highlight_style(highlight()),
        area,
        &mut state,
    );
}

fn comment_item(tui: &TuiState, depth: usize, comment: &Comment) -> ListItem<'static> {
    let indent = "  ".repeat(depth);
    let marker = if depth > 0 { "└ " } else { "" };
    let mut header = vec![
        Span::raw(format!("{indent}{marker}")),
        Span::styled(
            comment.author.name.clone(),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "  {}  ♥ {}",
                format_date(comment.created_at),
                comment.like_count
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if !comment.replies.is_empty() {
        header.push(Span::styled(
            format!("  {} {}", comment.replies.len(), tui.t("post.replies")),
            Style::default().fg(Color::DarkGray),
        ));
    }
    let body_indent = "  ".repeat(depth + usize::from(depth > 0));
    let mut lines = vec![Line::from(header)];
    lines.extend(
        comment
            .content
            .lines()
            .map(|line| Line::raw(format!("{body_indent}{line}"))),
    );
    ListItem::new(lines)
}
