//! The signed-in user's card and their posts.

use crossterm::event::{KeyCode, KeyEvent};
use quill_core::present::author_initials;
use quill_core::store::Status;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListState, Paragraph};

use super::{KeyOutcome, highlight, post_item, step};
use crate::effects::Request;
use crate::navigation;
use crate::route::Route;
use crate::state::TuiState;

#[derive(Debug, Default)]
pub struct ProfilePage {
    pub selected: usize,
}

pub fn handle_key(tui: &mut TuiState, key: KeyEvent) -> KeyOutcome {
    let count = tui.store.blogs.user_posts.len();
    let page = &mut tui.pages.profile;
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => page.selected = step(page.selected, -1, count),
        KeyCode::Down | KeyCode::Char('j') => page.selected = step(page.selected, 1, count),
        KeyCode::Char('n') => {
            return KeyOutcome::Handled(navigation::navigate(tui, Route::CreatePost));
        }
        KeyCode::Char('R') => {
            return KeyOutcome::Handled(vec![
                tui.request(Request::FetchUserProfile),
                tui.request(Request::FetchUserPosts),
            ]);
        }
        KeyCode::Enter => {
            let Some(post) = tui.store.blogs.user_posts.get(page.selected) else {
                return KeyOutcome::done();
            };
            let id = post.id.clone();
            return KeyOutcome::Handled(navigation::navigate(tui, Route::Post(id)));
        }
        _ => return KeyOutcome::Ignored,
    }
    KeyOutcome::done()
}

pub fn render(tui: &TuiState, frame: &mut Frame, area: Rect) {
    let auth = &tui.store.auth;
    let Some(user) = &auth.user else {
        let key = if auth.status == Status::Loading {
            "status.loading"
        } else {
            "profile.not_found"
        };
        frame.render_widget(
            Paragraph::new(tui.t(key)).style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    };

    let [card_area, list_area] =
        Layout::vertical([Constraint::Length(4), Constraint::Min(0)]).areas(area);

    let card = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(
                format!(" {} ", author_initials(&user.name)),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", user.name),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::styled(user.email.clone(), Style::default().fg(Color::Gray)),
    ])
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(card, card_area);

    let posts = &tui.store.blogs.user_posts;
    let title = format!("{} ({})", tui.t("profile.posts"), posts.len());
    let [title_area, posts_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(list_area);
    frame.render_widget(
        Paragraph::new(Line::styled(title, Style::default().fg(Color::Green))),
        title_area,
    );
    if posts.is_empty() {
        frame.render_widget(
            Paragraph::new(tui.t("profile.empty")).style(Style::default().fg(Color::DarkGray)),
            posts_area,
        );
        return;
    }
    let items: Vec<_> = posts
        .iter()
        .map(|post| post_item(post, tui.language()))
        .collect();
    let mut state = ListState::default().with_selected(Some(tui.pages.profile.selected));
    frame.render_stateful_widget(
        List::new(items).highlight_style(highlight()),
        posts_area,
        &mut state,
    );
}
