//! Landing page: the three most recent posts.

use crossterm::event::{KeyCode, KeyEvent};
use quill_core::present::{LATEST_COUNT, latest};
use quill_core::store::Status;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{List, ListState, Paragraph};

use super::{KeyOutcome, highlight, post_item, step};
use crate::navigation;
use crate::route::Route;
use crate::state::TuiState;

#[derive(Debug, Default)]
pub struct HomePage {
    pub selected: usize,
}

pub fn handle_key(tui: &mut TuiState, key: KeyEvent) -> KeyOutcome {
    let count = latest(&tui.store.blogs.all_posts, LATEST_COUNT).len();
    let page = &mut tui.pages.home;
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => page.selected = step(page.selected, -1, count),
        KeyCode::Down | KeyCode::Char('j') => page.selected = step(page.selected, 1, count),
        KeyCode::Enter => {
            let Some(post) = latest(&tui.store.blogs.all_posts, LATEST_COUNT).get(page.selected)
            else {
                return KeyOutcome::done();
            };
            let id = post.id.clone();
            return KeyOutcome::Handled(navigation::navigate(tui, Route::Post(id)));
        }
        KeyCode::Char('b') => return KeyOutcome::Handled(navigation::navigate(tui, Route::Blogs)),
        _ => return KeyOutcome::Ignored,
    }
    KeyOutcome::done()
}

pub fn render(tui: &TuiState, frame: &mut Frame, area: Rect) {
    let [header, body] = Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);
    let title = Paragraph::new(vec![
        Line::styled(
            tui.t("home.title"),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Line::styled(tui.t("home.subtitle"), Style::default().fg(Color::Gray)),
    ]);
    frame.render_widget(title, header);

    let blogs = &tui.store.blogs;
    let posts = latest(&blogs.all_posts, LATEST_COUNT);
    if posts.is_empty() {
        let text = match blogs.status {
            Status::Failed => blogs.error.clone().unwrap_or_default(),
            Status::Loading | Status::Idle => tui.t("status.loading"),
            Status::Succeeded => tui.t("blogs.empty"),
        };
        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
            body,
        );
        return;
    }

    let items: Vec<_> = posts
        .iter()
        .map(|post| post_item(post, tui.language()))
        .collect();
    let mut state = ListState::default().with_selected(Some(tui.pages.home.selected));
    frame.render_stateful_widget(
        List::new(items).highlight_style(highlight()),
        body,
        &mut state,
    );
}
