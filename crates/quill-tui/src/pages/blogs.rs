//! Post list with search box and tag chips.
//!
//! Every edit to the search box and every chip toggle dispatches a filter
//! action; the store recomputes `filtered_posts` from `all_posts`.

use crossterm::event::{KeyCode, KeyEvent};
use quill_core::store::filters::available_tags;
use quill_core::store::{BlogAction, Status};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListState, Paragraph, Wrap};

use super::{KeyOutcome, highlight, post_item, step};
use crate::common::TextField;
use crate::effects::Request;
use crate::navigation;
use crate::route::Route;
use crate::state::TuiState;

#[derive(Debug, Default)]
pub struct BlogsPage {
    pub search: TextField,
    pub searching: bool,
    pub selected: usize,
    pub tag_cursor: usize,
}

fn search_changed(tui: &mut TuiState) {
    let query = tui.pages.blogs.search.value().to_string();
    tui.dispatch(BlogAction::SearchPosts(query));
    tui.pages.blogs.selected = 0;
}

pub(super) fn paste(tui: &mut TuiState, text: &str) {
    tui.pages.blogs.search.insert_str(text);
    search_changed(tui);
}

pub fn handle_key(tui: &mut TuiState, key: KeyEvent) -> KeyOutcome {
    if tui.pages.blogs.searching {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Down => tui.pages.blogs.searching = false,
            _ => {
                if tui.pages.blogs.search.handle_key(key) {
                    search_changed(tui);
                }
            }
        }
        return KeyOutcome::done();
    }

    let post_count = tui.store.blogs.filtered_posts.len();
    let tags = available_tags(&tui.store.blogs.all_posts);
    let page = &mut tui.pages.blogs;
    match key.code {
        KeyCode::Char('/') => page.searching = true,
        KeyCode::Up | KeyCode::Char('k') => page.selected = step(page.selected, -1, post_count),
        KeyCode::Down | KeyCode::Char('j') => page.selected = step(page.selected, 1, post_count),
        KeyCode::Left => page.tag_cursor = step(page.tag_cursor, -1, tags.len()),
        KeyCode::Right => page.tag_cursor = step(page.tag_cursor, 1, tags.len()),
        KeyCode::Char(' ' | 't') => {
            if let Some(tag) = tags.get(page.tag_cursor) {
                page.selected = 0;
                tui.dispatch(BlogAction::ToggleTag(tag.clone()));
            }
        }
        KeyCode::Char('c') => {
            page.search.clear();
            page.selected = 0;
            tui.dispatch(BlogAction::ClearFilters);
        }
        KeyCode::Char('R') => return KeyOutcome::effect(tui.request(Request::FetchBlogs)),
        KeyCode::Enter => {
            let Some(post) = tui.store.blogs.filtered_posts.get(page.selected) else {
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
    let blogs = &tui.store.blogs;
    let page = &tui.pages.blogs;
    let tags = available_tags(&blogs.all_posts);

    let [title_area, search_area, tags_area, list_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(Line::styled(
            format!("{} ({})", tui.t("blogs.title"), blogs.filtered_posts.len()),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        title_area,
    );

    let search_border = if page.searching {
        Color::Green
    } else {
        Color::DarkGray
    };
    frame.render_widget(
        Paragraph::new(page.search.lines(page.searching, None, &tui.t("blogs.search"))).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(search_border))
                .title(" / "),
        ),
        search_area,
    );

    let mut chips = vec![Span::styled(
        format!("{} ", tui.t("blogs.filter")),
        Style::default().fg(Color::Gray),
    )];
    for (i, tag) in tags.iter().enumerate() {
        let mut style = if blogs.active_filters.tags.contains(tag) {
            Style::default().fg(Color::Black).bg(Color::Green)
        } else {
            Style::default().fg(Color::Cyan)
        };
        if i == page.tag_cursor {
            style = style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
        }
        chips.push(Span::styled(format!(" #{tag} "), style));
    }
    if blogs.active_filters.is_active() {
        chips.push(Span::styled(
            format!("  c: {}", tui.t("blogs.clear")),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(chips)).wrap(Wrap { trim: false }),
        tags_area,
    );

    if blogs.filtered_posts.is_empty() {
        let text = match blogs.status {
            Status::Loading | Status::Idle => tui.t("status.loading"),
            Status::Failed => blogs.error.clone().unwrap_or_default(),
            Status::Succeeded => tui.t("blogs.empty"),
        };
        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
            list_area,
        );
        return;
    }

    let items: Vec<_> = blogs
        .filtered_posts
        .iter()
        .map(|post| post_item(post, tui.language()))
        .collect();
    let mut state = ListState::default().with_selected(Some(page.selected));
    frame.render_stateful_widget(
        List::new(items).highlight_style(highlight()),
        list_area,
        &mut state,
    );
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use quill_core::i18n::Language;
    use quill_core::models::{Pagination, Post, PostPage};
    use quill_core::session::Session;
    use quill_core::store::{Phase, Store};

    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn post(id: &str, title: &str, tags: &[&str]) -> Post {
        Post {
            id: id.into(),
            title: title.into(),
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
            ..Post::default()
        }
    }

    fn tui_with_posts() -> TuiState {
        let mut store = Store::new(&Session::default(), Language::En);
        store.dispatch(BlogAction::FetchBlogs(Phase::Fulfilled(PostPage {
            posts: vec![
                post("p1", "Limits", &["math", "analysis"]),
                post("p2", "Orbits", &["physics"]),
                post("p3", "Series", &["math"]),
            ],
            pagination: Pagination::default(),
        })));
        let mut tui = TuiState::new(store, "http://localhost:5000");
        tui.route = Route::Blogs;
        tui
    }

    #[test]
    fn test_typing_in_search_filters() {
        let mut tui = tui_with_posts();
        handle_key(&mut tui, press(KeyCode::Char('/')));
        for ch in "orb".chars() {
            handle_key(&mut tui, press(KeyCode::Char(ch)));
        }
        assert_eq!(tui.store.blogs.filtered_posts.len(), 1);
        assert_eq!(tui.store.blogs.active_filters.search_query, "orb");

        handle_key(&mut tui, press(KeyCode::Esc));
        assert!(!tui.pages.blogs.searching);
    }

    #[test]
    fn test_tag_chips_intersect() {
        let mut tui = tui_with_posts();
        // chips: math, analysis, physics
        handle_key(&mut tui, press(KeyCode::Char(' ')));
        assert_eq!(tui.store.blogs.filtered_posts.len(), 2);
        handle_key(&mut tui, press(KeyCode::Right));
        handle_key(&mut tui, press(KeyCode::Char(' ')));
        assert_eq!(tui.store.blogs.filtered_posts.len(), 1);
        assert_eq!(tui.store.blogs.filtered_posts[0].id, "p1");

        handle_key(&mut tui, press(KeyCode::Char('c')));
        assert_eq!(tui.store.blogs.filtered_posts.len(), 3);
    }

    #[test]
    fn test_enter_opens_selected_post() {
        let mut tui = tui_with_posts();
        handle_key(&mut tui, press(KeyCode::Down));
        let outcome = handle_key(&mut tui, press(KeyCode::Enter));
        assert!(matches!(outcome, KeyOutcome::Handled(ref effects) if effects.len() == 1));
        assert_eq!(tui.route, Route::Post("p2".into()));
    }
}
