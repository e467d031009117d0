//! Pure view functions: read `AppState`, draw to the frame.

use quill_core::store::NoticeLevel;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::common::{spinner_frame, truncate_with_ellipsis};
use crate::pages;
use crate::route::Tab;
use crate::state::{AppState, TuiState};

const HEADER_HEIGHT: u16 = 2;
const FOOTER_HEIGHT: u16 = 1;

pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let tui = &app.tui;

    let page_area = if tui.route.has_chrome() {
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .areas(area);
        render_header(tui, frame, header);
        render_footer(tui, frame, footer);
        body.inner(ratatui::layout::Margin::new(1, 0))
    } else {
        area
    };

    pages::render(tui, frame, page_area);

    if let Some(overlay) = &app.overlay {
        overlay.render(frame, area, tui);
    }
}

fn render_header(tui: &TuiState, frame: &mut Frame, area: Rect) {
    let authenticated = tui.is_authenticated();
    let active = Tab::for_route(&tui.route);

    let mut spans = vec![Span::styled(
        " Quill ",
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )];
    for (i, tab) in Tab::ALL.iter().enumerate() {
        if !tab.visible(authenticated) {
            continue;
        }
        let style = if active == Some(*tab) {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!("  {}:", i + 1), Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(tab.label(tui.language()), style));
    }

    let account = if authenticated {
        let name = tui
            .store
            .auth
            .user
            .as_ref()
            .map_or("", |user| user.name.as_str());
        format!("{name}  l: {}", tui.t("nav.logout"))
    } else {
        format!("l: {}  r: {}", tui.t("nav.login"), tui.t("nav.register"))
    };
    let right = format!("{account}  [{}] ", tui.language().code());

    let [left_area, right_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(right.chars().count() as u16),
    ])
    .areas(area);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block.clone()), left_area);
    frame.render_widget(
        Paragraph::new(Line::styled(right, Style::default().fg(Color::Gray))).block(block),
        right_area,
    );
}

fn render_footer(tui: &TuiState, frame: &mut Frame, area: Rect) {
    let width = area.width as usize;
    let line = if let Some(notice) = &tui.store.ui.notice {
        let color = match notice.level {
            NoticeLevel::Info => Color::Cyan,
            NoticeLevel::Success => Color::Green,
            NoticeLevel::Error => Color::Red,
        };
        Line::styled(
            truncate_with_ellipsis(&format!(" {}", notice.text), width),
            Style::default().fg(color),
        )
    } else if tui.is_busy() {
        Line::styled(
            format!(
                " {} {}",
                spinner_frame(tui.spinner_frame),
                tui.t("status.loading")
            ),
            Style::default().fg(Color::Yellow),
        )
    } else {
        let help = format!(" {}  ·  {}", tui.t("footer.help"), tui.api_url);
        Line::styled(
            truncate_with_ellipsis(&help, width),
            Style::default().fg(Color::DarkGray),
        )
    };
    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use quill_core::i18n::Language;
    use quill_core::models::{Pagination, Post, PostPage, User};
    use quill_core::session::Session;
    use quill_core::store::{BlogAction, Notice, Phase, Store};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::route::Route;

    fn screen(app: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn loaded_app() -> AppState {
        let mut store = Store::new(&Session::default(), Language::En);
        store.dispatch(BlogAction::FetchBlogs(Phase::Fulfilled(PostPage {
            posts: vec![Post {
                id: "p1".into(),
                title: "Cauchy sequences".into(),
                content: "Every convergent sequence is Cauchy.".into(),
                tags: vec!["analysis".into()],
                author: User {
                    id: "u1".into(),
                    name: "Ada".into(),
                    ..User::default()
                },
                ..Post::default()
            }],
            pagination: Pagination::default(),
        })));
        AppState::new(store, "http://localhost:5000")
    }

    #[test]
    fn test_home_shows_latest_posts_and_chrome() {
        let app = loaded_app();
        let text = screen(&app);
        assert!(text.contains("Quill"));
        assert!(text.contains("Latest posts"));
        assert!(text.contains("Cauchy sequences"));
        assert!(text.contains("#analysis"));
        assert!(text.contains("l: Log in"));
    }

    #[test]
    fn test_login_has_no_chrome() {
        let mut app = loaded_app();
        app.tui.route = Route::Login;
        let text = screen(&app);
        assert!(text.contains("Sign in to your account"));
        assert!(!text.contains("1:Home"));
    }

    #[test]
    fn test_notice_replaces_help_line() {
        let mut app = loaded_app();
        app.tui.notify(Notice::error("Failed to fetch posts"));
        let text = screen(&app);
        assert!(text.contains("Failed to fetch posts"));
        assert!(!text.contains("Esc: back"));
    }
}
