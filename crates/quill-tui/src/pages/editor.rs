//! Create and edit forms for posts.
//!
//! Creating collects tags one at a time (Enter adds, Backspace on an empty
//! entry removes the last). Editing takes a comma-separated tag line.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use quill_core::models::{DraftErrors, Post, PostDraft};
use quill_core::present::{TagInput, parse_tags};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::{KeyOutcome, tag_line};
use crate::common::TextField;
use crate::effects::Request;
use crate::route::Route;
use crate::state::TuiState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Field {
    #[default]
    Title,
    Content,
    Tags,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Field::Title => Field::Content,
            Field::Content => Field::Tags,
            Field::Tags => Field::Title,
        }
    }

    fn prev(self) -> Self {
        match self {
            Field::Title => Field::Tags,
            Field::Content => Field::Title,
            Field::Tags => Field::Content,
        }
    }
}

#[derive(Debug, Default)]
pub struct EditorPage {
    /// Post being edited; `None` when creating.
    pub editing: Option<String>,
    /// Whether the edit form has been filled from the fetched post.
    pub loaded: bool,
    pub title: TextField,
    pub content: TextField,
    pub tags: TagInput,
    pub tag_entry: TextField,
    pub tags_csv: TextField,
    pub focus: Field,
    pub errors: DraftErrors,
}

impl EditorPage {
    pub fn create() -> Self {
        Self {
            content: TextField::multiline(),
            ..Self::default()
        }
    }

    pub fn edit(id: impl Into<String>) -> Self {
        Self {
            editing: Some(id.into()),
            ..Self::create()
        }
    }

    /// Fills the edit form from `post`.
    pub fn load(&mut self, post: &Post) {
        self.title.set(post.title.clone());
        self.content.set(post.content.clone());
        self.tags_csv.set(post.tags.join(", "));
        self.loaded = true;
    }

    fn focused_field(&mut self) -> &mut TextField {
        match self.focus {
            Field::Title => &mut self.title,
            Field::Content => &mut self.content,
            Field::Tags if self.editing.is_some() => &mut self.tags_csv,
            Field::Tags => &mut self.tag_entry,
        }
    }

    pub(super) fn paste(&mut self, text: &str) {
        self.focused_field().insert_str(text);
    }

    pub fn draft(&self) -> PostDraft {
        let tags = if self.editing.is_some() {
            parse_tags(self.tags_csv.value())
        } else {
            self.tags.tags().to_vec()
        };
        PostDraft {
            title: self.title.value().to_string(),
            content: self.content.value().to_string(),
            tags,
            status: None,
        }
    }

    /// Validates and returns the request to send, recording field errors.
    fn submit(&mut self) -> Option<Request> {
        let draft = self.draft();
        match draft.validate(self.editing.is_none()) {
            Ok(()) => {
                self.errors = DraftErrors::default();
                Some(match &self.editing {
                    Some(id) => Request::UpdatePost {
                        id: id.clone(),
                        draft,
                    },
                    None => Request::CreatePost(draft),
                })
            }
            Err(errors) => {
                self.errors = errors;
                None
            }
        }
    }
}

pub fn handle_key(tui: &mut TuiState, key: KeyEvent) -> KeyOutcome {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let page = &mut tui.pages.editor;
    match key.code {
        KeyCode::Esc => return KeyOutcome::Ignored,
        KeyCode::Char('s') if ctrl => {
            if tui.tasks.post.is_running() {
                return KeyOutcome::done();
            }
            return match page.submit() {
                Some(request) => KeyOutcome::effect(tui.request(request)),
                None => KeyOutcome::done(),
            };
        }
        KeyCode::Tab => page.focus = page.focus.next(),
        KeyCode::BackTab => page.focus = page.focus.prev(),
        KeyCode::Enter if page.focus == Field::Title => page.focus = Field::Content,
        KeyCode::Enter if page.focus == Field::Tags && page.editing.is_none() => {
            let entry = page.tag_entry.take();
            page.tags.add(&entry);
        }
        KeyCode::Backspace
            if page.focus == Field::Tags
                && page.editing.is_none()
                && page.tag_entry.value().is_empty() =>
        {
            page.tags.pop();
        }
        _ => {
            page.focused_field().handle_key(key);
        }
    }
    KeyOutcome::done()
}

fn field_block(label: String, focused: bool, error: Option<&str>) -> Block<'static> {
    let color = match (focused, error.is_some()) {
        (_, true) => Color::Red,
        (true, false) => Color::Green,
        (false, false) => Color::DarkGray,
    };
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(format!(" {label} "));
    if let Some(error) = error {
        block = block.title_bottom(Line::styled(
            format!(" {error} "),
            Style::default().fg(Color::Red),
        ));
    }
    block
}

pub fn render(tui: &TuiState, frame: &mut Frame, area: Rect) {
    let page = &tui.pages.editor;
    if page.editing.is_some() && !page.loaded {
        frame.render_widget(
            Paragraph::new(tui.t("status.loading")).style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    }

    let heading = match &tui.route {
        Route::EditPost(_) => tui.t("form.update"),
        _ => tui.t("form.create"),
    };
    let [heading_area, title_area, content_area, tags_area, keys_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(4),
        Constraint::Length(1),
    ])
    .areas(area);

    let mut heading_spans = vec![Span::styled(
        heading,
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )];
    if tui.tasks.post.is_running() {
        heading_spans.push(Span::styled(
            format!("  {}", tui.t("form.saving")),
            Style::default().fg(Color::Yellow),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(heading_spans)), heading_area);

    frame.render_widget(
        Paragraph::new(page.title.lines(page.focus == Field::Title, None, "")).block(field_block(
            tui.t("form.title"),
            page.focus == Field::Title,
            page.errors.title,
        )),
        title_area,
    );
    frame.render_widget(
        Paragraph::new(page.content.lines(page.focus == Field::Content, None, ""))
            .wrap(Wrap { trim: false })
            .block(field_block(
                tui.t("form.content"),
                page.focus == Field::Content,
                page.errors.content,
            )),
        content_area,
    );

    let tags_focused = page.focus == Field::Tags;
    let tag_lines = if page.editing.is_some() {
        let mut lines = page.tags_csv.lines(tags_focused, None, "");
        lines.push(Line::styled(
            tui.t("form.tags_csv_hint"),
            Style::default().fg(Color::DarkGray),
        ));
        lines
    } else {
        let mut first = tag_line(page.tags.tags(), &[]);
        if let Some(entry) = page.tag_entry.lines(tags_focused, None, "").into_iter().next() {
            first.spans.extend(entry.spans);
        }
        vec![
            first,
            Line::styled(tui.t("form.tags_hint"), Style::default().fg(Color::DarkGray)),
        ]
    };
    frame.render_widget(
        Paragraph::new(tag_lines).block(field_block(
            tui.t("form.tags"),
            tags_focused,
            page.errors.tags,
        )),
        tags_area,
    );

    frame.render_widget(
        Paragraph::new(Line::styled(
            tui.t("form.keys"),
            Style::default().fg(Color::DarkGray),
        )),
        keys_area,
    );
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use quill_core::i18n::Language;
    use quill_core::session::Session;
    use quill_core::store::Store;

    use super::*;
    use crate::effects::UiEffect;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl_s() -> KeyEvent {
        KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)
    }

    fn type_text(tui: &mut TuiState, text: &str) {
        for ch in text.chars() {
            handle_key(tui, press(KeyCode::Char(ch)));
        }
    }

    fn editor_tui(page: EditorPage, route: Route) -> TuiState {
        let session = Session {
            access_token: Some("a".into()),
            ..Session::default()
        };
        let mut tui = TuiState::new(Store::new(&session, Language::En), "http://localhost:5000");
        tui.route = route;
        tui.pages.editor = page;
        tui
    }

    #[test]
    fn test_create_requires_tags() {
        let mut tui = editor_tui(EditorPage::create(), Route::CreatePost);
        type_text(&mut tui, "Limits");
        handle_key(&mut tui, press(KeyCode::Enter));
        type_text(&mut tui, "Epsilon");
        let outcome = handle_key(&mut tui, ctrl_s());
        assert!(matches!(outcome, KeyOutcome::Handled(ref e) if e.is_empty()));
        assert_eq!(tui.pages.editor.errors.tags, Some("At least one tag is required"));

        handle_key(&mut tui, press(KeyCode::Tab));
        type_text(&mut tui, " Math ");
        handle_key(&mut tui, press(KeyCode::Enter));
        type_text(&mut tui, "math");
        handle_key(&mut tui, press(KeyCode::Enter));
        assert_eq!(tui.pages.editor.tags.tags(), ["math"]);

        let KeyOutcome::Handled(effects) = handle_key(&mut tui, ctrl_s()) else {
            panic!("expected handled");
        };
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::Spawn { request: Request::CreatePost(draft), .. }]
                if draft.title == "Limits" && draft.tags == vec!["math".to_string()]
        ));
        assert!(tui.store.blogs.loading);
    }

    #[test]
    fn test_backspace_on_empty_entry_pops_tag() {
        let mut tui = editor_tui(EditorPage::create(), Route::CreatePost);
        tui.pages.editor.focus = Field::Tags;
        type_text(&mut tui, "a");
        handle_key(&mut tui, press(KeyCode::Enter));
        type_text(&mut tui, "b");
        handle_key(&mut tui, press(KeyCode::Enter));
        handle_key(&mut tui, press(KeyCode::Backspace));
        assert_eq!(tui.pages.editor.tags.tags(), ["a"]);
    }

    #[test]
    fn test_edit_uses_comma_tags_and_allows_none() {
        let mut page = EditorPage::edit("p1");
        page.load(&Post {
            id: "p1".into(),
            title: "Old".into(),
            content: "Body".into(),
            tags: vec!["x".into(), "y".into()],
            ..Post::default()
        });
        assert_eq!(page.tags_csv.value(), "x, y");
        page.tags_csv.clear();
        let mut tui = editor_tui(page, Route::EditPost("p1".into()));

        let KeyOutcome::Handled(effects) = handle_key(&mut tui, ctrl_s()) else {
            panic!("expected handled");
        };
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::Spawn { request: Request::UpdatePost { id, draft }, .. }]
                if id == "p1" && draft.tags.is_empty()
        ));
    }

    #[test]
    fn test_blank_title_reports_error() {
        let mut tui = editor_tui(EditorPage::create(), Route::CreatePost);
        handle_key(&mut tui, ctrl_s());
        assert_eq!(tui.pages.editor.errors.title, Some("Title is required"));
        assert_eq!(tui.pages.editor.errors.content, Some("Content is required"));
    }
}
