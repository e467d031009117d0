//! Login and registration forms. Both render without the nav chrome.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use quill_core::models::{Credentials, RegisterRequest};
use quill_core::store::{AuthAction, Status};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};

use super::KeyOutcome;
use crate::common::TextField;
use crate::effects::Request;
use crate::navigation;
use crate::overlays::render_utils::calculate_overlay_area;
use crate::route::Route;
use crate::state::TuiState;

#[derive(Debug, Default)]
pub struct LoginForm {
    pub email: TextField,
    pub password: TextField,
    pub focus: usize,
}

impl LoginForm {
    const FIELDS: usize = 2;

    fn field_mut(&mut self) -> &mut TextField {
        if self.focus == 0 {
            &mut self.email
        } else {
            &mut self.password
        }
    }

    pub(super) fn paste(&mut self, text: &str) {
        self.field_mut().insert_str(text);
    }
}

#[derive(Debug, Default)]
pub struct RegisterForm {
    pub name: TextField,
    pub email: TextField,
    pub password: TextField,
    pub focus: usize,
    pub error: Option<String>,
}

impl RegisterForm {
    const FIELDS: usize = 3;

    fn field_mut(&mut self) -> &mut TextField {
        match self.focus {
            0 => &mut self.name,
            1 => &mut self.email,
            _ => &mut self.password,
        }
    }

    pub(super) fn paste(&mut self, text: &str) {
        self.field_mut().insert_str(text);
    }
}

/// Keys shared by both forms. Returns `Some` when the key was navigation.
fn focus_key(focus: &mut usize, fields: usize, key: KeyEvent) -> Option<KeyOutcome> {
    match key.code {
        KeyCode::Tab | KeyCode::Down => *focus = (*focus + 1) % fields,
        KeyCode::BackTab | KeyCode::Up => *focus = (*focus + fields - 1) % fields,
        _ => return None,
    }
    Some(KeyOutcome::done())
}

fn switch_to(tui: &mut TuiState, route: Route) -> KeyOutcome {
    tui.dispatch(AuthAction::ClearError);
    KeyOutcome::Handled(navigation::replace(tui, route))
}

pub fn handle_login_key(tui: &mut TuiState, key: KeyEvent) -> KeyOutcome {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if key.code == KeyCode::Esc {
        return KeyOutcome::Ignored;
    }
    if ctrl && key.code == KeyCode::Char('r') {
        return switch_to(tui, Route::Register);
    }
    let form = &mut tui.pages.login;
    if let Some(outcome) = focus_key(&mut form.focus, LoginForm::FIELDS, key) {
        return outcome;
    }
    if key.code != KeyCode::Enter {
        form.field_mut().handle_key(key);
        return KeyOutcome::done();
    }
    if form.focus + 1 < LoginForm::FIELDS {
        form.focus += 1;
        return KeyOutcome::done();
    }
    if form.email.is_blank() || form.password.value().is_empty() || tui.tasks.auth.is_running() {
        return KeyOutcome::done();
    }
    let credentials = Credentials {
        email: form.email.value().trim().to_string(),
        password: form.password.value().to_string(),
    };
    KeyOutcome::effect(tui.request(Request::Login(credentials)))
}

pub fn handle_register_key(tui: &mut TuiState, key: KeyEvent) -> KeyOutcome {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if key.code == KeyCode::Esc {
        return KeyOutcome::Ignored;
    }
    if ctrl && key.code == KeyCode::Char('r') {
        return switch_to(tui, Route::Login);
    }
    let form = &mut tui.pages.register;
    if let Some(outcome) = focus_key(&mut form.focus, RegisterForm::FIELDS, key) {
        return outcome;
    }
    if key.code != KeyCode::Enter {
        form.error = None;
        form.field_mut().handle_key(key);
        return KeyOutcome::done();
    }
    if form.focus + 1 < RegisterForm::FIELDS {
        form.focus += 1;
        return KeyOutcome::done();
    }
    if form.name.is_blank() || form.email.is_blank() || form.password.value().is_empty() {
        let message = tui.t("auth.fields_required");
        tui.pages.register.error = Some(message);
        return KeyOutcome::done();
    }
    if tui.tasks.auth.is_running() {
        return KeyOutcome::done();
    }
    let request = RegisterRequest {
        name: form.name.value().trim().to_string(),
        email: form.email.value().trim().to_string(),
        password: form.password.value().to_string(),
    };
    KeyOutcome::effect(tui.request(Request::Register(request)))
}

struct FieldView<'a> {
    label: String,
    field: &'a TextField,
    mask: Option<char>,
}

#[allow(clippy::too_many_arguments)]
fn render_form(
    tui: &TuiState,
    frame: &mut Frame,
    area: Rect,
    title: &str,
    fields: &[FieldView<'_>],
    focus: usize,
    error: Option<&str>,
    switch_hint: &str,
) {
    let height = fields.len() as u16 * 3 + 6;
    let popup = calculate_overlay_area(area, 56, height);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(format!(" Quill · {title} "))
        .title_style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        );
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut constraints: Vec<Constraint> = fields.iter().map(|_| Constraint::Length(3)).collect();
    constraints.extend([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)]);
    let rows = Layout::vertical(constraints).split(inner);

    for (i, view) in fields.iter().enumerate() {
        let focused = i == focus;
        let color = if focused { Color::Green } else { Color::DarkGray };
        frame.render_widget(
            Paragraph::new(view.field.lines(focused, view.mask, "")).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .title(format!(" {} ", view.label)),
            ),
            rows[i],
        );
    }

    let status = if tui.store.auth.status == Status::Loading {
        Line::styled(tui.t("auth.signing_in"), Style::default().fg(Color::Yellow))
    } else if let Some(error) = error {
        Line::styled(error.to_string(), Style::default().fg(Color::Red))
    } else {
        Line::default()
    };
    frame.render_widget(Paragraph::new(status), rows[fields.len()]);
    frame.render_widget(
        Paragraph::new(Line::styled(
            format!("{switch_hint}   Esc: back"),
            Style::default().fg(Color::DarkGray),
        )),
        rows[fields.len() + 1],
    );
}

pub fn render_login(tui: &TuiState, frame: &mut Frame, area: Rect) {
    let form = &tui.pages.login;
    let fields = [
        FieldView {
            label: tui.t("auth.email"),
            field: &form.email,
            mask: None,
        },
        FieldView {
            label: tui.t("auth.password"),
            field: &form.password,
            mask: Some('•'),
        },
    ];
    render_form(
        tui,
        frame,
        area,
        &tui.t("auth.login_title"),
        &fields,
        form.focus,
        tui.store.auth.error.as_deref(),
        &tui.t("auth.switch_to_register"),
    );
}

pub fn render_register(tui: &TuiState, frame: &mut Frame, area: Rect) {
    let form = &tui.pages.register;
    let fields = [
        FieldView {
            label: tui.t("auth.name"),
            field: &form.name,
            mask: None,
        },
        FieldView {
            label: tui.t("auth.email"),
            field: &form.email,
            mask: None,
        },
        FieldView {
            label: tui.t("auth.password"),
            field: &form.password,
            mask: Some('•'),
        },
    ];
    let error = form.error.as_deref().or(tui.store.auth.error.as_deref());
    render_form(
        tui,
        frame,
        area,
        &tui.t("auth.register_title"),
        &fields,
        form.focus,
        error,
        &tui.t("auth.switch_to_login"),
    );
}
