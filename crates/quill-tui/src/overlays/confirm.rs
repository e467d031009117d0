//! Yes/no confirmation before a destructive request.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Wrap};

use super::OverlayUpdate;
use super::render_utils::{InputHint, OverlayConfig, render_overlay};
use crate::effects::Request;
use crate::state::TuiState;

#[derive(Debug, Clone)]
pub struct ConfirmState {
    /// i18n key of the question.
    pub message_key: &'static str,
    pub on_confirm: Request,
}

impl ConfirmState {
    pub fn new(message_key: &'static str, on_confirm: Request) -> Self {
        Self {
            message_key,
            on_confirm,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayUpdate {
        match key.code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => {
                OverlayUpdate::close().with_request(self.on_confirm.clone())
            }
            KeyCode::Char('n' | 'N') | KeyCode::Esc => OverlayUpdate::close(),
            _ => OverlayUpdate::stay(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, tui: &TuiState) {
        let yes = tui.t("confirm.yes");
        let no = tui.t("confirm.no");
        let hints = [InputHint::new("y", &yes), InputHint::new("n", &no)];
        let title = tui.t("confirm.title");
        let layout = render_overlay(
            frame,
            area,
            &OverlayConfig {
                title: &title,
                border_color: Color::Red,
                width: 52,
                height: 7,
                hints: &hints,
            },
        );
        let message = Paragraph::new(Line::styled(
            tui.t(self.message_key),
            Style::default().fg(Color::White),
        ))
        .wrap(Wrap { trim: true });
        frame.render_widget(message, layout.body);
    }
}
