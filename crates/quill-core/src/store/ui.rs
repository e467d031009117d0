use crate::i18n::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A flash message for the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub notice: Option<Notice>,
    pub language: Language,
}

impl UiState {
    pub fn new(language: Language) -> Self {
        Self {
            notice: None,
            language,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    Notify(Notice),
    DismissNotice,
    SetLanguage(Language),
}

pub fn reduce(state: &mut UiState, action: UiAction) {
    match action {
        UiAction::Notify(notice) => state.notice = Some(notice),
        UiAction::DismissNotice => state.notice = None,
        UiAction::SetLanguage(language) => state.language = language,
    }
}
