//! Pages of the application and the navigation tabs.

use quill_core::i18n::{Language, t};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Blogs,
    Post(String),
    Profile,
    CreatePost,
    EditPost(String),
    Login,
    Register,
}

impl Route {
    /// Pages that redirect to the login page when signed out.
    pub fn requires_auth(&self) -> bool {
        matches!(self, Route::Profile | Route::CreatePost | Route::EditPost(_))
    }

    /// Login and register render without the nav header and footer.
    pub fn has_chrome(&self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }

    /// Pages whose every key goes to a text field first.
    pub fn is_form(&self) -> bool {
        matches!(
            self,
            Route::CreatePost | Route::EditPost(_) | Route::Login | Route::Register
        )
    }
}

/// Entries in the nav header, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Home,
    Blogs,
    Profile,
    Write,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Home, Tab::Blogs, Tab::Profile, Tab::Write];

    pub fn route(self) -> Route {
        match self {
            Tab::Home => Route::Home,
            Tab::Blogs => Route::Blogs,
            Tab::Profile => Route::Profile,
            Tab::Write => Route::CreatePost,
        }
    }

    pub fn label(self, language: Language) -> String {
        let key = match self {
            Tab::Home => "nav.home",
            Tab::Blogs => "nav.blogs",
            Tab::Profile => "nav.profile",
            Tab::Write => "nav.create",
        };
        t(language, key)
    }

    /// Whether the tab is shown to a visitor with the given auth state.
    pub fn visible(self, authenticated: bool) -> bool {
        authenticated || matches!(self, Tab::Home | Tab::Blogs)
    }

    pub fn for_route(route: &Route) -> Option<Tab> {
        match route {
            Route::Home => Some(Tab::Home),
            Route::Blogs | Route::Post(_) => Some(Tab::Blogs),
            Route::Profile => Some(Tab::Profile),
            Route::CreatePost | Route::EditPost(_) => Some(Tab::Write),
            Route::Login | Route::Register => None,
        }
    }
}
