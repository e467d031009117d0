//! Route changes and the fetches each page performs on entry.
//!
//! Home and Blogs load the full post list only while it has never been
//! requested (`status == Idle`). Post and EditPost always refetch the post.
//! Pages that need a session redirect to Login when signed out.

use quill_core::present::is_author;
use quill_core::store::{AuthAction, Notice, Status};

use crate::effects::{Request, UiEffect};
use crate::pages::editor::EditorPage;
use crate::route::Route;
use crate::state::TuiState;

/// Opens `route`, remembering the current page for `back`.
pub fn navigate(tui: &mut TuiState, route: Route) -> Vec<UiEffect> {
    if tui.route == route {
        return enter(tui);
    }
    let previous = std::mem::replace(&mut tui.route, route);
    tui.push_history(previous);
    enter(tui)
}

/// Opens `route` without adding the current page to the history.
pub fn replace(tui: &mut TuiState, route: Route) -> Vec<UiEffect> {
    tui.route = route;
    enter(tui)
}

/// Returns to the previous page that is still reachable, or Home.
pub fn back(tui: &mut TuiState) -> Vec<UiEffect> {
    while let Some(route) = tui.history.pop() {
        if route != tui.route && (!route.requires_auth() || tui.is_authenticated()) {
            return replace(tui, route);
        }
    }
    if tui.route == Route::Home {
        Vec::new()
    } else {
        replace(tui, Route::Home)
    }
}

fn enter(tui: &mut TuiState) -> Vec<UiEffect> {
    if tui.route.requires_auth() && !tui.is_authenticated() {
        let text = tui.t("notice.login_required");
        tui.notify(Notice::info(text));
        tui.route = Route::Login;
    }

    let mut effects = Vec::new();
    match tui.route.clone() {
        Route::Home => {
            tui.pages.home.selected = 0;
            fetch_blogs_if_idle(tui, &mut effects);
        }
        Route::Blogs => {
            let query = tui.store.blogs.active_filters.search_query.clone();
            tui.pages.blogs.search.set(query);
            tui.pages.blogs.selected = 0;
            fetch_blogs_if_idle(tui, &mut effects);
        }
        Route::Post(id) => {
            tui.pages.post.reset();
            effects.push(tui.request(Request::FetchPost(id)));
        }
        Route::Profile => {
            tui.pages.profile.selected = 0;
            effects.push(tui.request(Request::FetchUserProfile));
            effects.push(tui.request(Request::FetchUserPosts));
            fetch_blogs_if_idle(tui, &mut effects);
        }
        Route::CreatePost => tui.pages.editor = EditorPage::create(),
        Route::EditPost(id) => {
            let mut page = EditorPage::edit(id.clone());
            if let Some(post) = tui.store.blogs.current_post.as_ref().filter(|p| p.id == id) {
                page.load(post);
            }
            tui.pages.editor = page;
            effects.push(tui.request(Request::FetchPost(id)));
        }
        Route::Login => {
            tui.pages.login = Default::default();
            tui.dispatch(AuthAction::ClearError);
        }
        Route::Register => {
            tui.pages.register = Default::default();
            tui.dispatch(AuthAction::ClearError);
        }
    }
    effects
}

fn fetch_blogs_if_idle(tui: &mut TuiState, effects: &mut Vec<UiEffect>) {
    if tui.store.blogs.status == Status::Idle {
        effects.push(tui.request(Request::FetchBlogs));
    }
}

/// Leaves the edit page when the loaded post belongs to someone else.
pub(crate) fn guard_author(tui: &mut TuiState, post_id: &str) -> Vec<UiEffect> {
    let Some(post) = tui.store.blogs.current_post.as_ref() else {
        return Vec::new();
    };
    if post.id != post_id || is_author(post, tui.store.auth.user.as_ref()) {
        return Vec::new();
    }
    let text = tui.t("notice.not_author");
    tui.notify(Notice::error(text));
    replace(tui, Route::Post(post_id.to_string()))
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use quill_core::i18n::Language;
    use quill_core::session::Session;
    use quill_core::store::{BlogAction, Phase, Store};

    use super::*;

    fn requests(effects: &[UiEffect]) -> Vec<&Request> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                UiEffect::Spawn { request, .. } => Some(request),
                _ => None,
            })
            .collect()
    }

    fn signed_in() -> TuiState {
        let session = Session {
            access_token: Some("a".into()),
            ..Session::default()
        };
        TuiState::new(Store::new(&session, Language::En), "http://localhost:5000")
    }

    #[test]
    fn test_blogs_fetch_only_when_idle() {
        let mut tui = signed_in();
        let effects = navigate(&mut tui, Route::Blogs);
        assert_eq!(requests(&effects), vec![&Request::FetchBlogs]);
        assert_eq!(tui.store.blogs.status, Status::Loading);

        tui.dispatch(BlogAction::FetchBlogs(Phase::Rejected("down".into())));
        let effects = navigate(&mut tui, Route::Home);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_blogs_search_box_resumes_restored_query() {
        let mut tui = signed_in();
        tui.dispatch(BlogAction::SearchPosts("orb".into()));
        navigate(&mut tui, Route::Blogs);
        assert_eq!(tui.pages.blogs.search.value(), "orb");

        for ch in ['/', 'i'] {
            crate::pages::blogs::handle_key(
                &mut tui,
                KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE),
            );
        }
        assert_eq!(tui.pages.blogs.search.value(), "orbi");
        assert_eq!(tui.store.blogs.active_filters.search_query, "orbi");
    }

    #[test]
    fn test_signed_out_redirects_to_login() {
        let mut tui = TuiState::new(
            Store::new(&Session::default(), Language::En),
            "http://localhost:5000",
        );
        let effects = navigate(&mut tui, Route::CreatePost);
        assert!(effects.is_empty());
        assert_eq!(tui.route, Route::Login);
        assert!(tui.store.ui.notice.is_some());
    }

    #[test]
    fn test_profile_fetches_user_and_posts() {
        let mut tui = signed_in();
        let effects = navigate(&mut tui, Route::Profile);
        assert_eq!(
            requests(&effects),
            vec![
                &Request::FetchUserProfile,
                &Request::FetchUserPosts,
                &Request::FetchBlogs
            ]
        );
    }

    #[test]
    fn test_back_skips_pages_needing_auth_after_logout() {
        let mut tui = signed_in();
        navigate(&mut tui, Route::Blogs);
        navigate(&mut tui, Route::Profile);
        navigate(&mut tui, Route::Post("p1".into()));
        tui.dispatch(AuthAction::ClearAuth);

        back(&mut tui);
        assert_eq!(tui.route, Route::Blogs);
        back(&mut tui);
        assert_eq!(tui.route, Route::Home);
    }
}
