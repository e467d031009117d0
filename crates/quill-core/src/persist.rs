//! Store snapshot kept between runs in `$QUILL_HOME/state.json`.
//!
//! Only durable data is saved: the known user, the cached post lists, the
//! active filters and the language. Loading flags, errors and the open post
//! are never written. Snapshots with another key or version are ignored.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::paths;
use crate::i18n::Language;
use crate::models::{Post, User};
use crate::store::{ActiveFilters, Store};

pub const SNAPSHOT_KEY: &str = "quill";
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub key: String,
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub all_posts: Vec<Post>,
    #[serde(default)]
    pub user_posts: Vec<Post>,
    #[serde(default)]
    pub filters: ActiveFilters,
    #[serde(default)]
    pub language: Language,
}

impl Snapshot {
    pub fn capture(store: &Store) -> Self {
        Self {
            key: SNAPSHOT_KEY.to_string(),
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            user: store.auth.user.clone(),
            all_posts: store.blogs.all_posts.clone(),
            user_posts: store.blogs.user_posts.clone(),
            filters: store.blogs.active_filters.clone(),
            language: store.ui.language,
        }
    }

    /// Seeds `store` from the snapshot. The user is only restored while a
    /// session is still active.
    pub fn restore(self, store: &mut Store) {
        if store.auth.is_authenticated && store.auth.user.is_none() {
            store.auth.user = self.user;
        }
        store.blogs.all_posts = self.all_posts;
        store.blogs.user_posts = self.user_posts;
        store.blogs.active_filters = self.filters;
        store.blogs.filtered_posts = store.blogs.active_filters.apply(&store.blogs.all_posts);
        store.ui.language = self.language;
    }

    fn is_compatible(&self) -> bool {
        self.key == SNAPSHOT_KEY && self.version == SNAPSHOT_VERSION
    }
}

/// Reads the snapshot at the default location.
pub fn load() -> Result<Option<Snapshot>> {
    load_from(&paths::state_path())
}

/// Reads a snapshot. Missing files and foreign snapshots yield `None`.
pub fn load_from(path: &Path) -> Result<Option<Snapshot>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read state from {}", path.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse state from {}", path.display()))?;

    if snapshot.is_compatible() {
        Ok(Some(snapshot))
    } else {
        debug!(
            key = %snapshot.key,
            version = snapshot.version,
            "ignoring incompatible state snapshot"
        );
        Ok(None)
    }
}

/// Writes `store`'s snapshot to the default location.
pub fn save(store: &Store) -> Result<()> {
    save_to(&paths::state_path(), &Snapshot::capture(store))
}

/// Writes a snapshot atomically (temp file + rename).
pub fn save_to(path: &Path, snapshot: &Snapshot) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let contents = serde_json::to_string_pretty(snapshot).context("Failed to serialize state")?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("Failed to write state to {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| {
        format!(
            "Failed to rename {} to {}",
            tmp_path.display(),
            path.display()
        )
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::session::Session;
    use crate::store::{BlogAction, Phase};

    fn post(id: &str, tag: &str) -> Post {
        Post {
            id: id.into(),
            title: format!("Post {id}"),
            tags: vec![tag.into()],
            ..Post::default()
        }
    }

    fn populated() -> Store {
        let session = Session {
            access_token: Some("a".into()),
            refresh_token: Some("r".into()),
            user: Some(User {
                id: "u1".into(),
                name: "Ada".into(),
                ..User::default()
            }),
        };
        let mut store = Store::new(&session, Language::It);
        store.dispatch(BlogAction::FetchBlogs(Phase::Fulfilled(
            crate::models::PostPage {
                posts: vec![post("p1", "math"), post("p2", "physics")],
                pagination: crate::models::Pagination::default(),
            },
        )));
        store.dispatch(BlogAction::ToggleTag("math".into()));
        store.dispatch(BlogAction::FetchPostById(Phase::Fulfilled(post("p1", "math"))));
        store.blogs.error = Some("boom".into());
        store
    }

    #[test]
    fn test_round_trip_restores_durable_state_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        save_to(&path, &Snapshot::capture(&populated())).unwrap();

        let session = Session {
            access_token: Some("a".into()),
            ..Session::default()
        };
        let mut fresh = Store::new(&session, Language::En);
        load_from(&path).unwrap().unwrap().restore(&mut fresh);

        assert_eq!(fresh.blogs.all_posts.len(), 2);
        assert_eq!(fresh.blogs.active_filters.tags, vec!["math"]);
        assert_eq!(fresh.blogs.filtered_posts.len(), 1);
        assert_eq!(fresh.ui.language, Language::It);
        assert_eq!(fresh.auth.user.unwrap().name, "Ada");
        assert!(fresh.blogs.current_post.is_none());
        assert!(fresh.blogs.error.is_none());
    }

    #[test]
    fn test_user_not_restored_without_session() {
        let snapshot = Snapshot::capture(&populated());
        let mut store = Store::new(&Session::default(), Language::En);
        snapshot.restore(&mut store);
        assert!(store.auth.user.is_none());
        assert_eq!(store.blogs.all_posts.len(), 2);
    }

    #[test]
    fn test_incompatible_version_is_ignored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut snapshot = Snapshot::capture(&populated());
        snapshot.version = 0;
        save_to(&path, &snapshot).unwrap();
        assert!(load_from(&path).unwrap().is_none());

        snapshot.version = SNAPSHOT_VERSION;
        snapshot.key = "demo".into();
        save_to(&path, &snapshot).unwrap();
        assert!(load_from(&path).unwrap().is_none());
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempdir().unwrap();
        assert!(load_from(&dir.path().join("state.json")).unwrap().is_none());
    }
}
