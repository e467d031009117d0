//! Login session storage.
//!
//! Stores the access/refresh token pair in `<base>/session.json` with
//! restricted permissions (0600). Tokens are never logged or displayed.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::paths;
use crate::models::{AuthPayload, AuthTokens, User};

/// Tokens and the last known user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none() && self.user.is_none()
    }
}

/// On-disk location of the session.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$QUILL_HOME/session.json`.
    pub fn default_location() -> Self {
        Self::new(paths::session_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the session. Returns an empty session if the file doesn't exist.
    pub fn load(&self) -> Result<Session> {
        if !self.path.exists() {
            return Ok(Session::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session from {}", self.path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse session from {}", self.path.display()))
    }

    /// Saves the session with restricted permissions (0600).
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(session).context("Failed to serialize session")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, contents)
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        Ok(())
    }

    /// Removes the session file if present.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove {}", self.path.display()))?;
        }
        Ok(())
    }
}

/// Shared handle to the live session.
///
/// Cloned into the HTTP client (which reads tokens and replaces them after a
/// refresh) and into the thunks (which set them on login and clear them on
/// logout). Every change is written through to the backing file, if any.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<Mutex<Session>>,
    file: Option<Arc<SessionFile>>,
}

impl SessionHandle {
    /// A session that is never written to disk.
    pub fn in_memory(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
            file: None,
        }
    }

    /// Loads the session from `file` and writes changes back to it.
    pub fn persistent(file: SessionFile) -> Result<Self> {
        let session = file.load()?;
        Ok(Self {
            inner: Arc::new(Mutex::new(session)),
            file: Some(Arc::new(file)),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> Session {
        self.lock().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.lock().access_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.lock().refresh_token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().is_authenticated()
    }

    /// Stores a fresh login/registration.
    pub fn establish(&self, payload: &AuthPayload) -> Result<()> {
        self.update(|session| {
            session.access_token = Some(payload.tokens.access.token.clone());
            session.refresh_token = Some(payload.tokens.refresh.token.clone());
            session.user = Some(payload.user.clone());
        })
    }

    /// Replaces the token pair after a refresh.
    pub fn set_tokens(&self, tokens: &AuthTokens) -> Result<()> {
        self.update(|session| {
            session.access_token = Some(tokens.access.token.clone());
            session.refresh_token = Some(tokens.refresh.token.clone());
        })
    }

    pub fn set_user(&self, user: User) -> Result<()> {
        self.update(|session| session.user = Some(user))
    }

    /// Forgets tokens and user.
    pub fn clear(&self) -> Result<()> {
        self.update(|session| *session = Session::default())
    }

    /// The guard is held across the write so the file tracks the order
    /// in which updates were applied.
    fn update(&self, f: impl FnOnce(&mut Session)) -> Result<()> {
        let mut session = self.lock();
        f(&mut session);
        let Some(file) = &self.file else {
            return Ok(());
        };
        if session.is_empty() {
            file.clear()
        } else {
            file.save(&session)
        }
    }
}
