//! CLI command handlers.
//!
//! Commands run the same thunks as the TUI and render from the resulting
//! store, so both front ends share the cache semantics.

pub mod auth;
pub mod comments;
pub mod config;
pub mod posts;
pub mod tui;

use anyhow::{Context, Result};
use quill_core::api::ApiClient;
use quill_core::config::Config;
use quill_core::session::{SessionFile, SessionHandle};
use quill_core::store::{Action, Store};

pub struct CommandContext {
    pub config: Config,
    pub client: ApiClient,
    pub store: Store,
}

impl CommandContext {
    pub fn new(config: Config, api_url: Option<&str>) -> Result<Self> {
        let client = build_client(&config, api_url)?;
        let store = Store::new(&client.session().snapshot(), config.language);
        Ok(Self {
            config,
            client,
            store,
        })
    }

    /// Applies a settled action. A rejection becomes the command's error.
    pub fn settle(&mut self, action: Action) -> Result<()> {
        let rejection = action.rejection().map(str::to_string);
        self.store.dispatch(action);
        match rejection {
            Some(message) => Err(anyhow::anyhow!(message)),
            None => Ok(()),
        }
    }

    pub fn require_login(&self) -> Result<()> {
        if self.store.auth.is_authenticated {
            Ok(())
        } else {
            anyhow::bail!("Not logged in. Run `quill login` first.")
        }
    }

    pub fn page_size(&self, limit: Option<u64>) -> u64 {
        limit.unwrap_or(self.config.page_size).max(1)
    }
}

/// Builds the API client over the stored session.
///
/// `--api-url` wins over `QUILL_API_URL` and the config file.
pub fn build_client(config: &Config, api_url: Option<&str>) -> Result<ApiClient> {
    let session = SessionHandle::persistent(SessionFile::default_location())
        .context("load stored session")?;
    match api_url {
        Some(url) => {
            let parsed =
                url::Url::parse(url).with_context(|| format!("Invalid API URL: {url}"))?;
            ApiClient::with_base_url(parsed.as_str(), config, session)
        }
        None => ApiClient::new(config, session),
    }
}
