//! Full-screen TUI for Quill.

pub mod common;
pub mod effects;
pub mod events;
pub mod navigation;
pub mod overlays;
pub mod pages;
pub mod render;
pub mod route;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stderr};

use anyhow::Result;
use quill_core::api::ApiClient;
use quill_core::config::Config;
use quill_core::persist;
use quill_core::store::Store;
pub use runtime::TuiRuntime;
use tracing::{info, warn};

/// Runs the interactive UI until the user quits.
///
/// The store starts from the stored session and the last saved snapshot, so
/// cached posts show while the first fetch is in flight. Must be called
/// from inside a tokio runtime; requests are spawned onto it.
pub fn run_app(config: &Config, client: ApiClient) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The interactive UI requires a terminal.\n\
             Use `quill posts list` and friends for non-interactive use."
        );
    }

    let mut store = Store::new(&client.session().snapshot(), config.language);
    match persist::load() {
        Ok(Some(snapshot)) => snapshot.restore(&mut store),
        Ok(None) => {}
        Err(e) => warn!("Ignoring unreadable state snapshot: {e:#}"),
    }
    info!(api_url = client.base_url(), "starting tui");

    let mut runtime = TuiRuntime::new(config, client, store)?;
    runtime.run()
}
