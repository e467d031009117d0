//! Interactive UI entry.

use anyhow::Result;
use quill_core::config::Config;

#[cfg(feature = "tui")]
pub fn run(config: &Config, api_url: Option<&str>) -> Result<()> {
    let client = super::build_client(config, api_url)?;
    quill_tui::run_app(config, client)
}

#[cfg(not(feature = "tui"))]
pub fn run(_config: &Config, _api_url: Option<&str>) -> Result<()> {
    anyhow::bail!("This build has no interactive UI. Run `quill --help` for the available commands.")
}
