//! Config command handlers.

use anyhow::{Context, Result};
use quill_core::config::{Config, paths};

pub fn path() {
    println!("{}", paths::config_path().display());
}

pub fn init() -> Result<()> {
    let config_path = paths::config_path();
    Config::init(&config_path)
        .with_context(|| format!("init config at {}", config_path.display()))?;
    println!("Created config at {}", config_path.display());
    Ok(())
}

pub fn generate() -> Result<()> {
    print!("{}", Config::generate()?);
    Ok(())
}

/// Prints the settings in effect and where Quill keeps its files.
pub fn show(config: &Config) -> Result<()> {
    let api_url = config.effective_api_url()?;
    let config_path = paths::config_path();
    let source = if config_path.exists() {
        config_path.display().to_string()
    } else {
        "built-in defaults".to_string()
    };

    println!("config:        {source}");
    println!("api_url:       {api_url}");
    println!("language:      {}", config.language.code());
    println!("page_size:     {}", config.page_size);
    println!("all_posts:     {}", config.all_posts_limit);
    println!("session file:  {}", paths::session_path().display());
    println!("state file:    {}", paths::state_path().display());
    println!("logs:          {}", paths::logs_dir().display());
    Ok(())
}
