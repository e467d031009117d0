//! Configuration management for Quill.
//!
//! Loads configuration from ${QUILL_HOME}/config.toml with sensible defaults.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::i18n::Language;

/// Environment variable overriding the backend URL.
pub const API_URL_ENV: &str = "QUILL_API_URL";

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

/// Merges user config values into the default template.
///
/// New comments/sections from the template are always present,
/// while the user's customized values are preserved.
fn merge_with_template(user_config: &str) -> Result<String> {
    use toml_edit::DocumentMut;

    let mut doc: DocumentMut = default_config_template()
        .parse()
        .context("Failed to parse default config template")?;
    let user_doc: DocumentMut = user_config.parse().context("Failed to parse user config")?;

    merge_items(doc.as_table_mut(), user_doc.as_table());

    Ok(doc.to_string())
}

/// Recursively merges items from source table into target table.
fn merge_items(target: &mut toml_edit::Table, source: &toml_edit::Table) {
    use toml_edit::Item;

    for (key, value) in source.iter() {
        match value {
            Item::Value(v) => {
                target[key] = Item::Value(v.clone());
            }
            Item::Table(src_table) => {
                if let Some(Item::Table(target_table)) = target.get_mut(key) {
                    merge_items(target_table, src_table);
                } else {
                    target[key] = Item::Table(src_table.clone());
                }
            }
            Item::ArrayOfTables(src_arr) => {
                target[key] = Item::ArrayOfTables(src_arr.clone());
            }
            Item::None => {}
        }
    }
}

pub mod paths {
    //! Path resolution for Quill configuration and data files.
    //!
    //! QUILL_HOME resolution order:
    //! 1. QUILL_HOME environment variable (if set)
    //! 2. ~/.config/quill (default)

    use std::path::PathBuf;

    /// Returns the user's home directory, if known.
    pub fn home_dir() -> Option<PathBuf> {
        dirs::home_dir()
    }

    /// Returns the Quill home directory.
    pub fn quill_home() -> PathBuf {
        if let Ok(home) = std::env::var("QUILL_HOME") {
            return PathBuf::from(home);
        }

        home_dir().map_or_else(
            || PathBuf::from(".quill"),
            |h| h.join(".config").join("quill"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        quill_home().join("config.toml")
    }

    /// Returns the path to the persisted login session.
    pub fn session_path() -> PathBuf {
        quill_home().join("session.json")
    }

    /// Returns the path to the persisted store snapshot.
    pub fn state_path() -> PathBuf {
        quill_home().join("state.json")
    }

    /// Returns the log directory.
    pub fn logs_dir() -> PathBuf {
        quill_home().join("logs")
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Static headers attached to every request.
    pub headers: BTreeMap<String, String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("ngrok-skip-browser-warning".to_string(), "1".to_string());
        Self { headers }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive (env-filter syntax).
    pub level: String,
    /// Whether CLI commands also log to the log file.
    pub file: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: true,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the blog backend
    pub api_url: String,

    /// Request timeout in seconds (0 disables)
    pub request_timeout_secs: u64,

    /// Posts per page for paginated listings
    pub page_size: u64,

    /// Limit used when fetching the full post list
    pub all_posts_limit: u64,

    /// Interface language
    pub language: Language,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    const DEFAULT_API_URL: &str = "http://localhost:5000";
    const DEFAULT_TIMEOUT_SECS: u64 = 30;
    const DEFAULT_PAGE_SIZE: u64 = 10;
    const DEFAULT_ALL_POSTS_LIMIT: u64 = 100;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Returns the backend URL with precedence: env > config > default.
    pub fn effective_api_url(&self) -> Result<String> {
        let from_env = std::env::var(API_URL_ENV)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let configured = Some(self.api_url.trim().to_string()).filter(|v| !v.is_empty());

        let url = from_env
            .or(configured)
            .unwrap_or_else(|| Self::DEFAULT_API_URL.to_string());
        url::Url::parse(&url).with_context(|| format!("Invalid API URL: {url}"))?;
        Ok(url.trim_end_matches('/').to_string())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.request_timeout_secs))
        }
    }

    /// Saves only the language field to the config file.
    ///
    /// Preserves existing fields and comments using toml_edit.
    pub fn save_language(language: Language) -> Result<()> {
        Self::save_language_to(&paths::config_path(), language)
    }

    /// Saves only the language field to a specific config file path.
    ///
    /// Creates the file with the default template if it doesn't exist.
    pub fn save_language_to(path: &Path, language: Language) -> Result<()> {
        use toml_edit::{DocumentMut, value};

        let contents = if path.exists() {
            let user_config = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            merge_with_template(&user_config)?
        } else {
            default_config_template().to_string()
        };

        let mut doc: DocumentMut = contents
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        doc["language"] = value(language.code());

        Self::write_config(path, &doc.to_string())
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Generates a fresh config TOML from Rust defaults, keeping the
    /// template's comments and layout.
    pub fn generate() -> Result<String> {
        use toml_edit::DocumentMut;

        let generated_toml = toml::to_string(&Config::default())
            .context("Failed to serialize default config to TOML")?;

        let mut doc: DocumentMut = default_config_template()
            .parse()
            .context("Failed to parse default config template")?;
        let generated_doc: DocumentMut = generated_toml
            .parse()
            .context("Failed to parse generated config")?;

        merge_items(doc.as_table_mut(), generated_doc.as_table());

        Ok(doc.to_string())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: Self::DEFAULT_API_URL.to_string(),
            request_timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
            page_size: Self::DEFAULT_PAGE_SIZE,
            all_posts_limit: Self::DEFAULT_ALL_POSTS_LIMIT,
            language: Language::default(),
            http: HttpConfig::default(),
            log: LogConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.api_url, "http://localhost:5000");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.language, Language::En);
    }

    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(
            &config_path,
            "api_url = \"https://blog.example.com\"\n[log]\nlevel = \"debug\"\n",
        )
        .unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.api_url, "https://blog.example.com");
        assert_eq!(config.all_posts_limit, 100);
        assert_eq!(config.log.level, "debug");
        assert!(config.log.file);
        assert_eq!(
            config.http.headers.get("ngrok-skip-browser-warning"),
            Some(&"1".to_string())
        );
    }

    #[test]
    fn test_init_creates_config_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("api_url = \"http://localhost:5000\""));
        assert!(contents.contains("# Interface language"));

        let parsed = Config::load_from(&config_path).unwrap();
        assert_eq!(parsed.request_timeout_secs, 30);
    }

    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "").unwrap();

        assert!(Config::init(&config_path).is_err());
    }

    #[test]
    fn test_save_language_preserves_user_values() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "page_size = 25\n").unwrap();

        Config::save_language_to(&config_path, Language::It).unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.language, Language::It);
        assert_eq!(config.page_size, 25);
        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("# Quill configuration"));
    }

    #[test]
    fn test_generate_round_trips_defaults() {
        let generated = Config::generate().unwrap();
        let config: Config = toml::from_str(&generated).unwrap();
        assert_eq!(config.api_url, "http://localhost:5000");
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_timeout_zero_disables() {
        let config = Config {
            request_timeout_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.request_timeout(), None);
        assert_eq!(
            Config::default().request_timeout(),
            Some(Duration::from_secs(30))
        );
    }
}
