//! # ShopAssist Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads, merges and validates ShopAssist configuration. Settings
//! come from several layers, later layers overriding earlier ones:
//!
//! 1. Default values defined in the code
//! 2. A TOML file: `--config <path>` if given, otherwise the nearest
//!    `.shopassist.toml` in the current directory or its ancestors, otherwise the
//!    user file `<config dir>/shopassist/config.toml`
//! 3. Environment variables (a `.env` file is loaded into the environment by
//!    `main.rs` before this module runs)
//! 4. Command-line flags, applied by the individual command handlers
//!
//! ## Examples
//!
//! ```toml
//! [database]
//! host = "127.0.0.1"
//! user = "shop"
//! name = "ecommerce"
//!
//! [llm]
//! model = "llama-3.1-8b-instant"
//!
//! [storefront]
//! base_url = "https://shop.example.com/"
//! ```
//!
//! ```rust
//! let cfg = config::load_config(None)?;
//! cfg.require_database()?;
//! println!("Catalog database: {}", cfg.database.name.as_deref().unwrap_or("-"));
//! ```
//!
use crate::core::error::{Result, ShopError};
use anyhow::Context;
use directories::ProjectDirs;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Name of the project-local configuration file.
pub const PROJECT_CONFIG_FILENAME: &str = ".shopassist.toml";

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub storefront: StorefrontConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Connection settings for the MySQL catalog.
#[derive(Deserialize, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub host: Option<String>,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Database (schema) name, e.g. `ecommerce`.
    pub name: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

/// Settings for the OpenAI-compatible completion provider.
#[derive(Deserialize, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct LlmConfig {
    /// Base URL of the API, without the `/chat/completions` suffix.
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    /// Upper bound on completions in flight for one product search.
    pub max_concurrency: usize,
}

/// Catalog lookup behavior.
#[derive(Deserialize, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Hide the root category (id 1) from category listings.
    pub exclude_root_category: bool,
}

/// Storefront settings used to build product links.
#[derive(Deserialize, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct StorefrontConfig {
    pub base_url: String,
}

/// Listener settings for `shopassist serve`.
#[derive(Deserialize, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub enable_cors: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: 3306,
            user: None,
            password: None,
            name: None,
            max_connections: 5,
            acquire_timeout_secs: 5,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            api_key: None,
            model: "llama-3.1-8b-instant".to_string(),
            temperature: 0.7,
            max_tokens: 120,
            timeout_secs: 30,
            max_concurrency: 4,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            exclude_root_category: true,
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            base_url: "http://kea.mywire.org:5500/".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 5000,
            enable_cors: true,
        }
    }
}

impl Config {
    /// Fails unless the database host, user and name are all set.
    pub fn require_database(&self) -> std::result::Result<(), ShopError> {
        let db = &self.database;
        let missing: Vec<&str> = [
            ("host (MYSQL_HOST)", &db.host),
            ("user (MYSQL_USER)", &db.user),
            ("name (MYSQL_DATABASE)", &db.name),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
        .map(|(label, _)| label)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ShopError::Config(format!(
                "database {} not set",
                missing.join(", ")
            )))
        }
    }

    /// Replaces the storefront base URL with a command-line value, applying
    /// the same check as the file and environment layers.
    pub fn override_storefront_base_url(
        &mut self,
        base_url: String,
    ) -> std::result::Result<(), ShopError> {
        check_storefront_base_url(&base_url)?;
        self.storefront.base_url = base_url;
        Ok(())
    }

    /// Fails when no API key is configured for a non-local LLM endpoint.
    pub fn require_llm(&self) -> std::result::Result<(), ShopError> {
        let has_key = self
            .llm
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty());
        if has_key || is_local_endpoint(&self.llm.base_url) {
            Ok(())
        } else {
            Err(ShopError::Config(format!(
                "LLM API key (LLM_API_KEY or GROQ_API_KEY) is required for {}",
                self.llm.base_url
            )))
        }
    }
}

/// Loads the effective configuration: file layer, then environment, then validation.
pub fn load_config(explicit_path: Option<&Path>) -> Result<Config> {
    let mut config = load_file_layer(explicit_path)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", redacted(&config));
    Ok(config)
}

fn load_file_layer(explicit_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit_path {
        let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());
        if !expanded.is_file() {
            return Err(ShopError::Config(format!(
                "config file '{}' does not exist",
                expanded.display()
            ))
            .into());
        }
        info!("Loading configuration from: {}", expanded.display());
        return load_config_from_path(&expanded);
    }

    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_path.display()
        );
        return load_config_from_path(&project_path);
    }

    if let Some(user_path) = user_config_path() {
        if user_path.is_file() {
            info!("Loading user configuration from: {}", user_path.display());
            return load_config_from_path(&user_path);
        }
        debug!("User configuration file not found at {}", user_path.display());
    }

    debug!("No configuration file found, using defaults.");
    Ok(Config::default())
}

fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "ShopAssist", "shopassist")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Walks from `start` towards the filesystem root looking for `.shopassist.toml`.
/// The search stops at the first directory containing `.git`.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let candidate = path.join(PROJECT_CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Overlays environment variables on top of `config`.
///
/// `lookup` abstracts `std::env::var` so tests can supply a fixed map.
/// Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(host) = get("MYSQL_HOST") {
        config.database.host = Some(host);
    }
    if let Some(port) = get("MYSQL_PORT") {
        config.database.port = port.trim().parse().map_err(|_| {
            ShopError::Config(format!("MYSQL_PORT '{}' is not a valid port", port))
        })?;
    }
    if let Some(user) = get("MYSQL_USER") {
        config.database.user = Some(user);
    }
    if let Some(password) = get("MYSQL_PASSWORD") {
        config.database.password = Some(password);
    }
    if let Some(name) = get("MYSQL_DATABASE") {
        config.database.name = Some(name);
    }
    if let Some(key) = get("LLM_API_KEY").or_else(|| get("GROQ_API_KEY")) {
        config.llm.api_key = Some(key);
    }
    if let Some(model) = get("LLM_MODEL") {
        config.llm.model = model;
    }
    if let Some(base_url) = get("LLM_BASE_URL") {
        config.llm.base_url = base_url;
    }
    if let Some(base_url) = get("STOREFRONT_BASE_URL") {
        config.storefront.base_url = base_url;
    }
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    if reqwest::Url::parse(&config.llm.base_url).is_err() {
        return Err(ShopError::Config(format!(
            "LLM base URL '{}' is not a valid URL",
            config.llm.base_url
        ))
        .into());
    }
    if !(0.0..=2.0).contains(&config.llm.temperature) {
        return Err(ShopError::Config(format!(
            "LLM temperature {} is outside 0.0..=2.0",
            config.llm.temperature
        ))
        .into());
    }
    if config.llm.max_tokens == 0 {
        return Err(ShopError::Config("LLM max_tokens must be positive".into()).into());
    }
    if config.database.max_connections == 0 {
        return Err(
            ShopError::Config("database max_connections must be positive".into()).into(),
        );
    }
    if config.llm.max_concurrency == 0 {
        return Err(ShopError::Config("LLM max_concurrency must be positive".into()).into());
    }
    check_storefront_base_url(&config.storefront.base_url)?;
    Ok(())
}

fn check_storefront_base_url(base_url: &str) -> std::result::Result<(), ShopError> {
    if base_url.trim().is_empty() {
        return Err(ShopError::Config(
            "storefront base_url must not be empty".into(),
        ));
    }
    Ok(())
}

fn is_local_endpoint(base_url: &str) -> bool {
    reqwest::Url::parse(base_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_owned))
        .is_some_and(|host| matches!(host.as_str(), "localhost" | "127.0.0.1" | "[::1]"))
}

/// Copy of `config` with secrets masked, for debug logging.
fn redacted(config: &Config) -> Config {
    let mut copy = config.clone();
    if copy.database.password.is_some() {
        copy.database.password = Some("***".into());
    }
    if copy.llm.api_key.is_some() {
        copy.llm.api_key = Some("***".into());
    }
    copy
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_deserialize_basic_toml() {
        let toml_content = r#"
            [database]
            host = "db.internal"
            user = "shop"
            name = "ecommerce"

            [llm]
            model = "mistral"
            temperature = 0.2

            [storefront]
            base_url = "https://shop.example/"
        "#;

        let config: Config = toml::from_str(toml_content).expect("Failed to parse TOML");

        assert_eq!(config.database.host.as_deref(), Some("db.internal"));
        assert_eq!(config.database.port, 3306); // Default
        assert_eq!(config.llm.model, "mistral");
        assert_eq!(config.llm.max_tokens, 120); // Default
        assert_eq!(config.llm.max_concurrency, 4); // Default
        assert!(config.catalog.exclude_root_category); // Default
        assert_eq!(config.storefront.base_url, "https://shop.example/");
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str("[database]\nhots = \"x\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config: Config = toml::from_str(
            r#"
            [database]
            host = "from-file"
            user = "file-user"
            "#,
        )
        .unwrap();

        apply_env_overrides(
            &mut config,
            env_from(&[
                ("MYSQL_HOST", "from-env"),
                ("MYSQL_PORT", "3307"),
                ("MYSQL_DATABASE", "ecommerce"),
                ("GROQ_API_KEY", "gsk-test"),
                ("MYSQL_USER", ""), // empty values are ignored
            ]),
        )
        .unwrap();

        assert_eq!(config.database.host.as_deref(), Some("from-env"));
        assert_eq!(config.database.port, 3307);
        assert_eq!(config.database.user.as_deref(), Some("file-user"));
        assert_eq!(config.database.name.as_deref(), Some("ecommerce"));
        assert_eq!(config.llm.api_key.as_deref(), Some("gsk-test"));
    }

    #[test]
    fn test_llm_api_key_prefers_generic_variable() {
        let mut config = Config::default();
        apply_env_overrides(
            &mut config,
            env_from(&[("LLM_API_KEY", "generic"), ("GROQ_API_KEY", "groq")]),
        )
        .unwrap();
        assert_eq!(config.llm.api_key.as_deref(), Some("generic"));
    }

    #[test]
    fn test_invalid_port_env_is_config_error() {
        let mut config = Config::default();
        let err = apply_env_overrides(&mut config, env_from(&[("MYSQL_PORT", "abc")]))
            .unwrap_err();
        assert!(err.to_string().contains("MYSQL_PORT 'abc' is not a valid port"));
    }

    #[test]
    fn test_require_database_lists_missing_fields() {
        let mut config = Config::default();
        config.database.host = Some("localhost".into());

        let err = config.require_database().unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Configuration error:"));
        assert!(message.contains("user (MYSQL_USER)"));
        assert!(message.contains("name (MYSQL_DATABASE)"));
        assert!(!message.contains("host"));
    }

    #[test]
    fn test_require_llm_allows_local_endpoint_without_key() {
        let mut config = Config::default();
        assert!(config.require_llm().is_err());

        config.llm.base_url = "http://localhost:11434/v1".into();
        assert!(config.require_llm().is_ok());

        config.llm.base_url = "https://api.groq.com/openai/v1".into();
        config.llm.api_key = Some("gsk-test".into());
        assert!(config.require_llm().is_ok());
    }

    #[test]
    fn test_validate_config_rejects_bad_values() {
        let mut config = Config::default();
        assert!(validate_config(&config).is_ok());

        config.llm.temperature = 3.5;
        assert!(validate_config(&config)
            .unwrap_err()
            .to_string()
            .contains("temperature"));

        let mut config = Config::default();
        config.llm.base_url = "not a url".into();
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.llm.max_concurrency = 0;
        assert!(validate_config(&config)
            .unwrap_err()
            .to_string()
            .contains("max_concurrency"));
    }

    #[test]
    fn test_storefront_override_rejects_blank_url() {
        let mut config = Config::default();
        let err = config
            .override_storefront_base_url("   ".into())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: storefront base_url must not be empty"
        );
        assert_eq!(config.storefront.base_url, "http://kea.mywire.org:5500/");

        config
            .override_storefront_base_url("https://shop.example/".into())
            .unwrap();
        assert_eq!(config.storefront.base_url, "https://shop.example/");
    }

    #[test]
    fn test_find_project_config_in_ancestor() {
        let temp_dir = tempdir().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp_dir.path().join(PROJECT_CONFIG_FILENAME), "").unwrap();

        let found = find_project_config_path(&nested);
        assert_eq!(found, Some(temp_dir.path().join(PROJECT_CONFIG_FILENAME)));
    }

    #[test]
    fn test_find_project_config_stops_at_git_root() {
        let temp_dir = tempdir().unwrap();
        let repo = temp_dir.path().join("repo");
        fs::create_dir_all(repo.join(".git")).unwrap();
        fs::write(temp_dir.path().join(PROJECT_CONFIG_FILENAME), "").unwrap();

        assert_eq!(find_project_config_path(&repo), None);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("nope.toml");
        let err = load_file_layer(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_explicit_file_is_loaded() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("custom.toml");
        fs::write(&path, "[server]\nport = 8088\nenable_cors = false\n").unwrap();

        let config = load_file_layer(Some(&path)).unwrap();
        assert_eq!(config.server.port, 8088);
        assert!(!config.server.enable_cors);
    }

    #[test]
    fn test_redacted_masks_secrets() {
        let mut config = Config::default();
        config.database.password = Some("hunter2".into());
        config.llm.api_key = Some("gsk-secret".into());

        let shown = format!("{:?}", redacted(&config));
        assert!(!shown.contains("hunter2"));
        assert!(!shown.contains("gsk-secret"));
    }
}
