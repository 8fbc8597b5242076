use std::path::PathBuf;

use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// `compact` or `json`
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            worker_threads: Some(4),
            log_format: default_log_format(),
        }
    }
}

/// What to do when a keyword names a campaign that does not exist.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrphanPolicy {
    #[default]
    Reject,
    Tolerate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_campaigns_file")]
    pub campaigns_file: String,
    #[serde(default = "default_keywords_file")]
    pub keywords_file: String,
    #[serde(default = "default_sequences_file")]
    pub sequences_file: String,
    #[serde(default)]
    pub orphan_policy: OrphanPolicy,
    #[serde(default)]
    pub reconcile_on_startup: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            campaigns_file: default_campaigns_file(),
            keywords_file: default_keywords_file(),
            sequences_file: default_sequences_file(),
            orphan_policy: OrphanPolicy::default(),
            reconcile_on_startup: false,
        }
    }
}

fn default_log_format() -> String { "compact".into() }
fn default_data_dir() -> String { "data".into() }
fn default_campaigns_file() -> String { "campaigns.json".into() }
fn default_keywords_file() -> String { "keywords.json".into() }
fn default_sequences_file() -> String { "sequences.json".into() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Config used when no file is present: defaults overridden by env vars.
    pub fn from_env() -> Self {
        let mut cfg = AppConfig::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        cfg.server.worker_threads = std::env::var("TOKIO_WORKER_THREADS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .or(cfg.server.worker_threads);
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            cfg.server.log_format = format;
        }
        if let Ok(dir) = std::env::var("DATA_DIR") {
            cfg.storage.data_dir = dir;
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        let format = self.log_format.to_ascii_lowercase();
        if format != "compact" && format != "json" {
            return Err(anyhow!("server.log_format must be `compact` or `json`, got `{}`", self.log_format));
        }
        self.log_format = format;
        Ok(())
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.data_dir.trim().is_empty() {
            return Err(anyhow!("storage.data_dir is empty"));
        }
        let files = [&self.campaigns_file, &self.keywords_file, &self.sequences_file];
        if files.iter().any(|f| f.trim().is_empty()) {
            return Err(anyhow!("storage file names must not be empty"));
        }
        if self.campaigns_file == self.keywords_file
            || self.campaigns_file == self.sequences_file
            || self.keywords_file == self.sequences_file
        {
            return Err(anyhow!("storage files must be distinct"));
        }
        Ok(())
    }

    pub fn campaigns_path(&self) -> PathBuf { PathBuf::from(&self.data_dir).join(&self.campaigns_file) }
    pub fn keywords_path(&self) -> PathBuf { PathBuf::from(&self.data_dir).join(&self.keywords_file) }
    pub fn sequences_path(&self) -> PathBuf { PathBuf::from(&self.data_dir).join(&self.sequences_file) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_toml_with_defaults() -> Result<()> {
        let mut cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = ""
            port = 9000

            [storage]
            data_dir = "/var/lib/campaigns"
            orphan_policy = "tolerate"
            "#,
        )?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.server.log_format, "compact");
        assert_eq!(cfg.storage.orphan_policy, OrphanPolicy::Tolerate);
        assert_eq!(cfg.storage.campaigns_path(), PathBuf::from("/var/lib/campaigns/campaigns.json"));
        assert!(!cfg.storage.reconcile_on_startup);
        Ok(())
    }

    #[test]
    fn defaults_to_reject_policy() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.storage.orphan_policy, OrphanPolicy::Reject);
        assert_eq!(cfg.storage.keywords_path(), PathBuf::from("data/keywords.json"));
    }

    #[test]
    fn rejects_zero_port_and_duplicate_files() {
        let mut cfg = AppConfig::default();
        cfg.server.port = 0;
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = AppConfig::default();
        cfg.storage.keywords_file = cfg.storage.campaigns_file.clone();
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn rejects_unknown_log_format() {
        let mut cfg = AppConfig::default();
        cfg.server.log_format = "xml".into();
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn load_from_file_reads_toml() -> Result<()> {
        let path = std::env::temp_dir().join(format!("configs_{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[server]\nhost = \"0.0.0.0\"\nport = 8181\n")?;
        let cfg = load_from_file(&path.to_string_lossy())?;
        assert_eq!(cfg.server.port, 8181);
        assert_eq!(cfg.storage.data_dir, "data");
        let _ = std::fs::remove_file(&path);
        Ok(())
    }
}
