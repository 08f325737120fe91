use std::io;
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use anyhow::{Context, Result};
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
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 3000, worker_threads: Some(4) }
    }
}

/// Where the two backing files live.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Anchor for a relative `data_dir`; the executable's directory when unset.
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_dictionary_file")]
    pub dictionary_file: String,
    #[serde(default = "default_synonyms_file")]
    pub synonyms_file: String,
}

fn default_data_dir() -> PathBuf { PathBuf::from("dicionarios") }
fn default_dictionary_file() -> String { "dict_sinonimo.json".into() }
fn default_synonyms_file() -> String { "dict.json".into() }

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            data_dir: default_data_dir(),
            dictionary_file: default_dictionary_file(),
            synonyms_file: default_synonyms_file(),
        }
    }
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<io::Error>()
        .is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
}

/// Directory holding the running executable.
pub fn install_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

impl AppConfig {
    /// `CONFIG_PATH` (default `config.toml`); see [`AppConfig::load_or_env_from`].
    pub fn load_or_env() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_or_env_from(&path)
    }

    /// Config file first. Only a missing file falls back to defaults
    /// overridden by `SERVER_HOST`, `SERVER_PORT` and `DICTIONARY_DATA_DIR`;
    /// an unreadable or malformed file is an error.
    pub fn load_or_env_from(path: &str) -> Result<Self> {
        let mut cfg = match load_from_file(path) {
            Ok(cfg) => cfg,
            Err(e) if is_not_found(&e) => Self::from_env(),
            Err(e) => return Err(e.context(format!("invalid config file {path}"))),
        };
        cfg.normalize_and_validate()
            .with_context(|| format!("invalid configuration from {path}"))?;
        Ok(cfg)
    }

    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            cfg.server.worker_threads = Some(w);
        }
        if let Ok(dir) = std::env::var("DICTIONARY_DATA_DIR") {
            cfg.storage.data_dir = PathBuf::from(dir);
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
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.dictionary_file.trim().is_empty() {
            return Err(anyhow!("storage.dictionary_file is empty"));
        }
        if self.synonyms_file.trim().is_empty() {
            return Err(anyhow!("storage.synonyms_file is empty"));
        }
        if self.dictionary_file == self.synonyms_file {
            return Err(anyhow!("storage.dictionary_file and storage.synonyms_file must differ"));
        }
        Ok(())
    }

    /// Resolved data directory. A relative `data_dir` hangs off `base_dir`,
    /// or off the executable's directory, never off the working directory.
    pub fn data_path(&self) -> PathBuf {
        if self.data_dir.is_absolute() {
            return self.data_dir.clone();
        }
        match self.base_dir.clone().or_else(install_dir) {
            Some(base) => base.join(&self.data_dir),
            None => self.data_dir.clone(),
        }
    }

    pub fn dictionary_path(&self) -> PathBuf {
        self.data_path().join(&self.dictionary_file)
    }

    pub fn synonyms_path(&self) -> PathBuf {
        self.data_path().join(&self.synonyms_file)
    }
}
