use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

pub const CONFIG_PATH_ENV: &str = "ADMIN_CONSOLE_CONFIG";
pub const DATA_SOURCE_ENV: &str = "ADMIN_CONSOLE_DATA_SOURCE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    #[default]
    Mock,
    Http,
    Sqlite,
}

impl DataSourceKind {
    pub const ALL: [DataSourceKind; 3] = [
        DataSourceKind::Mock,
        DataSourceKind::Http,
        DataSourceKind::Sqlite,
    ];

    /// Stable form accepted by `FromStr` and the config file.
    pub fn key(self) -> &'static str {
        match self {
            DataSourceKind::Mock => "mock",
            DataSourceKind::Http => "http",
            DataSourceKind::Sqlite => "sqlite",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DataSourceKind::Mock => "Mock data",
            DataSourceKind::Http => "REST API",
            DataSourceKind::Sqlite => "Local SQLite",
        }
    }
}

impl FromStr for DataSourceKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(DataSourceKind::Mock),
            "http" => Ok(DataSourceKind::Http),
            "sqlite" => Ok(DataSourceKind::Sqlite),
            other => bail!("unknown data source: {other} (expected mock, http or sqlite)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_source: DataSourceKind,
    pub api_base_url: String,
    pub bearer_token: Option<String>,
    pub db_path: Option<PathBuf>,
    pub page_size: u32,
    pub page_size_choices: Vec<u32>,
    pub filter_debounce_ms: u64,
    pub mock_latency_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_source: DataSourceKind::Mock,
            api_base_url: "http://localhost:8080/api".to_string(),
            bearer_token: None,
            db_path: None,
            page_size: 10,
            page_size_choices: vec![5, 10, 20, 50],
            filter_debounce_ms: 300,
            mock_latency_ms: 300,
            request_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Reads the file named by `ADMIN_CONSOLE_CONFIG`, else `config.toml` in
    /// the per-user config directory. A missing file means defaults.
    pub fn load() -> Result<Self> {
        let path = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Some(PathBuf::from(path)),
            None => default_config_path().ok(),
        };
        let data_source = std::env::var(DATA_SOURCE_ENV).ok();
        Self::load_from(path.as_deref(), data_source.as_deref())
    }

    pub fn load_from(path: Option<&Path>, data_source_override: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(path)?,
            _ => Self::default(),
        };
        if let Some(kind) = data_source_override.filter(|kind| !kind.trim().is_empty()) {
            config.data_source = kind.parse()?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(text)?;
        Ok(config)
    }

    /// Same settings against another data source, validated.
    pub fn with_data_source(&self, kind: DataSourceKind) -> Result<Self> {
        let config = Self {
            data_source: kind,
            ..self.clone()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            bail!("page_size must be greater than zero");
        }
        if self.page_size_choices.iter().any(|size| *size == 0) {
            bail!("page_size_choices must all be greater than zero");
        }
        if self.data_source == DataSourceKind::Http && self.api_base_url.trim().is_empty() {
            bail!("api_base_url is required for the http data source");
        }
        Ok(())
    }

    /// Page size choices offered by the table, always including `page_size`.
    pub fn page_size_options(&self) -> Vec<u32> {
        let mut choices = self.page_size_choices.clone();
        choices.push(self.page_size);
        choices.sort_unstable();
        choices.dedup();
        choices
    }

    pub fn filter_debounce(&self) -> Duration {
        Duration::from_millis(self.filter_debounce_ms)
    }

    pub fn mock_latency(&self) -> Duration {
        Duration::from_millis(self.mock_latency_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn resolved_db_path(&self) -> Result<PathBuf> {
        match &self.db_path {
            Some(path) => Ok(path.clone()),
            None => default_db_path(),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "hellhbbd", "admin-console")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))
}

pub fn default_db_path() -> Result<PathBuf> {
    Ok(project_dirs()?.data_local_dir().join("records.sqlite"))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

pub fn default_data_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_local_dir().to_path_buf())
}
