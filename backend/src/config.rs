//! Process configuration.
//!
//! The configuration lives in a TOML file (`config_main.toml` unless the
//! `INVOICE_CONFIG` environment variable names another path). When the file
//! does not exist, a default one is written first so operators have something
//! to edit; the freshly generated auth secret is random.

use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

pub const DEFAULT_CONFIG_PATH: &str = "config_main.toml";
pub const CONFIG_PATH_ENV: &str = "INVOICE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config file '{path}' is not valid TOML: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to render default config: {0}")]
    Render(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub microservices: MicroservicesConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Where the two conversion services listen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MicroservicesConfig {
    pub pdf_to_txt_host: String,
    pub pdf_to_txt_port: u16,
    pub txt_to_json_host: String,
    pub txt_to_json_port: u16,
}

impl MicroservicesConfig {
    pub fn pdf_to_txt_url(&self) -> String {
        format!("http://{}:{}", self.pdf_to_txt_host, self.pdf_to_txt_port)
    }

    pub fn txt_to_json_url(&self) -> String {
        format!("http://{}:{}", self.txt_to_json_host, self.txt_to_json_port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON array holding every record.
    pub data_file: PathBuf,
    /// Directory for uploaded and renamed PDFs.
    pub files_dir: PathBuf,
    /// Document served when no stored PDF matches a lookup.
    pub default_pdf: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared HMAC secret for bearer tokens.
    pub secret: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            microservices: MicroservicesConfig {
                pdf_to_txt_host: "pdfToTxt".to_string(),
                pdf_to_txt_port: 5001,
                txt_to_json_host: "txtToJson".to_string(),
                txt_to_json_port: 5000,
            },
            storage: StorageConfig {
                data_file: PathBuf::from("forms.json"),
                files_dir: PathBuf::from("files"),
                default_pdf: PathBuf::from("files/report.pdf"),
            },
            auth: AuthConfig {
                secret: Uuid::new_v4().simple().to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Resolves the config path from the environment, falling back to
    /// [`DEFAULT_CONFIG_PATH`].
    pub fn path_from_env() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Loads the config at `path`, writing a default file there first if none exists.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("Generating default config file at {}", path.display());
            AppConfig::default().save(path)?;
        }
        let config = Self::load(path)?;
        info!("Config file {} loaded", path.display());
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
