use crate::error::{GeonotesError, Result};
use crate::security::HasherConfig;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";

/// Application settings, stored as `config.json` in a config directory.
///
/// Every field has a default, so a partial file (or none at all) is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default = "default_project_name")]
    pub project_name: String,

    /// Public base URL, used to build links in outgoing mail
    #[serde(default = "default_project_url")]
    pub project_url: String,

    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    #[serde(default = "default_project_name")]
    pub emails_from_name: String,

    #[serde(default = "default_emails_from_email")]
    pub emails_from_email: String,

    /// One of trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Where `db.json` lives; the platform data dir when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    #[serde(default)]
    pub hasher: HasherConfig,
}

fn default_project_name() -> String {
    "geonotes".to_string()
}

fn default_project_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_api_prefix() -> String {
    "/api/v1".to_string()
}

fn default_emails_from_email() -> String {
    "noreply@localhost".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project_name: default_project_name(),
            project_url: default_project_url(),
            api_prefix: default_api_prefix(),
            emails_from_name: default_project_name(),
            emails_from_email: default_emails_from_email(),
            log_level: default_log_level(),
            data_dir: None,
            hasher: HasherConfig::default(),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "geonotes", "geonotes")
        .ok_or_else(|| GeonotesError::Config("could not determine a home directory".to_string()))
}

impl AppConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(GeonotesError::Io)?;
        let config: AppConfig =
            serde_json::from_str(&content).map_err(GeonotesError::Serialization)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(GeonotesError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(GeonotesError::Serialization)?;
        fs::write(config_path, content).map_err(GeonotesError::Io)?;
        Ok(())
    }

    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(project_dirs()?.data_dir().to_path_buf()),
        }
    }

    /// Link mailed to a new user; opening it activates the account.
    pub fn activation_url(&self, username: &str, token: &str) -> String {
        format!(
            "{}{}/user/activate?username={}&token={}",
            self.project_url.trim_end_matches('/'),
            self.api_prefix,
            urlencoding::encode(username),
            urlencoding::encode(token)
        )
    }
}
