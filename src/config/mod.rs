use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::{
    currency::LocaleConfig,
    errors::{ClientError, Result},
    utils::persistence::{tmp_path, write_atomic, LocalStore},
};

const DEFAULT_DIR_NAME: &str = ".exotrack";
const CONFIG_FILE: &str = "config.json";

pub const HOME_ENV: &str = "EXOTRACK_HOME";
pub const API_URL_ENV: &str = "EXOTRACK_API_URL";
pub const LANG_ENV: &str = "EXOTRACK_LANG";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub language: String,
    pub default_currency: String,
    pub default_country_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    pub locale: LocaleConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".into(),
            language: "en".into(),
            default_currency: "USD".into(),
            default_country_code: "+243".into(),
            request_timeout_secs: None,
            locale: LocaleConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Applies `EXOTRACK_API_URL` / `EXOTRACK_LANG` on top of the file values.
    pub fn apply_env_overrides(mut self) -> Result<Self> {
        if let Ok(url) = env::var(API_URL_ENV) {
            let trimmed = url.trim();
            if trimmed.is_empty() {
                return Err(ClientError::Config(format!("{API_URL_ENV} is empty")));
            }
            self.api_base_url = trimmed.trim_end_matches('/').to_string();
        }
        if let Ok(lang) = env::var(LANG_ENV) {
            if !lang.trim().is_empty() {
                self.language = lang.trim().to_string();
            }
        }
        Ok(self)
    }
}

/// Returns the application data directory, defaulting to `~/.exotrack`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
            base,
        })
    }

    /// Reads the config file (defaults when absent) and applies env overrides.
    pub fn load(&self) -> Result<ClientConfig> {
        let config = if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data)
                .map_err(|err| ClientError::Config(format!("{}: {err}", self.path.display())))?
        } else {
            ClientConfig::default()
        };
        config.apply_env_overrides()
    }

    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Local persisted state lives next to the config file.
    pub fn local_store(&self) -> LocalStore {
        LocalStore::in_dir(&self.base)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_defaults_when_file_missing() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.default_currency, "USD");
        assert_eq!(config.request_timeout_secs, None);
    }

    #[test]
    fn save_then_load_keeps_values() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let config = ClientConfig {
            language: "fr".into(),
            request_timeout_secs: Some(30),
            ..ClientConfig::default()
        };
        manager.save(&config).unwrap();
        let loaded: ClientConfig =
            serde_json::from_str(&fs::read_to_string(manager.path()).unwrap()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{ "language": "fr" }"#).unwrap();
        let loaded: ClientConfig =
            serde_json::from_str(&fs::read_to_string(manager.path()).unwrap()).unwrap();
        assert_eq!(loaded.language, "fr");
        assert_eq!(loaded.default_country_code, "+243");
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        fs::write(manager.path(), "{ not json").unwrap();
        assert!(matches!(manager.load(), Err(ClientError::Config(_))));
    }
}
