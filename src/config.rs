use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

const APP_DIR_NAME: &str = "zdraft";
const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_COMPLETION_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub fn config_directory() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| {
            AppError::Configuration("unable to locate a config directory".to_string())
        })
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

/// Settings persisted in the local config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredConfig {
    pub helpdesk_subdomain: Option<String>,
    pub helpdesk_email: Option<String>,
    pub helpdesk_token: Option<String>,
    pub helpdesk_base_url: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_model: Option<String>,
    pub completion_endpoint: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str::<Self>(&contents)
                .map_err(|err| AppError::Configuration(format!("invalid config file: {err}"))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(path, data)?;
        Ok(())
    }
}

/// Helpdesk account details. Any field may be missing until a fetch needs it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Credentials {
    pub subdomain: Option<String>,
    pub email: Option<String>,
    pub api_token: Option<String>,
}

/// Which remote services a command is going to call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Needs {
    pub helpdesk: bool,
    pub completion: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: Credentials,
    pub helpdesk_base_url: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub completion_endpoint: String,
    pub request_timeout: Duration,
    pub page_url: Option<String>,
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        let stored = StoredConfig::load()?;
        Ok(Self::from_sources(stored, |key| env::var(key).ok()))
    }

    /// Merges stored settings with overrides looked up by `var`.
    pub fn from_sources(stored: StoredConfig, var: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| non_empty(var(key));

        let request_timeout_secs = lookup("ZDRAFT_REQUEST_TIMEOUT_SECS")
            .and_then(|raw| raw.parse::<u64>().ok())
            .or(stored.request_timeout_secs)
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            credentials: Credentials {
                subdomain: lookup("ZDRAFT_HELPDESK_SUBDOMAIN")
                    .or_else(|| non_empty(stored.helpdesk_subdomain)),
                email: lookup("ZDRAFT_HELPDESK_EMAIL")
                    .or_else(|| non_empty(stored.helpdesk_email)),
                api_token: lookup("ZDRAFT_HELPDESK_TOKEN")
                    .or_else(|| non_empty(stored.helpdesk_token)),
            },
            helpdesk_base_url: lookup("ZDRAFT_HELPDESK_BASE_URL")
                .or_else(|| non_empty(stored.helpdesk_base_url)),
            openai_api_key: lookup("ZDRAFT_OPENAI_API_KEY")
                .or_else(|| non_empty(stored.openai_api_key))
                .or_else(|| lookup("OPENAI_API_KEY")),
            openai_model: lookup("ZDRAFT_OPENAI_MODEL")
                .or_else(|| non_empty(stored.openai_model))
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            completion_endpoint: lookup("ZDRAFT_COMPLETION_ENDPOINT")
                .or_else(|| non_empty(stored.completion_endpoint))
                .unwrap_or_else(|| DEFAULT_COMPLETION_ENDPOINT.to_string()),
            request_timeout: Duration::from_secs(request_timeout_secs),
            page_url: lookup("ZDRAFT_PAGE_URL"),
        }
    }
}

impl AppConfig {
    /// Settings required by `needs` that are still unset.
    pub fn missing_settings(&self, needs: Needs) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if needs.helpdesk {
            let credentials = &self.credentials;
            if credentials.subdomain.is_none() {
                missing.push("helpdesk subdomain");
            }
            if credentials.email.is_none() {
                missing.push("helpdesk email");
            }
            if credentials.api_token.is_none() {
                missing.push("helpdesk API token");
            }
        }
        if needs.completion && self.openai_api_key.is_none() {
            missing.push("OpenAI API key");
        }
        missing
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn applies_defaults_when_nothing_is_set() {
        let config = AppConfig::from_sources(StoredConfig::default(), env_of(&[]));
        assert_eq!(config.credentials, Credentials::default());
        assert_eq!(config.openai_api_key, None);
        assert_eq!(config.openai_model, DEFAULT_MODEL);
        assert_eq!(config.completion_endpoint, DEFAULT_COMPLETION_ENDPOINT);
        assert_eq!(config.request_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.page_url, None);
    }

    #[test]
    fn environment_overrides_stored_values() {
        let stored = StoredConfig {
            helpdesk_subdomain: Some("stored".into()),
            helpdesk_email: Some("agent@acme.test".into()),
            openai_model: Some("stored-model".into()),
            request_timeout_secs: Some(5),
            ..StoredConfig::default()
        };
        let config = AppConfig::from_sources(
            stored,
            env_of(&[
                ("ZDRAFT_HELPDESK_SUBDOMAIN", "acme"),
                ("ZDRAFT_OPENAI_MODEL", ""),
                ("ZDRAFT_REQUEST_TIMEOUT_SECS", "12"),
                ("OPENAI_API_KEY", "sk-fallback"),
            ]),
        );
        assert_eq!(config.credentials.subdomain.as_deref(), Some("acme"));
        assert_eq!(config.credentials.email.as_deref(), Some("agent@acme.test"));
        assert_eq!(config.openai_model, "stored-model");
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-fallback"));
        assert_eq!(config.request_timeout, Duration::from_secs(12));
    }

    #[test]
    fn reports_only_settings_the_command_needs() {
        let stored = StoredConfig {
            helpdesk_subdomain: Some("acme".into()),
            ..StoredConfig::default()
        };
        let config = AppConfig::from_sources(stored, env_of(&[]));

        assert_eq!(
            config.missing_settings(Needs {
                helpdesk: true,
                completion: false,
            }),
            vec!["helpdesk email", "helpdesk API token"]
        );
        assert_eq!(
            config.missing_settings(Needs {
                helpdesk: false,
                completion: true,
            }),
            vec!["OpenAI API key"]
        );
        assert!(config.missing_settings(Needs::default()).is_empty());
    }

    #[test]
    fn blank_stored_values_count_as_missing() {
        let stored = StoredConfig {
            helpdesk_token: Some("   ".into()),
            openai_api_key: Some(String::new()),
            ..StoredConfig::default()
        };
        let config = AppConfig::from_sources(stored, env_of(&[]));
        assert_eq!(config.credentials.api_token, None);
        assert_eq!(config.openai_api_key, None);
    }

    #[test]
    fn stored_config_round_trips_through_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        assert_eq!(
            StoredConfig::load_from(&path).expect("missing file"),
            StoredConfig::default()
        );

        let cfg = StoredConfig {
            helpdesk_subdomain: Some("acme".into()),
            openai_api_key: Some("sk-test".into()),
            request_timeout_secs: Some(10),
            ..StoredConfig::default()
        };
        cfg.save_to(&path).expect("save");
        assert_eq!(StoredConfig::load_from(&path).expect("load"), cfg);
    }

    #[test]
    fn rejects_malformed_config_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{not json").expect("write");
        assert!(matches!(
            StoredConfig::load_from(&path),
            Err(AppError::Configuration(_))
        ));
    }
}
