use serde::Deserialize;
use std::fs;
use std::path::Path;

const ENV_CONFIG_PATH: &str = "AEGIS_ASSIST_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const DEFAULT_RUNTIME_URL: &str = "http://127.0.0.1:11434";
const DEFAULT_MODEL_NAME: &str = "aegis-report-writer";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Text-generation runtime configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Whether the model adapter should be initialized at all. When false
    /// every assist endpoint serves its static fallback.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Base URL of the local inference runtime
    #[serde(default = "default_runtime_url")]
    pub runtime_url: String,
    /// Name of the pretrained model the runtime should serve
    #[serde(default = "default_model_name")]
    pub model_name: String,
    /// Per-request timeout for generation calls
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_runtime_url() -> String {
    DEFAULT_RUNTIME_URL.to_string()
}

fn default_model_name() -> String {
    DEFAULT_MODEL_NAME.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            runtime_url: default_runtime_url(),
            model_name: default_model_name(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub model: Option<ModelConfig>,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub model: ModelConfig,
    pub port: u16,
    pub host: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            port: 5000,
            host: "127.0.0.1".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    ///
    /// Environment variables take precedence over the config file:
    /// `HOST`, `PORT`, `MODEL_ENABLED`, `MODEL_RUNTIME_URL`, `MODEL_NAME`.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5000);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let config_path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut model = Self::load_config_file(&config_path)
            .and_then(|cf| cf.model)
            .unwrap_or_default();

        if let Some(enabled) = std::env::var("MODEL_ENABLED")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            model.enabled = enabled;
        }
        if let Ok(url) = std::env::var("MODEL_RUNTIME_URL") {
            model.runtime_url = url;
        }
        if let Ok(name) = std::env::var("MODEL_NAME") {
            model.model_name = name;
        }

        Self { model, port, host }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                let contents = contents.trim();
                if contents.is_empty() {
                    tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
                    return Some(ConfigFile::default());
                }

                match serde_yaml::from_str(contents) {
                    Ok(config) => {
                        tracing::info!(path = %path.display(), "Loaded configuration from file");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_defaults() {
        let config = ModelConfig::default();
        assert!(config.enabled);
        assert_eq!(config.runtime_url, DEFAULT_RUNTIME_URL);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn config_file_parses_partial_model_section() {
        let yaml = "model:\n  enabled: false\n";
        let parsed: ConfigFile = serde_yaml::from_str(yaml).unwrap();
        let model = parsed.model.unwrap();
        assert!(!model.enabled);
        assert_eq!(model.model_name, DEFAULT_MODEL_NAME);
    }
}
