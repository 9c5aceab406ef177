use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reasoner::dispatch::ExtractorOptions;
use reasoner::llm::OpenAiConfig;
use reasoner::llm::openai::{DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL};
use reasoner::reasoning::ReasonerOptions;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub llm: LlmConfig,
    pub reasoning: ReasoningConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub base_url: String,
    pub api_key_env: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            temperature: 0.0,
            max_tokens: None,
            timeout_ms: 60000,
        }
    }
}

impl LlmConfig {
    pub fn to_openai_config(&self) -> OpenAiConfig {
        OpenAiConfig {
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            api_key_env: self.api_key_env.clone(),
            temperature: self.temperature,
            timeout: Duration::from_millis(self.timeout_ms),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasoningConfig {
    pub known_word_fallback: bool,
    pub benchmark_shortcuts: bool,
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            known_word_fallback: true,
            benchmark_shortcuts: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            llm: LlmConfig::default(),
            reasoning: ReasoningConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let project_name = env!("CARGO_PKG_NAME");
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    pub fn extractor_options(&self) -> ExtractorOptions {
        ExtractorOptions {
            known_word_fallback: self.reasoning.known_word_fallback,
        }
    }

    pub fn reasoner_options(&self) -> ReasonerOptions {
        ReasonerOptions {
            benchmark_shortcuts: self.reasoning.benchmark_shortcuts,
            max_tokens: self.llm.max_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.log_level.as_deref(), Some("info"));
        assert_eq!(config.llm.model, "gpt-3.5-turbo");
        assert_eq!(config.llm.base_url, "https://api.openai.com/v1");
        assert_eq!(config.llm.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.llm.temperature, 0.0);
        assert!(config.reasoning.known_word_fallback);
        assert!(!config.reasoning.benchmark_shortcuts);
    }

    #[test]
    fn test_load_explicit_file() {
        let file = write_config(
            "log_level: debug\n\
             llm:\n  model: gpt-4o-mini\n  timeout_ms: 5000\n\
             reasoning:\n  benchmark_shortcuts: true\n",
        );
        let config = Config::load(Some(&file.path().to_path_buf())).unwrap();

        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.timeout_ms, 5000);
        // unset fields keep their defaults
        assert_eq!(config.llm.api_key_env, "OPENAI_API_KEY");
        assert!(config.reasoning.benchmark_shortcuts);
        assert!(config.reasoning.known_word_fallback);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let path = PathBuf::from("/nonexistent/reasoner.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_invalid_yaml_fails() {
        let file = write_config("llm: [not, a, map]\n");
        let err = Config::load(Some(&file.path().to_path_buf())).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));
    }

    #[test]
    fn test_to_openai_config() {
        let mut config = Config::default();
        config.llm.base_url = "http://localhost:8080/v1".to_string();
        config.llm.timeout_ms = 1500;

        let openai = config.llm.to_openai_config();
        assert_eq!(openai.base_url, "http://localhost:8080/v1");
        assert_eq!(openai.timeout, Duration::from_millis(1500));
        assert_eq!(openai.model, "gpt-3.5-turbo");
    }

    #[test]
    fn test_option_helpers() {
        let mut config = Config::default();
        config.reasoning.known_word_fallback = false;
        config.reasoning.benchmark_shortcuts = true;
        config.llm.max_tokens = Some(512);

        assert!(!config.extractor_options().known_word_fallback);
        let options = config.reasoner_options();
        assert!(options.benchmark_shortcuts);
        assert_eq!(options.max_tokens, Some(512));
    }
}
