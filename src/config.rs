use crate::adapters::llm::ModelConfig;
use crate::core::{PipelineOptions, ReviewError, SamplingParams};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_model")]
    pub model: String,

    pub api_key: Option<String>,
    pub base_url: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    #[serde(default = "default_summary_temperature")]
    pub summary_temperature: f32,

    #[serde(default = "default_summary_max_tokens")]
    pub summary_max_tokens: usize,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Values taken from the command line (or the environment variables clap
/// falls back to). `None` leaves the file/default value in place.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: None,
            base_url: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            summary_temperature: default_summary_temperature(),
            summary_max_tokens: default_summary_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        for candidate in [".kindscope.yml", ".kindscope.yaml"] {
            let path = PathBuf::from(candidate);
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        if let Some(home_dir) = dirs::home_dir() {
            let home_config = home_dir.join(".kindscope.yml");
            if home_config.exists() {
                return Self::load_from(&home_config);
            }
        }

        Ok(Config::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn merge_with_cli(&mut self, cli: CliOverrides) {
        if let Some(api_key) = cli.api_key {
            self.api_key = Some(api_key);
        }
        if let Some(model) = cli.model {
            self.model = model;
        }
        if let Some(base_url) = cli.base_url {
            self.base_url = Some(base_url);
        }
        if let Some(temperature) = cli.temperature {
            self.temperature = temperature;
        }
        if let Some(max_tokens) = cli.max_tokens {
            self.max_tokens = max_tokens;
        }
    }

    pub fn require_api_key(&self) -> Result<&str, ReviewError> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ReviewError::Configuration(
                    "OpenAI API key is required. Use --api-key option or set OPENAI_API_KEY environment variable.".to_string(),
                )
            })
    }

    pub fn model_config(&self) -> ModelConfig {
        ModelConfig {
            model_name: self.model.clone(),
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            timeout_secs: self.timeout_secs,
        }
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            transform: SamplingParams {
                temperature: self.temperature,
                max_tokens: self.max_tokens,
            },
            summary: SamplingParams {
                temperature: self.summary_temperature,
                max_tokens: self.summary_max_tokens,
            },
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    SamplingParams::TRANSFORM.temperature
}

fn default_max_tokens() -> usize {
    SamplingParams::TRANSFORM.max_tokens
}

fn default_summary_temperature() -> f32 {
    SamplingParams::SUMMARY.temperature
}

fn default_summary_max_tokens() -> usize {
    SamplingParams::SUMMARY.max_tokens
}

fn default_timeout_secs() -> u64 {
    60
}
