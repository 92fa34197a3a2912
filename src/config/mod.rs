pub mod toml_config;

use crate::adapters::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECONDS};
use crate::core::{ConfigProvider, GeminiSettings};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

pub use toml_config::TomlConfig;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
pub const MAX_TIMEOUT_SECONDS: u64 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Clone, Parser)]
#[command(name = "exam-gen")]
#[command(about = "Generates primary-school math exams through a generative-text API")]
pub struct CliConfig {
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    #[arg(
        long = "cors-origin",
        env = "CORS_ORIGIN",
        value_delimiter = ',',
        default_value = DEFAULT_CORS_ORIGIN
    )]
    pub cors_origins: Vec<String>,

    #[arg(long, env = "GEMINI_API_KEY", default_value = "", hide_env_values = true)]
    pub gemini_api_key: String,

    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub gemini_model: String,

    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub gemini_base_url: String,

    #[arg(long, env = "GENERATION_TIMEOUT_SECONDS", default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    #[arg(long, help = "Read settings from a TOML file instead of flags and environment")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

impl CliConfig {
    /// Trims comma-split origins and drops empty entries.
    pub fn normalized(mut self) -> Self {
        self.cors_origins = normalize_origins(&self.cors_origins);
        self
    }
}

pub fn normalize_origins(origins: &[String]) -> Vec<String> {
    origins
        .iter()
        .map(|origin| origin.trim())
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

impl ConfigProvider for CliConfig {
    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    fn gemini_settings(&self) -> GeminiSettings {
        GeminiSettings {
            api_key: self.gemini_api_key.clone(),
            model: self.gemini_model.clone(),
            base_url: self.gemini_base_url.clone(),
            timeout_seconds: self.timeout_seconds,
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

/// Checks shared by every configuration source.
pub fn validate_provider<C: ConfigProvider>(config: &C) -> Result<()> {
    validation::validate_non_empty_string("host", config.host())?;
    validation::validate_positive_number("port", usize::from(config.port()), 1)?;

    for origin in config.cors_origins() {
        validation::validate_origin("cors_origins", origin)?;
    }

    let gemini = config.gemini_settings();
    validation::validate_non_empty_string("gemini.api_key", &gemini.api_key)?;
    validation::validate_resolved("gemini.api_key", &gemini.api_key)?;
    validation::validate_non_empty_string("gemini.model", &gemini.model)?;
    validation::validate_url("gemini.base_url", &gemini.base_url)?;
    validation::validate_range(
        "gemini.timeout_seconds",
        gemini.timeout_seconds,
        1,
        MAX_TIMEOUT_SECONDS,
    )?;

    tracing::debug!("Configuration validation passed");
    Ok(())
}
