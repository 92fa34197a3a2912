use crate::domain::model::FieldErrors;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExamError {
    #[error("Invalid input: {0}")]
    InvalidInput(FieldErrors),

    #[error("Generation failed: {message}")]
    Generation { message: String },

    #[error("API request failed: {0}")]
    Api(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

impl ExamError {
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Caller-supplied data failed the request schema. Everything else is
    /// reported to clients as a generation failure.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidInput(_) => "The request did not pass validation".to_string(),
            Self::Generation { .. } | Self::Api(_) => {
                "Failed to generate exam.".to_string()
            }
            Self::Io(e) => format!("File system error: {}", e),
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
            Self::MissingConfigError { field } => {
                format!("Configuration field '{}' is required", field)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "Fix the reported fields and resend the request",
            Self::Generation { .. } | Self::Api(_) => {
                "Check the API key, model name and network access to the generation API"
            }
            Self::Io(_) => "Check that the file exists and is readable",
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => {
                "Review the command line flags, environment variables or config file"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ExamError>;
