pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::gemini::GeminiClient;
pub use adapters::http::{router, CorsPolicy};
pub use config::{CliConfig, TomlConfig};
pub use core::exam::ExamService;
pub use utils::error::{ExamError, Result};
