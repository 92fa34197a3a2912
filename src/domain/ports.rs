use crate::utils::error::Result;
use async_trait::async_trait;

/// Boundary capability that turns a prompt into generated text.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_seconds: u64,
}

pub trait ConfigProvider: Send + Sync {
    fn host(&self) -> &str;
    fn port(&self) -> u16;
    fn cors_origins(&self) -> &[String];
    fn gemini_settings(&self) -> GeminiSettings;

    fn bind_address(&self) -> String {
        format!("{}:{}", self.host(), self.port())
    }
}
