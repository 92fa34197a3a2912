use crate::core::prompt::build_prompt;
use crate::core::validator::validate_exam_request;
use crate::core::GenerationClient;
use crate::utils::error::{ExamError, Result};
use serde_json::Value;

/// Validate -> build prompt -> generate. Holds the injected generation client.
pub struct ExamService<G: GenerationClient> {
    client: G,
}

impl<G: GenerationClient> ExamService<G> {
    pub fn new(client: G) -> Self {
        Self { client }
    }

    /// Runs one request through the pipeline. Failures other than invalid
    /// input are collapsed into `ExamError::Generation`.
    pub async fn generate_exam(&self, body: &Value) -> Result<String> {
        let request = validate_exam_request(body)?;
        tracing::debug!(
            topic = %request.topic,
            count = request.count,
            include_answer_key = request.include_answer_key,
            "Validated exam request"
        );

        let prompt = build_prompt(&request);
        tracing::debug!("Prompt built ({} chars)", prompt.len());

        self.client.generate(&prompt).await.map_err(|e| match e {
            ExamError::Generation { .. } => e,
            other => ExamError::generation(other.to_string()),
        })
    }
}
