use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

pub const GENERATION_FAILURE_MESSAGE: &str = "Failed to generate exam.";

/// Validated parameters for one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamRequest {
    pub topic: String,
    pub count: u8,
    pub include_answer_key: bool,
}

/// Body of a 200 or 500 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExamResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exam: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExamResult {
    pub fn success(exam: String) -> Self {
        Self {
            ok: true,
            exam: Some(exam),
            error: None,
        }
    }

    pub fn failure() -> Self {
        Self {
            ok: false,
            exam: None,
            error: Some(GENERATION_FAILURE_MESSAGE.to_string()),
        }
    }
}

/// Flattened validation failure: body-level messages plus every failed check
/// keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldErrors {
    pub form_errors: Vec<String>,
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn add_field(&mut self, field: &str, message: impl Into<String>) {
        self.field_errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn add_form(&mut self, message: impl Into<String>) {
        self.form_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.form_errors.is_empty() && self.field_errors.is_empty()
    }

    pub fn for_field(&self, field: &str) -> &[String] {
        self.field_errors
            .get(field)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.form_errors.clone();
        for (field, messages) in &self.field_errors {
            parts.push(format!("{}: {}", field, messages.join(", ")));
        }
        write!(f, "{}", parts.join("; "))
    }
}

/// Body of a 400 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    pub error: FieldErrors,
}
