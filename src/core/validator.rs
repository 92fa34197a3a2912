use crate::domain::model::{ExamRequest, FieldErrors};
use crate::utils::error::{ExamError, Result};
use serde_json::Value;

pub const TOPIC_MAX_CHARS: usize = 60;
pub const COUNT_MIN: u8 = 1;
pub const COUNT_MAX: u8 = 50;

/// The `topic` field as found in the body, before any checks.
#[derive(Debug, Clone, PartialEq)]
pub enum TopicInput {
    Missing,
    Text(String),
    WrongType(&'static str),
}

/// A request body after coercion. `count` is NaN when the raw value has no
/// numeric reading.
#[derive(Debug, Clone, PartialEq)]
pub struct RawExamRequest {
    pub topic: TopicInput,
    pub count: f64,
    pub include_answer_key: bool,
}

impl RawExamRequest {
    /// Coerces an arbitrary JSON body. Anything that is not an object is read
    /// as an object without fields.
    pub fn from_json(body: &Value) -> Self {
        let field = |name: &str| body.as_object().and_then(|obj| obj.get(name));

        let topic = match field("topic") {
            None => TopicInput::Missing,
            Some(Value::String(s)) => TopicInput::Text(s.clone()),
            Some(other) => TopicInput::WrongType(json_type_name(other)),
        };

        Self {
            topic,
            count: coerce_count(field("count")),
            include_answer_key: coerce_flag(field("includeAnswerKey")),
        }
    }
}

pub fn coerce_count(value: Option<&Value>) -> f64 {
    let number = match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(f64::NAN)
            }
        }
        Some(Value::Array(_)) | Some(Value::Object(_)) => f64::NAN,
    };

    if number.is_finite() {
        number
    } else {
        f64::NAN
    }
}

pub fn coerce_flag(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Checks every constraint and collects all failures instead of stopping at
/// the first one.
pub fn validate(raw: RawExamRequest) -> std::result::Result<ExamRequest, FieldErrors> {
    let mut errors = FieldErrors::default();

    let topic = match raw.topic {
        TopicInput::Missing => {
            errors.add_field("topic", "Required");
            None
        }
        TopicInput::WrongType(kind) => {
            errors.add_field("topic", format!("Expected string, received {}", kind));
            None
        }
        TopicInput::Text(text) => {
            if text.is_empty() {
                errors.add_field("topic", "Topic is required");
            }
            if text.encode_utf16().count() > TOPIC_MAX_CHARS {
                errors.add_field(
                    "topic",
                    format!(
                        "String must contain at most {} character(s)",
                        TOPIC_MAX_CHARS
                    ),
                );
            }
            Some(text)
        }
    };

    let count = raw.count;
    if count.is_nan() {
        errors.add_field("count", "Expected number, received nan");
    } else {
        if count.fract() != 0.0 {
            errors.add_field("count", "Expected integer, received float");
        }
        if count < f64::from(COUNT_MIN) {
            errors.add_field(
                "count",
                format!("Number must be greater than or equal to {}", COUNT_MIN),
            );
        }
        if count > f64::from(COUNT_MAX) {
            errors.add_field(
                "count",
                format!("Number must be less than or equal to {}", COUNT_MAX),
            );
        }
    }

    match topic {
        Some(topic) if errors.is_empty() => Ok(ExamRequest {
            topic,
            count: count as u8,
            include_answer_key: raw.include_answer_key,
        }),
        _ => Err(errors),
    }
}

/// Parse-then-validate entry point used by the request pipeline.
pub fn validate_exam_request(body: &Value) -> Result<ExamRequest> {
    validate(RawExamRequest::from_json(body)).map_err(ExamError::InvalidInput)
}
