pub mod exam;
pub mod prompt;
pub mod validator;

pub use crate::domain::model::{ExamRequest, ExamResult, FieldErrors};
pub use crate::domain::ports::{ConfigProvider, GeminiSettings, GenerationClient};
pub use crate::utils::error::Result;
