// Adapters layer: concrete implementations for external systems (generation API, http server).

pub mod gemini;
pub mod http;
