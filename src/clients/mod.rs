pub mod llm_client;
pub mod sanitizer;

pub use llm_client::{LlmClient, ModelGateway};
pub use sanitizer::{parse_model_json, sanitize};
