pub mod llm_service;
pub mod metadata_extractor;
pub mod prompts;
pub mod question_extractor;
pub mod warn_writer;

pub use llm_service::LlmService;
pub use metadata_extractor::{extract_answer_key, extract_metadata};
pub use question_extractor::{plan_chunks, ExtractionReport, QuestionExtractor};
pub use warn_writer::WarnWriter;
