pub mod document;

pub use document::{ExamDocument, MediaKind};
