pub mod answer_key;
pub mod de;
pub mod metadata;
pub mod question;
pub mod record;
pub mod review;

pub use answer_key::{AnswerKey, KeyEntry, RawAnswerKey};
pub use metadata::{ExamMetadata, RawMetadata};
pub use question::{Answer, Passage, Question, QuestionKind, RawQuestion, SEE_ABOVE_PLACEHOLDER};
pub use record::OutputRecord;
pub use review::{ChunkRange, ReviewFlag};
