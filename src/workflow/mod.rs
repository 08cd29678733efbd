pub mod answer_merge;
pub mod exam_ctx;
pub mod exam_flow;
pub mod flatten;
pub mod ids;
pub mod passages;

pub use answer_merge::merge_answers;
pub use exam_ctx::{ExamCtx, ExamJob};
pub use exam_flow::{ExamFlow, ExamResult};
pub use flatten::flatten;
pub use ids::assign_ids;
pub use passages::resolve_shared_passages;
