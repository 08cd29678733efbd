//! 生成题目 ID：`{banca}_{cargo}_{ano}_{numero:03}`

use crate::models::{ExamMetadata, Question};

const ROLE_MAX_CHARS: usize = 20;

/// 小写，空白字符替换为下划线
fn normalize(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// 单道题的 ID（纯函数）
pub fn question_id(metadata: &ExamMetadata, number: u32) -> String {
    let board = match normalize(&metadata.board) {
        b if b.is_empty() => "unknown".to_string(),
        b => b,
    };
    let role: String = match normalize(&metadata.role) {
        r if r.is_empty() => "cargo".to_string(),
        r => r.chars().take(ROLE_MAX_CHARS).collect(),
    };
    let year = metadata
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "0000".to_string());

    format!("{}_{}_{}_{:03}", board, role, year, number)
}

/// 给所有题目写入 ID；重复调用结果不变
pub fn assign_ids(questions: Vec<Question>, metadata: &ExamMetadata) -> Vec<Question> {
    questions
        .into_iter()
        .map(|question| Question {
            id: Some(question_id(metadata, question.number)),
            ..question
        })
        .collect()
}
