use serde::Deserialize;

use super::de::{lenient_string, lenient_u32};

/// 模型返回的原始元数据
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMetadata {
    #[serde(rename = "concurso", default, deserialize_with = "lenient_string")]
    pub exam_name: String,
    #[serde(rename = "banca", default, deserialize_with = "lenient_string")]
    pub board: String,
    #[serde(rename = "ano", default, deserialize_with = "lenient_u32")]
    pub year: Option<u32>,
    #[serde(rename = "cargo", default, deserialize_with = "lenient_string")]
    pub role: String,
    #[serde(rename = "total_questoes", default, deserialize_with = "lenient_u32")]
    pub total_questions: Option<u32>,
}

/// 试卷级别的元数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamMetadata {
    pub exam_name: String,
    pub board: String,
    pub year: Option<u32>,
    pub role: String,
    /// 分块计划的依据，不保证与实际题目数一致
    pub total_questions: u32,
}

impl ExamMetadata {
    pub fn from_raw(raw: RawMetadata, fallback_total: u32) -> Self {
        Self {
            exam_name: raw.exam_name.trim().to_string(),
            board: raw.board.trim().to_string(),
            year: raw.year,
            role: raw.role.trim().to_string(),
            total_questions: raw.total_questions.unwrap_or(fallback_total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_total_uses_fallback() {
        let raw: RawMetadata = serde_json::from_str(
            r#"{"concurso": "PRF 2021", "banca": "CEBRASPE", "ano": "2021", "cargo": "Policial"}"#,
        )
        .unwrap();
        let meta = ExamMetadata::from_raw(raw, 120);
        assert_eq!(meta.total_questions, 120);
        assert_eq!(meta.year, Some(2021));
        assert_eq!(meta.board, "CEBRASPE");
    }

    #[test]
    fn test_reported_total_wins() {
        let raw: RawMetadata = serde_json::from_str(r#"{"total_questoes": 50}"#).unwrap();
        let meta = ExamMetadata::from_raw(raw, 120);
        assert_eq!(meta.total_questions, 50);
        assert_eq!(meta.year, None);
        assert!(meta.exam_name.is_empty());
    }
}
