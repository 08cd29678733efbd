//! 试卷处理流程 - 流程层
//!
//! 核心职责：定义"一份试卷"的完整抽取流程
//!
//! 流程顺序：
//! 1. 元数据（一次调用）
//! 2. 分块抽取题目（N 次调用）
//! 3. 官方答案（可选）→ 合并
//! 4. 展开共享文本 → 生成 ID → 扁平化

use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::ExamDocument;
use crate::models::{ExamMetadata, OutputRecord, ReviewFlag};
use crate::services::{extract_answer_key, extract_metadata, LlmService, QuestionExtractor};
use crate::workflow::{assign_ids, flatten, merge_answers, resolve_shared_passages};

/// 一份试卷的处理结果
#[derive(Debug)]
pub struct ExamResult {
    pub metadata: ExamMetadata,
    pub records: Vec<OutputRecord>,
    pub flags: Vec<ReviewFlag>,
    pub chunks_total: usize,
    pub chunks_failed: usize,
    pub answer_key_applied: bool,
}

impl ExamResult {
    /// 缺失的题号
    pub fn gaps(&self) -> Vec<u32> {
        self.flags
            .iter()
            .filter_map(|f| match f {
                ReviewFlag::Gap { number } => Some(*number),
                _ => None,
            })
            .collect()
    }
}

/// 试卷处理流程
///
/// - 不持有文档，只持有模型能力
/// - 元数据失败则整份试卷失败；之后的问题都只降低完整度
pub struct ExamFlow {
    llm: LlmService,
    extractor: QuestionExtractor,
    chunk_size: u32,
    fallback_total: u32,
}

impl ExamFlow {
    pub fn new(config: &Config) -> Self {
        Self::with_llm(LlmService::new(config), config)
    }

    pub fn with_llm(llm: LlmService, config: &Config) -> Self {
        Self {
            extractor: QuestionExtractor::new(llm.clone(), config),
            llm,
            chunk_size: config.chunk_size,
            fallback_total: config.fallback_total_questions,
        }
    }

    pub async fn run(
        &self,
        exam: &ExamDocument,
        answer_key: Option<&ExamDocument>,
    ) -> AppResult<ExamResult> {
        // ========== 1. 元数据 ==========
        let metadata = extract_metadata(&self.llm, exam, self.fallback_total).await?;

        // ========== 2. 分块抽取 ==========
        let report = self
            .extractor
            .extract_questions(exam, metadata.total_questions, self.chunk_size)
            .await;
        info!(
            "✅ 抽取到 {} 道题 (分块失败 {}/{})",
            report.questions.len(),
            report.chunks_failed,
            report.chunks_total
        );
        let mut flags = report.flags;
        let mut questions = report.questions;

        // ========== 3. 官方答案 ==========
        let mut answer_key_applied = false;
        if let Some(key_doc) = answer_key {
            match extract_answer_key(&self.llm, key_doc).await {
                Ok(key) if key.is_empty() => {
                    warn!("⚠️ 答案文件中没有任何答案，跳过合并");
                    flags.push(ReviewFlag::AnswerKeyUnavailable {
                        reason: format!("{} 中没有识别到答案", key_doc.name()),
                    });
                }
                Ok(key) => {
                    let (merged, merge_flags) = merge_answers(questions, &key);
                    questions = merged;
                    flags.extend(merge_flags);
                    answer_key_applied = true;
                    info!("✓ 官方答案已合并");
                }
                Err(e) => {
                    warn!("⚠️ 答案文件抽取失败，跳过合并: {}", e);
                    flags.push(ReviewFlag::AnswerKeyUnavailable {
                        reason: e.to_string(),
                    });
                }
            }
        }

        // ========== 4. 共享文本 / ID / 扁平化 ==========
        let (questions, passage_flags) = resolve_shared_passages(questions);
        flags.extend(passage_flags);
        let questions = assign_ids(questions, &metadata);
        let records = flatten(&metadata, &questions);

        Ok(ExamResult {
            metadata,
            records,
            flags,
            chunks_total: report.chunks_total,
            chunks_failed: report.chunks_failed,
            answer_key_applied,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::ModelGateway;
    use crate::infrastructure::MediaKind;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;

    /// 答案文件返回空答案表
    struct EmptyKeyGateway;

    #[async_trait]
    impl ModelGateway for EmptyKeyGateway {
        fn model_name(&self) -> &str {
            "empty-key"
        }

        async fn invoke(&self, document: &ExamDocument, prompt: &str) -> AppResult<String> {
            if document.name().contains("gabarito") {
                return Ok(json!({"respostas": {}}).to_string());
            }
            if prompt.contains("metadados") {
                return Ok(json!({"banca": "FGV", "ano": 2022, "cargo": "Analista", "total_questoes": 1}).to_string());
            }
            Ok(json!({"questoes": [{"numero": 1, "tipo": "certo_errado"}]}).to_string())
        }
    }

    #[tokio::test]
    async fn test_empty_answer_key_is_not_applied() {
        let config = Config {
            persist_raw_responses: false,
            ..Config::default()
        };
        let flow = ExamFlow::with_llm(LlmService::with_gateway(Arc::new(EmptyKeyGateway), &config), &config);
        let exam = ExamDocument::new("prova.pdf", MediaKind::Pdf, b"%PDF".to_vec());
        let key = ExamDocument::new("prova_gabarito.pdf", MediaKind::Pdf, b"%PDF".to_vec());

        let result = flow.run(&exam, Some(&key)).await.unwrap();

        assert!(!result.answer_key_applied);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].answer_index, -1);
        assert_eq!(result.records[0].options, vec!["Certo", "Errado"]);
        assert!(result
            .flags
            .iter()
            .any(|f| matches!(f, ReviewFlag::AnswerKeyUnavailable { .. })));
    }
}
