use tracing::info;

use crate::error::AppResult;
use crate::infrastructure::ExamDocument;
use crate::models::{AnswerKey, ExamMetadata, RawAnswerKey, RawMetadata};
use crate::services::prompts::{ANSWER_KEY_PROMPT, METADATA_PROMPT};
use crate::services::LlmService;

/// 抽取试卷元数据（一次调用）
///
/// 模型没有给出题目总数时使用 `fallback_total`。
pub async fn extract_metadata(
    llm: &LlmService,
    document: &ExamDocument,
    fallback_total: u32,
) -> AppResult<ExamMetadata> {
    info!("🤖 正在抽取元数据: {}", document.name());
    let raw: RawMetadata = llm
        .request_json(document, METADATA_PROMPT, "metadata")
        .await?;
    let reported_total = raw.total_questions.is_some();
    let metadata = ExamMetadata::from_raw(raw, fallback_total);

    info!(
        "📊 试卷: {} | 机构: {} | 年份: {:?} | 职位: {} | {} 题{}",
        metadata.exam_name,
        metadata.board,
        metadata.year,
        metadata.role,
        metadata.total_questions,
        if reported_total { "" } else { " (默认值)" }
    );
    Ok(metadata)
}

/// 抽取官方答案表（一次调用）
pub async fn extract_answer_key(llm: &LlmService, document: &ExamDocument) -> AppResult<AnswerKey> {
    info!("🤖 正在抽取答案表: {}", document.name());
    let raw: RawAnswerKey = llm
        .request_json(document, ANSWER_KEY_PROMPT, "answer_key")
        .await?;
    let key = AnswerKey::from_raw(raw);
    info!("✓ 答案表共 {} 项", key.len());
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::ModelGateway;
    use crate::config::Config;
    use crate::infrastructure::MediaKind;
    use crate::models::KeyEntry;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct ScriptedGateway(&'static str);

    #[async_trait]
    impl ModelGateway for ScriptedGateway {
        fn model_name(&self) -> &str {
            "scripted"
        }

        async fn invoke(&self, _document: &ExamDocument, _prompt: &str) -> AppResult<String> {
            Ok(self.0.to_string())
        }
    }

    fn service(response: &'static str) -> LlmService {
        let config = Config {
            persist_raw_responses: false,
            ..Config::default()
        };
        LlmService::with_gateway(Arc::new(ScriptedGateway(response)), &config)
    }

    fn doc() -> ExamDocument {
        ExamDocument::new("prova.pdf", MediaKind::Pdf, b"%PDF".to_vec())
    }

    #[test]
    fn test_extract_metadata_defaults_total() {
        let llm = service(r#"{"concurso": "PF 2021", "banca": "CEBRASPE", "ano": 2021, "cargo": "Agente"}"#);
        let meta = tokio_test::block_on(extract_metadata(&llm, &doc(), 120)).unwrap();
        assert_eq!(meta.total_questions, 120);
        assert_eq!(meta.exam_name, "PF 2021");
    }

    #[test]
    fn test_extract_answer_key() {
        let llm = service("```json\n{\"respostas\": {\"1\": \"C\", \"2\": \"ANULADA\",}}\n```");
        let key = tokio_test::block_on(extract_answer_key(&llm, &doc())).unwrap();
        assert_eq!(key.get(1), Some(&KeyEntry::Letter("C".to_string())));
        assert_eq!(key.get(2), Some(&KeyEntry::Annulled));
    }
}
