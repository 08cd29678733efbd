//! 分块抽取题目
//!
//! 把 `[1, total]` 切成固定大小的区间，每个区间调用一次模型。
//! 区间小，单次输出就短，结构化输出不容易被截断；代价是调用次数更多。

use futures::stream::{self, StreamExt};
use serde::Deserialize;
use std::collections::BTreeSet;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppResult, ModelError};
use crate::infrastructure::ExamDocument;
use crate::models::de::null_as_default;
use crate::models::{ChunkRange, Question, RawQuestion, ReviewFlag};
use crate::services::prompts::chunk_prompt;
use crate::services::LlmService;

/// 分块响应：`{"questoes": [...]}`，也兼容直接返回数组
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChunkPayload {
    Wrapped {
        #[serde(rename = "questoes", default, deserialize_with = "null_as_default")]
        questions: Vec<serde_json::Value>,
    },
    Bare(Vec<serde_json::Value>),
}

impl ChunkPayload {
    fn into_entries(self) -> Vec<serde_json::Value> {
        match self {
            ChunkPayload::Wrapped { questions } => questions,
            ChunkPayload::Bare(entries) => entries,
        }
    }
}

/// 一个分块的调用结果
pub type ChunkOutcome = (ChunkRange, AppResult<Vec<serde_json::Value>>);

/// 分块抽取的汇总结果
#[derive(Debug, Default)]
pub struct ExtractionReport {
    /// 按题号升序
    pub questions: Vec<Question>,
    pub flags: Vec<ReviewFlag>,
    pub chunks_total: usize,
    pub chunks_failed: usize,
}

/// 把 `[1, total]` 切成连续、不重叠、升序的闭区间，每段最多 `chunk_size` 个
pub fn plan_chunks(total: u32, chunk_size: u32) -> Vec<ChunkRange> {
    let size = chunk_size.max(1);
    let mut chunks = Vec::new();
    let mut start = 1u32;
    while start <= total {
        let end = start.saturating_add(size - 1).min(total);
        chunks.push(ChunkRange::new(start, end));
        if end == u32::MAX {
            break;
        }
        start = end + 1;
    }
    chunks
}

/// 校验一个分块的条目：区间外的题号丢弃并记录
pub fn accept_chunk(
    range: ChunkRange,
    entries: Vec<serde_json::Value>,
    accept_model_answers: bool,
) -> (Vec<Question>, Vec<ReviewFlag>) {
    let mut questions = Vec::with_capacity(entries.len());
    let mut flags = Vec::new();

    for entry in entries {
        let (raw, issues) = RawQuestion::from_entry(&entry);
        let Some(question) = Question::from_raw(raw, accept_model_answers) else {
            warn!("⚠️ 分块 {} 中有条目缺少有效题号", range);
            flags.push(ReviewFlag::InvalidEntry {
                chunk: range,
                reason: match entry.is_object() {
                    true => "缺少有效题号".to_string(),
                    false => format!("不是 JSON 对象: {}", entry),
                },
            });
            continue;
        };
        if !range.contains(question.number) {
            warn!(
                "⚠️ 分块 {} 返回了区间外的第 {} 题，已丢弃",
                range, question.number
            );
            flags.push(ReviewFlag::RangeMismatch {
                chunk: range,
                number: question.number,
            });
            continue;
        }
        for (field, reason) in issues {
            warn!("⚠️ 第 {} 题字段 {} 无法识别，已留空: {}", question.number, field, reason);
            flags.push(ReviewFlag::DegradedField {
                number: question.number,
                field: field.to_string(),
                reason,
            });
        }
        questions.push(question);
    }

    (questions, flags)
}

/// 汇总所有分块结果（按发出顺序传入），最后按题号排序并计算缺口
pub fn assemble(outcomes: Vec<ChunkOutcome>, accept_model_answers: bool) -> ExtractionReport {
    let mut report = ExtractionReport {
        chunks_total: outcomes.len(),
        ..Default::default()
    };
    let mut seen = BTreeSet::new();
    let mut highest_failed = 0u32;

    for (range, result) in outcomes {
        match result {
            Ok(entries) => {
                let (questions, flags) = accept_chunk(range, entries, accept_model_answers);
                report.flags.extend(flags);
                for question in questions {
                    if seen.insert(question.number) {
                        report.questions.push(question);
                    } else {
                        warn!("⚠️ 第 {} 题重复出现，保留第一次", question.number);
                        report.flags.push(ReviewFlag::DuplicateQuestion {
                            number: question.number,
                        });
                    }
                }
            }
            Err(e) => {
                if e.as_model_error().is_some_and(ModelError::is_unavailable) {
                    error!("❌ 分块 {} 抽取失败（模型服务不可用）: {}", range, e);
                } else {
                    error!("❌ 分块 {} 抽取失败（输出无法解析）: {}", range, e);
                }
                report.chunks_failed += 1;
                highest_failed = highest_failed.max(range.end);
                report.flags.push(ReviewFlag::ChunkFailed {
                    chunk: range,
                    reason: e.to_string(),
                });
            }
        }
    }

    report.questions.sort_by_key(|q| q.number);

    // 末尾空分块说明实际题数比计划少，不算缺口
    let highest_seen = seen.iter().next_back().copied().unwrap_or(0);
    let highest = highest_seen.max(highest_failed);
    for number in 1..=highest {
        if !seen.contains(&number) {
            report.flags.push(ReviewFlag::Gap { number });
        }
    }

    report
}

/// 分块题目抽取器
#[derive(Clone)]
pub struct QuestionExtractor {
    llm: LlmService,
    max_concurrent: usize,
    accept_model_answers: bool,
}

impl QuestionExtractor {
    pub fn new(llm: LlmService, config: &Config) -> Self {
        Self {
            llm,
            max_concurrent: config.max_concurrent_chunks.max(1),
            accept_model_answers: config.accept_model_answers,
        }
    }

    /// 抽取 `[1, total]` 的全部题目
    ///
    /// 分块调用并发进行（有上限），结果按发出顺序汇总；
    /// 某个分块失败不影响其它分块。
    pub async fn extract_questions(
        &self,
        document: &ExamDocument,
        total: u32,
        chunk_size: u32,
    ) -> ExtractionReport {
        let chunks = plan_chunks(total, chunk_size);
        info!(
            "📋 共 {} 题，分 {} 块抽取 (每块 {} 题，并发 {})",
            total,
            chunks.len(),
            chunk_size.max(1),
            self.max_concurrent
        );

        let requests: Vec<_> = chunks
            .into_iter()
            .map(|range| async move { (range, self.request_chunk(document, range).await) })
            .collect();
        let outcomes: Vec<ChunkOutcome> = stream::iter(requests)
            .buffered(self.max_concurrent)
            .collect()
            .await;

        assemble(outcomes, self.accept_model_answers)
    }

    async fn request_chunk(
        &self,
        document: &ExamDocument,
        range: ChunkRange,
    ) -> AppResult<Vec<serde_json::Value>> {
        info!("🤖 正在抽取第 {}-{} 题...", range.start, range.end);
        let prompt = chunk_prompt(range, self.accept_model_answers);
        let payload: ChunkPayload = self
            .llm
            .request_json(document, &prompt, &range.label())
            .await?;
        let entries = payload.into_entries();
        info!("   ✅ 分块 {} 返回 {} 道题", range, entries.len());
        Ok(entries)
    }
}
