//! 单份试卷处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **加载文档**：试卷 + 可选的答案文件
//! 2. **流程调度**：委托 `ExamFlow` 完成抽取
//! 3. **结果落盘**：`{output_dir}/{stem}.json` 与复核清单
//! 4. **统计输出**：题目数、缺口、复核项

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, FileError};
use crate::infrastructure::ExamDocument;
use crate::models::{OutputRecord, ReviewFlag};
use crate::services::WarnWriter;
use crate::utils::logging::{format_numbers, truncate_text};
use crate::workflow::{ExamCtx, ExamFlow, ExamJob, ExamResult};

/// 单份试卷的处理摘要
#[derive(Debug, Clone)]
pub struct ExamSummary {
    pub stem: String,
    pub records: usize,
    pub gaps: Vec<u32>,
    pub review_items: usize,
    pub answer_key_applied: bool,
    pub output_path: PathBuf,
    pub review_path: Option<PathBuf>,
}

/// 处理单份试卷
pub async fn process_exam(
    flow: &ExamFlow,
    job: &ExamJob,
    ctx: &ExamCtx,
    config: &Config,
) -> AppResult<ExamSummary> {
    log_exam_start(ctx, job);

    let exam = ExamDocument::load(&job.exam_path).await?;

    let mut key_flags = Vec::new();
    let answer_key = match &job.answer_key_path {
        Some(path) => match ExamDocument::load(path).await {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!("{} ⚠️ 答案文件加载失败，跳过合并: {}", ctx, e);
                key_flags.push(ReviewFlag::AnswerKeyUnavailable {
                    reason: e.to_string(),
                });
                None
            }
        },
        None => None,
    };

    let mut result = flow.run(&exam, answer_key.as_ref()).await?;
    result.flags.extend(key_flags);

    let output_path = write_records(Path::new(&config.output_dir), &ctx.stem, &result.records).await?;
    let review_path = WarnWriter::new(&config.output_dir)
        .write_review(&ctx.stem, exam.name(), &result.flags)
        .await?;

    let summary = ExamSummary {
        stem: ctx.stem.clone(),
        records: result.records.len(),
        gaps: result.gaps(),
        review_items: result.flags.len(),
        answer_key_applied: result.answer_key_applied,
        output_path,
        review_path,
    };
    log_exam_complete(ctx, &result, &summary);

    Ok(summary)
}

/// 写出 JSON 数组（缩进格式，保留非 ASCII 字符）
pub async fn write_records(
    output_dir: &Path,
    stem: &str,
    records: &[OutputRecord],
) -> AppResult<PathBuf> {
    fs::create_dir_all(output_dir)
        .await
        .map_err(|e| AppError::file_write_failed(output_dir.display().to_string(), e))?;

    let path = output_dir.join(format!("{}.json", stem));
    let json = serde_json::to_string_pretty(records).map_err(|source| FileError::SerializeFailed {
        path: path.display().to_string(),
        source,
    })?;
    fs::write(&path, json)
        .await
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;
    Ok(path)
}

// ========== 日志辅助函数 ==========

fn log_exam_start(ctx: &ExamCtx, job: &ExamJob) {
    info!("{} 📄 开始处理: {}", ctx, job.exam_path.display());
    match &job.answer_key_path {
        Some(path) => info!("{} 📋 答案文件: {}", ctx, path.display()),
        None => info!("{} 📋 未提供答案文件，答案保持未确定", ctx),
    }
}

fn log_exam_complete(ctx: &ExamCtx, result: &ExamResult, summary: &ExamSummary) {
    info!(
        "{} 题目统计: 输出 {} 道, 分块失败 {}/{}, 复核项 {}",
        ctx, summary.records, result.chunks_failed, result.chunks_total, summary.review_items
    );
    if summary.answer_key_applied {
        info!("{} 📋 答案来源: 官方答案", ctx);
    } else {
        info!("{} 📋 答案来源: 无官方答案，gabarito 保持 -1 或模型推断值", ctx);
    }
    if !summary.gaps.is_empty() {
        warn!("{} ⚠️ 缺失题号: {}", ctx, format_numbers(&summary.gaps));
    }
    if let Some(path) = &summary.review_path {
        warn!("{} 📝 复核清单: {}", ctx, path.display());
    }
    if let Some(first) = result.records.first() {
        let preview = serde_json::to_string_pretty(first).unwrap_or_default();
        info!("{} 📝 第一道题预览:\n{}", ctx, truncate_text(&preview, 800));
    }
    info!("{} 💾 已保存至: {}", ctx, summary.output_path.display());
    info!("{} ✅ 试卷处理完成", ctx);
}
