//! 批量试卷处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：校验配置、创建模型能力
//! 2. **批量加载**：扫描文件夹中的试卷，配对答案文件
//! 3. **并发控制**：使用 Semaphore 限制同时处理的试卷数量
//! 4. **全局统计**：汇总所有试卷的处理结果
//!
//! 试卷之间没有共享的可变状态，单份试卷失败不影响其它试卷。

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, FileError};
use crate::orchestrator::paper_processor::{self, ExamSummary};
use crate::utils::logging::{log_batch_complete, log_startup, print_final_stats};
use crate::workflow::{ExamCtx, ExamFlow, ExamJob};

/// 文件名中包含该词的 PDF 视为答案文件
const ANSWER_KEY_MARKER: &str = "gabarito";

/// 应用主结构
pub struct App {
    config: Config,
    flow: Arc<ExamFlow>,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> AppResult<Self> {
        config.validate()?;
        let flow = Arc::new(ExamFlow::new(&config));
        Ok(Self::with_flow(config, flow))
    }

    /// 使用指定流程创建（测试时注入假模型）
    pub fn with_flow(config: Config, flow: Arc<ExamFlow>) -> Self {
        log_startup(&config);
        Self { config, flow }
    }

    /// 处理单份试卷
    pub async fn run_single(&self, job: ExamJob) -> AppResult<ExamSummary> {
        let ctx = ExamCtx::new(1, 1, job.stem());
        paper_processor::process_exam(&self.flow, &job, &ctx, &self.config).await
    }

    /// 处理文件夹中的所有试卷
    pub async fn run_batch(&self, folder: &Path) -> AppResult<BatchStats> {
        info!("\n📁 正在扫描待处理的试卷: {}", folder.display());
        let jobs = discover_jobs(folder).await?;

        if jobs.is_empty() {
            warn!("⚠️ 没有找到待处理的试卷，程序结束");
            return Ok(BatchStats::default());
        }

        info!(
            "✓ 找到 {} 份试卷，同时处理 {} 份",
            jobs.len(),
            self.config.max_concurrent_documents
        );

        let stats = self.process_all(jobs).await?;
        print_final_stats(stats.success, stats.failed, stats.total, &self.config.output_dir);
        Ok(stats)
    }

    async fn process_all(&self, jobs: Vec<ExamJob>) -> AppResult<BatchStats> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_documents.max(1)));
        let total = jobs.len();
        let mut handles = Vec::with_capacity(total);

        for (idx, job) in jobs.into_iter().enumerate() {
            let permit = semaphore.clone().acquire_owned().await?;
            let ctx = ExamCtx::new(idx + 1, total, job.stem());
            let flow = Arc::clone(&self.flow);
            let config = self.config.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                match paper_processor::process_exam(&flow, &job, &ctx, &config).await {
                    Ok(summary) => Ok(summary),
                    Err(e) => {
                        error!("{} ❌ 处理过程中发生错误: {}", ctx, e);
                        Err(e)
                    }
                }
            });
            handles.push((idx + 1, handle));
        }

        let mut stats = BatchStats {
            total,
            ..Default::default()
        };
        for (exam_index, handle) in handles {
            match handle.await {
                Ok(Ok(summary)) => {
                    stats.success += 1;
                    stats.summaries.push(summary);
                }
                Ok(Err(_)) => stats.failed += 1,
                Err(e) => {
                    error!("[试卷 {}] 任务执行失败: {}", exam_index, e);
                    stats.failed += 1;
                }
            }
        }
        log_batch_complete(stats.success, stats.total);

        Ok(stats)
    }
}

/// 批量处理统计
#[derive(Debug, Default)]
pub struct BatchStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
    pub summaries: Vec<ExamSummary>,
}

/// 扫描文件夹：每个不含 "gabarito" 的 PDF 是一份试卷；
/// 存在 `{stem}_gabarito.pdf` 或 `gabarito_{stem}.pdf` 时作为它的答案文件。
pub async fn discover_jobs(folder: &Path) -> AppResult<Vec<ExamJob>> {
    if !folder.is_dir() {
        return Err(FileError::DirectoryNotFound {
            path: folder.display().to_string(),
        }
        .into());
    }

    let mut entries = fs::read_dir(folder)
        .await
        .map_err(|e| AppError::file_read_failed(folder.display().to_string(), e))?;

    let mut pdfs: Vec<PathBuf> = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::file_read_failed(folder.display().to_string(), e))?
    {
        let path = entry.path();
        let is_pdf = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if is_pdf {
            pdfs.push(path);
        }
    }
    pdfs.sort();

    let jobs = pdfs
        .iter()
        .filter(|path| !is_answer_key(path))
        .map(|path| {
            let key = find_answer_key(path, &pdfs);
            match &key {
                Some(key) => info!(
                    "正在加载: {} (答案: {})",
                    file_name(path),
                    file_name(key)
                ),
                None => info!("正在加载: {}", file_name(path)),
            }
            ExamJob::new(path.clone(), key)
        })
        .collect();

    Ok(jobs)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

fn is_answer_key(path: &Path) -> bool {
    file_name(path).to_lowercase().contains(ANSWER_KEY_MARKER)
}

fn find_answer_key(exam: &Path, candidates: &[PathBuf]) -> Option<PathBuf> {
    let stem = exam.file_stem()?.to_string_lossy().to_lowercase();
    let expected = [
        format!("{}_{}.pdf", stem, ANSWER_KEY_MARKER),
        format!("{}_{}.pdf", ANSWER_KEY_MARKER, stem),
    ];
    candidates
        .iter()
        .find(|c| expected.contains(&file_name(c).to_lowercase()))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_discover_jobs_pairs_answer_keys() {
        let dir = std::env::temp_dir().join(format!("exam_indexer_discover_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for name in [
            "pf_2021.pdf",
            "pf_2021_gabarito.pdf",
            "prf_2021.PDF",
            "gabarito_prf_2021.pdf",
            "tj_2019.pdf",
            "notas.txt",
        ] {
            std::fs::write(dir.join(name), b"%PDF").unwrap();
        }

        let jobs = discover_jobs(&dir).await.unwrap();
        assert_eq!(jobs.len(), 3);

        let by_stem = |stem: &str| jobs.iter().find(|j| j.stem() == stem).unwrap();
        assert!(by_stem("pf_2021")
            .answer_key_path
            .as_ref()
            .unwrap()
            .ends_with("pf_2021_gabarito.pdf"));
        assert!(by_stem("prf_2021")
            .answer_key_path
            .as_ref()
            .unwrap()
            .ends_with("gabarito_prf_2021.pdf"));
        assert!(by_stem("tj_2019").answer_key_path.is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_discover_jobs_missing_folder() {
        let err = discover_jobs(Path::new("/nonexistent/provas")).await.unwrap_err();
        assert!(matches!(err, AppError::File(FileError::DirectoryNotFound { .. })));
    }
}
