//! 复核记录写入服务
//!
//! 只负责把"需要人工看一眼"的东西落盘：复核标记清单、无法解析的原始响应。

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::ReviewFlag;

/// 复核记录写入服务
#[derive(Debug, Clone)]
pub struct WarnWriter {
    output_dir: PathBuf,
}

impl WarnWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// 原始响应保存目录
    pub fn debug_dir(&self) -> PathBuf {
        self.output_dir.join("debug")
    }

    /// 复核清单路径
    pub fn review_path(&self, stem: &str) -> PathBuf {
        self.output_dir.join(format!("{}.review.txt", stem))
    }

    /// 保存无法解析的原始响应，返回写入的路径
    pub async fn dump_raw_response(&self, stem: &str, label: &str, raw: &str) -> AppResult<PathBuf> {
        let dir = self.debug_dir();
        ensure_dir(&dir).await?;
        let path = dir.join(format!("{}_{}.txt", stem, label));
        write_file(&path, raw).await?;
        debug!("原始响应已保存: {}", path.display());
        Ok(path)
    }

    /// 写入复核清单；没有标记时不写文件，返回 None
    ///
    /// 整份试卷级别的标记在前，其余按题号排序。
    pub async fn write_review(
        &self,
        stem: &str,
        source: &str,
        flags: &[ReviewFlag],
    ) -> AppResult<Option<PathBuf>> {
        if flags.is_empty() {
            return Ok(None);
        }
        ensure_dir(&self.output_dir).await?;
        let path = self.review_path(stem);

        let mut content = format!(
            "{}\n复核清单 - {} - {}\n{}\n\n",
            "=".repeat(60),
            source,
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            "=".repeat(60)
        );
        let mut ordered: Vec<&ReviewFlag> = flags.iter().collect();
        ordered.sort_by_key(|flag| flag.number().unwrap_or(0));
        for flag in ordered {
            content.push_str(&format!("- {}\n", flag));
        }

        write_file(&path, &content).await?;
        debug!("复核清单已写入: {} ({} 条)", path.display(), flags.len());
        Ok(Some(path))
    }
}

async fn ensure_dir(dir: &Path) -> AppResult<()> {
    fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::file_write_failed(dir.display().to_string(), e))
}

async fn write_file(path: &Path, content: &str) -> AppResult<()> {
    fs::write(path, content)
        .await
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_output(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("exam_indexer_{}_{}", name, std::process::id()))
    }

    #[tokio::test]
    async fn test_write_review_skips_empty() {
        let writer = WarnWriter::new(temp_output("review_empty"));
        let written = writer.write_review("prova", "prova.pdf", &[]).await.unwrap();
        assert!(written.is_none());
    }

    #[tokio::test]
    async fn test_write_review_lists_flags() {
        let dir = temp_output("review_flags");
        let writer = WarnWriter::new(&dir);
        let flags = vec![
            ReviewFlag::MissingAnswerKeyEntry { number: 9 },
            ReviewFlag::Gap { number: 7 },
            ReviewFlag::AnswerKeyUnavailable {
                reason: "timeout".to_string(),
            },
        ];

        let path = writer
            .write_review("prova", "prova.pdf", &flags)
            .await
            .unwrap()
            .unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("prova.pdf"));
        let items: Vec<&str> = content.lines().filter(|l| l.starts_with("- ")).collect();
        assert_eq!(items.len(), 3);
        assert!(items[0].contains("答案文件不可用"));
        assert!(items[1].contains("7"));
        assert!(items[2].contains("9"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_dump_raw_response() {
        let dir = temp_output("dump");
        let writer = WarnWriter::new(&dir);
        let path = writer
            .dump_raw_response("prova", "chunk_1_10", "{quebrado")
            .await
            .unwrap();
        assert!(path.ends_with("debug/prova_chunk_1_10.txt"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{quebrado");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
