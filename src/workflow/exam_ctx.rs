//! 试卷处理上下文
//!
//! 封装"我正在处理第几份试卷、它叫什么"这一信息

use std::fmt::Display;
use std::path::{Path, PathBuf};

/// 一份待处理的试卷：试卷文件 + 可选的答案文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamJob {
    pub exam_path: PathBuf,
    pub answer_key_path: Option<PathBuf>,
}

impl ExamJob {
    pub fn new(exam_path: impl Into<PathBuf>, answer_key_path: Option<PathBuf>) -> Self {
        Self {
            exam_path: exam_path.into(),
            answer_key_path,
        }
    }

    /// 输出文件名使用的主干（试卷文件名去掉扩展名）
    pub fn stem(&self) -> String {
        file_stem(&self.exam_path)
    }
}

pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "prova".to_string())
}

/// 试卷处理上下文
#[derive(Debug, Clone)]
pub struct ExamCtx {
    /// 试卷索引（从1开始，仅用于日志显示）
    pub exam_index: usize,

    /// 试卷总数
    pub exam_total: usize,

    /// 输出文件名主干
    pub stem: String,
}

impl ExamCtx {
    pub fn new(exam_index: usize, exam_total: usize, stem: String) -> Self {
        Self {
            exam_index,
            exam_total,
            stem,
        }
    }
}

impl Display for ExamCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[试卷 {}/{} {}]",
            self.exam_index, self.exam_total, self.stem
        )
    }
}
