//! 文档加载
//!
//! 把试卷文件读成不透明的二进制内容，交给模型网关使用。

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;
use tokio::fs;
use tracing::debug;

use crate::error::{AppError, AppResult, FileError};

/// 文档类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Pdf,
    Png,
    Jpeg,
}

impl MediaKind {
    /// 按扩展名识别
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "pdf" => Some(MediaKind::Pdf),
            "png" => Some(MediaKind::Png),
            "jpg" | "jpeg" => Some(MediaKind::Jpeg),
            _ => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            MediaKind::Pdf => "application/pdf",
            MediaKind::Png => "image/png",
            MediaKind::Jpeg => "image/jpeg",
        }
    }
}

/// 已加载的试卷文档（不可变）
///
/// 构造时即编码为 data URL，每次模型调用直接复用。
#[derive(Debug, Clone)]
pub struct ExamDocument {
    name: String,
    size: usize,
    data_url: String,
}

impl ExamDocument {
    pub fn new(name: impl Into<String>, media_kind: MediaKind, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: content.len(),
            data_url: format!(
                "data:{};base64,{}",
                media_kind.mime_type(),
                STANDARD.encode(&content)
            ),
        }
    }

    /// 从磁盘读取文档
    pub async fn load(path: &Path) -> AppResult<Self> {
        let path_str = path.display().to_string();
        if !path.exists() {
            return Err(FileError::NotFound { path: path_str }.into());
        }
        let media_kind = MediaKind::from_path(path)
            .ok_or_else(|| FileError::UnsupportedMediaType {
                path: path_str.clone(),
            })?;
        let content = fs::read(path)
            .await
            .map_err(|e| AppError::file_read_failed(&path_str, e))?;

        debug!("已加载文档 {} ({} 字节)", path_str, content.len());

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or(path_str);
        Ok(Self::new(name, media_kind, content))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 原始字节数
    pub fn size(&self) -> usize {
        self.size
    }

    /// `data:<mime>;base64,...` 形式，用于多模态请求
    pub fn data_url(&self) -> &str {
        &self.data_url
    }
}
