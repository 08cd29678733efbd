//! 错误类型
//!
//! 只有"会让某一次调用失败"的情况才是错误。
//! 越界题号、缺失答案等非致命问题见 [`crate::models::ReviewFlag`]。

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 模型调用错误
    #[error("模型错误: {0}")]
    Model(#[from] ModelError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 并发控制错误（信号量已关闭）
    #[error("并发控制错误: {0}")]
    Concurrency(#[from] tokio::sync::AcquireError),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 不支持的文档类型
    #[error("不支持的文档类型: {path}")]
    UnsupportedMediaType { path: String },
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 输出序列化失败
    #[error("输出序列化失败 ({path}): {source}")]
    SerializeFailed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 模型调用错误
#[derive(Debug, Error)]
pub enum ModelError {
    /// 模型服务不可用（网络或服务端错误）
    #[error("模型服务不可用 (模型: {model}): {message}")]
    Unavailable { model: String, message: String },
    /// 调用超时
    #[error("模型调用超时 (模型: {model}, {secs} 秒)")]
    Timeout { model: String, secs: u64 },
    /// 返回内容为空
    #[error("模型返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
    /// 清洗后仍无法解析为 JSON
    #[error("模型输出无法解析 ({label}): {source}")]
    MalformedOutput {
        label: String,
        raw: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ModelError {
    /// 是否属于"服务不可用"一类（传输失败、超时、空响应）
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, ModelError::MalformedOutput { .. })
    }
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置值不合法
    #[error("配置项 {field} 不合法: {reason}")]
    InvalidValue { field: String, reason: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建模型不可用错误
    pub fn model_unavailable(model: impl Into<String>, message: impl std::fmt::Display) -> Self {
        AppError::Model(ModelError::Unavailable {
            model: model.into(),
            message: message.to_string(),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 模型层错误的引用（其它错误返回 None）
    pub fn as_model_error(&self) -> Option<&ModelError> {
        match self {
            AppError::Model(e) => Some(e),
            _ => None,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_error_classification() {
        let err = ModelError::Timeout {
            model: "m".to_string(),
            secs: 3,
        };
        assert!(err.is_unavailable());

        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ModelError::MalformedOutput {
            label: "chunk_1_10".to_string(),
            raw: "{".to_string(),
            source,
        };
        assert!(!err.is_unavailable());
    }

    #[test]
    fn test_app_error_display_wraps_inner() {
        let err = AppError::model_unavailable("gemini", "connection reset");
        let text = err.to_string();
        assert!(text.contains("gemini"));
        assert!(text.contains("connection reset"));
        assert!(err.as_model_error().is_some());
    }

    #[tokio::test]
    async fn test_closed_semaphore_is_concurrency_error() {
        let semaphore = tokio::sync::Semaphore::new(1);
        semaphore.close();
        let err: AppError = semaphore.acquire().await.unwrap_err().into();
        assert!(matches!(err, AppError::Concurrency(_)));
        assert!(err.as_model_error().is_none());
    }
}
