//! LLM 服务 - 业务能力层
//!
//! 在模型网关之上补齐调用方需要的东西：超时、响应清洗、类型化解析、
//! 解析失败时保存原始响应。不做重试。

use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::clients::sanitizer::parse_model_json;
use crate::clients::{LlmClient, ModelGateway};
use crate::config::Config;
use crate::error::{AppResult, ModelError};
use crate::infrastructure::ExamDocument;
use crate::services::WarnWriter;

/// LLM 服务
#[derive(Clone)]
pub struct LlmService {
    gateway: Arc<dyn ModelGateway>,
    timeout: Duration,
    warn_writer: Option<WarnWriter>,
}

impl LlmService {
    /// 使用 OpenAI 兼容客户端创建
    pub fn new(config: &Config) -> Self {
        Self::with_gateway(Arc::new(LlmClient::new(config)), config)
    }

    /// 使用任意网关实现创建
    pub fn with_gateway(gateway: Arc<dyn ModelGateway>, config: &Config) -> Self {
        let warn_writer = config
            .persist_raw_responses
            .then(|| WarnWriter::new(&config.output_dir));
        Self {
            gateway,
            timeout: Duration::from_secs(config.request_timeout_secs),
            warn_writer,
        }
    }

    pub fn model_name(&self) -> &str {
        self.gateway.model_name()
    }

    /// 调用模型，返回原始文本；超过超时时间视为服务不可用
    pub async fn send_to_llm(&self, document: &ExamDocument, prompt: &str) -> AppResult<String> {
        match tokio::time::timeout(self.timeout, self.gateway.invoke(document, prompt)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "LLM 调用超时 ({} 秒)，文档: {}",
                    self.timeout.as_secs(),
                    document.name()
                );
                Err(ModelError::Timeout {
                    model: self.model_name().to_string(),
                    secs: self.timeout.as_secs(),
                }
                .into())
            }
        }
    }

    /// 调用模型并把响应解析为 `T`
    ///
    /// `label` 标识这次调用（如 `metadata`、`chunk_1_10`），
    /// 用于日志和原始响应的文件名。
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        document: &ExamDocument,
        prompt: &str,
        label: &str,
    ) -> AppResult<T> {
        let raw = self.send_to_llm(document, prompt).await?;
        debug!("[{}] 响应长度: {} 字符", label, raw.len());

        match parse_model_json(&raw, label) {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!("⚠️ [{}] 响应无法解析: {}", label, err);
                self.persist_raw(document, label, &raw).await;
                Err(err.into())
            }
        }
    }

    async fn persist_raw(&self, document: &ExamDocument, label: &str, raw: &str) {
        let Some(writer) = &self.warn_writer else {
            return;
        };
        let stem = document_stem(document);
        match writer.dump_raw_response(&stem, label, raw).await {
            Ok(path) => warn!("原始响应已保存至: {}", path.display()),
            Err(e) => warn!("保存原始响应失败: {}", e),
        }
    }
}

/// 文档名去掉扩展名
pub fn document_stem(document: &ExamDocument) -> String {
    Path::new(document.name())
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| document.name().to_string())
}
