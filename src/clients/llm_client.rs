//! 模型网关
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 兼容 OpenAI API 的服务（Gemini 的兼容端点、Azure 等）
//! - 文档以 base64 data URL 的形式附在用户消息里

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
        ChatCompletionRequestMessageContentPartText, ChatCompletionRequestUserMessageArgs,
        ChatCompletionRequestUserMessageContent, ChatCompletionRequestUserMessageContentPart,
        CreateChatCompletionRequestArgs, ImageDetail, ImageUrl,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, ModelError};
use crate::infrastructure::ExamDocument;

/// 模型能力："给一份文档和一段指令，返回文本"
///
/// 实现方只负责传输，不做重试，也不解析响应。
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// 模型名称（用于日志和错误信息）
    fn model_name(&self) -> &str;

    /// 发送文档和指令，返回原始响应文本
    async fn invoke(&self, document: &ExamDocument, prompt: &str) -> AppResult<String>;
}

/// 基于 OpenAI 兼容接口的网关
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    model_name: String,
    temperature: f32,
    max_output_tokens: u32,
}

impl LlmClient {
    /// 创建新的 LLM 客户端
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        }
    }

    fn build_request(
        &self,
        document: &ExamDocument,
        prompt: &str,
    ) -> Result<async_openai::types::chat::CreateChatCompletionRequest, async_openai::error::OpenAIError>
    {
        let content_parts = vec![
            ChatCompletionRequestUserMessageContentPart::Text(
                ChatCompletionRequestMessageContentPartText {
                    text: prompt.to_string(),
                },
            ),
            ChatCompletionRequestUserMessageContentPart::ImageUrl(
                ChatCompletionRequestMessageContentPartImage {
                    image_url: ImageUrl {
                        url: document.data_url().to_string(),
                        detail: Some(ImageDetail::High),
                    },
                },
            ),
        ];

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(ChatCompletionRequestUserMessageContent::Array(content_parts))
            .build()?;

        CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
            .temperature(self.temperature)
            .max_tokens(self.max_output_tokens)
            .build()
    }
}

#[async_trait]
impl ModelGateway for LlmClient {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn invoke(&self, document: &ExamDocument, prompt: &str) -> AppResult<String> {
        debug!(
            "调用 LLM API，模型: {}，文档: {} ({} 字节)，指令长度: {} 字符",
            self.model_name,
            document.name(),
            document.size(),
            prompt.len()
        );

        let request = self
            .build_request(document, prompt)
            .map_err(|e| AppError::model_unavailable(&self.model_name, e))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::model_unavailable(&self.model_name, e)
        })?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ModelError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        debug!("LLM API 调用成功，响应长度: {} 字符", content.len());

        Ok(content)
    }
}
