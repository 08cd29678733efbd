use crate::error::{AppResult, ConfigError, FileError};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 温度（建议值，模型可忽略）
    pub temperature: f32,
    /// 最大输出 token 数（建议值）
    pub max_output_tokens: u32,
    /// 单次模型调用超时（秒）
    pub request_timeout_secs: u64,
    // --- 抽取配置 ---
    /// 每次调用抽取的题目数量
    pub chunk_size: u32,
    /// 元数据没有给出题目总数时使用的默认值
    pub fallback_total_questions: u32,
    /// 同一份试卷内同时进行的模型调用数
    pub max_concurrent_chunks: usize,
    /// 批量模式下同时处理的试卷数量
    pub max_concurrent_documents: usize,
    /// 输出目录
    pub output_dir: String,
    /// 没有官方答案时是否接受模型推断的答案
    pub accept_model_answers: bool,
    /// 解析失败时是否保存原始响应
    pub persist_raw_responses: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemini-2.0-flash-001".to_string(),
            temperature: 0.1,
            max_output_tokens: 8192,
            request_timeout_secs: 300,
            chunk_size: 10,
            fallback_total_questions: 120,
            max_concurrent_chunks: 3,
            max_concurrent_documents: 2,
            output_dir: "output".to_string(),
            accept_model_answers: false,
            persist_raw_responses: true,
        }
    }
}

impl Config {
    /// 默认配置 + 环境变量覆盖
    pub fn from_env() -> AppResult<Self> {
        Self::default().with_env_overrides()
    }

    /// 加载配置：TOML 文件（可选）→ 环境变量覆盖 → 校验
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let base = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        let config = base.with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件读取配置，未出现的字段使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let path_str = path.display().to_string();
        if !path.exists() {
            return Err(FileError::NotFound { path: path_str }.into());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::error::AppError::file_read_failed(&path_str, e))?;
        let config = toml::from_str(&content).map_err(|source| FileError::TomlParseFailed {
            path: path_str,
            source,
        })?;
        Ok(config)
    }

    fn with_env_overrides(self) -> AppResult<Self> {
        Ok(Self {
            llm_api_key: env_string("LLM_API_KEY").unwrap_or(self.llm_api_key),
            llm_api_base_url: env_string("LLM_API_BASE_URL").unwrap_or(self.llm_api_base_url),
            llm_model_name: env_string("LLM_MODEL_NAME").unwrap_or(self.llm_model_name),
            temperature: env_parse("LLM_TEMPERATURE", "f32")?.unwrap_or(self.temperature),
            max_output_tokens: env_parse("LLM_MAX_OUTPUT_TOKENS", "u32")?
                .unwrap_or(self.max_output_tokens),
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", "u64")?
                .unwrap_or(self.request_timeout_secs),
            chunk_size: env_parse("CHUNK_SIZE", "u32")?.unwrap_or(self.chunk_size),
            fallback_total_questions: env_parse("FALLBACK_TOTAL_QUESTIONS", "u32")?
                .unwrap_or(self.fallback_total_questions),
            max_concurrent_chunks: env_parse("MAX_CONCURRENT_CHUNKS", "usize")?
                .unwrap_or(self.max_concurrent_chunks),
            max_concurrent_documents: env_parse("MAX_CONCURRENT_DOCUMENTS", "usize")?
                .unwrap_or(self.max_concurrent_documents),
            output_dir: env_string("OUTPUT_DIR").unwrap_or(self.output_dir),
            accept_model_answers: env_parse("ACCEPT_MODEL_ANSWERS", "bool")?
                .unwrap_or(self.accept_model_answers),
            persist_raw_responses: env_parse("PERSIST_RAW_RESPONSES", "bool")?
                .unwrap_or(self.persist_raw_responses),
        })
    }

    /// 校验配置值
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("chunk_size", self.chunk_size as u64),
            ("max_concurrent_chunks", self.max_concurrent_chunks as u64),
            ("max_concurrent_documents", self.max_concurrent_documents as u64),
            ("request_timeout_secs", self.request_timeout_secs),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "必须大于 0".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn env_parse<T: FromStr>(name: &str, expected_type: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
        Err(_) => Ok(None),
    }
}
