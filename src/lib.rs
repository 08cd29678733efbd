//! # Exam Indexer
//!
//! 把考试 PDF 交给多模态模型，抽取成结构化题库记录的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure / Clients）
//! - `infrastructure/` - `ExamDocument`，持有文档字节
//! - `clients/` - `ModelGateway` 模型网关 + 输出清洗
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `LlmService` - 带超时的模型调用 + JSON 解析
//! - `QuestionExtractor` - 分块抽取题目
//! - `extract_metadata` / `extract_answer_key` - 元数据与官方答案
//! - `WarnWriter` - 写复核清单与原始响应
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一份试卷"的完整处理流程
//! - `ExamCtx` - 上下文封装（试卷序号 + 文件名主干）
//! - `ExamFlow` - 流程编排（元数据 → 分块 → 答案合并 → 共享文本 → ID）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量处理，管理并发
//! - `orchestrator/paper_processor` - 单份试卷处理与落盘
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{LlmClient, ModelGateway};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::ExamDocument;
pub use models::{ExamMetadata, OutputRecord, Question, ReviewFlag};
pub use orchestrator::{process_exam, App};
pub use workflow::{ExamCtx, ExamFlow, ExamJob, ExamResult};
