//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量试卷处理器
//! - 管理应用生命周期（初始化、运行）
//! - 扫描文件夹，配对试卷与答案文件（Vec<ExamJob>）
//! - 控制并发数量（Semaphore）
//! - 输出全局统计信息
//!
//! ### `paper_processor` - 单份试卷处理器
//! - 加载试卷与答案文档
//! - 委托 ExamFlow 完成抽取
//! - 写出 JSON 与复核清单
//! - 输出单份试卷的统计信息
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<ExamJob>)
//!     ↓
//! paper_processor (处理单份 ExamJob)
//!     ↓
//! workflow::ExamFlow (元数据 → 分块 → 答案 → 扁平化)
//!     ↓
//! services (能力层：llm / extractor / warn)
//!     ↓
//! clients + infrastructure (模型网关、文档)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：batch_processor 管批量，paper_processor 管单份
//! 2. **失败隔离**：单份试卷失败只计入统计，不中断批量
//! 3. **向下依赖**：编排层 → workflow → services → clients
//! 4. **无业务逻辑**：只做调度和统计，不做具体业务判断

pub mod batch_processor;
pub mod paper_processor;

// 重新导出主要类型
pub use batch_processor::{discover_jobs, App, BatchStats};
pub use paper_processor::{process_exam, write_records, ExamSummary};
