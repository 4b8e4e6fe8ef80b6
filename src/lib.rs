//! # Question Paper Generator
//!
//! 用 LLM 生成单选题，挑选后导出为 Word 试卷和答案
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 数据模型（Models）
//! - `models/` - `QuestionRecord`、`GenerationRequest`、`ExamMetadata`
//! - `QuestionRecord` 构造时保证题干非空、恰好四个选项、答案是 A-D
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，彼此独立
//! - `prompt_builder` - 构建出题提示词
//! - `LlmService` - 调用 LLM 拿回原始文本
//! - `question_extractor` - 从原始文本中解析题目（纯函数）
//! - `document_renderer` - 渲染 docx（纯函数）
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - `GenerationFlow`（校验 → 提示词 → LLM → 解析）
//! - `Session` - 不可变的会话状态，通过 `Action` 更新
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/commands` - 命令解析
//! - `orchestrator/app` - 交互式应用，执行命令并导出文档
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, GenerationError, SessionError};
pub use models::{ExamMetadata, GenerationRequest, OptionLabel, QuestionOption, QuestionRecord};
pub use orchestrator::{App, Command, CommandResult};
pub use services::{extract_questions, LlmService, TextGenerator};
pub use workflow::{Action, GenerationFlow, Session};
