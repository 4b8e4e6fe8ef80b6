//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层是交互会话的"指挥中心"：读入用户命令，调度出题流程，维护会话状态，导出文档。
//!
//! ## 模块划分
//!
//! ### `commands` - 命令解析
//! - 把一行输入解析成 `Command`
//! - 用户编号 1-based，解析后转成 0-based
//!
//! ### `app` - 交互式应用
//! - 持有 `Session` 和 `GenerationFlow`
//! - 执行命令，格式化输出
//! - 导出试卷和答案
//!
//! ## 层次关系
//!
//! ```text
//! app (处理一条 Command)
//!     ↓
//! workflow::GenerationFlow / workflow::Session
//!     ↓
//! services (能力层：prompt / llm / extractor / renderer)
//! ```

pub mod app;
pub mod commands;

pub use app::{App, CommandResult, ANSWER_KEY_FILE, QUESTION_PAPER_FILE};
pub use commands::{parse_command, Command, HELP};
