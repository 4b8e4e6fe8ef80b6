//! 交互式应用 - 编排层
//!
//! ## 职责
//!
//! - 持有会话状态（[`Session`]）和出题流程（[`GenerationFlow`]）
//! - 把命令翻译成会话动作，把结果格式化成给用户看的文本
//! - 导出时渲染文档并写入磁盘
//!
//! 会话本身是不可变值，每个命令成功后整体替换；命令失败时状态保持不变。

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, FileError, GenerationError, SessionError};
use crate::models::exam::ExamMetadata;
use crate::models::request::GenerationRequest;
use crate::orchestrator::commands::{parse_command, Command, HELP};
use crate::services::document_renderer::render;
use crate::services::llm_service::{LlmService, TextGenerator};
use crate::utils::logging::{log_export, log_page_generated};
use crate::workflow::generation_flow::GenerationFlow;
use crate::workflow::session::{Action, Session};

pub const QUESTION_PAPER_FILE: &str = "question_paper.docx";
pub const ANSWER_KEY_FILE: &str = "answer_key.docx";

/// 命令执行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// 成功，可能带有要显示的文本
    Ok(Option<String>),
    /// 失败，状态未改变
    Error(String),
    Quit,
}

/// 应用主结构
pub struct App<G> {
    config: Config,
    flow: GenerationFlow<G>,
    session: Session,
    last_request: GenerationRequest,
}

impl App<LlmService> {
    /// 使用真实 LLM 服务创建应用
    pub fn from_config(config: Config) -> Self {
        let service = LlmService::new(&config);
        Self::new(config, service)
    }
}

impl<G: TextGenerator> App<G> {
    pub fn new(config: Config, generator: G) -> Self {
        let session = Session::new(ExamMetadata::from_config(&config));
        Self {
            config,
            flow: GenerationFlow::new(generator),
            session,
            last_request: GenerationRequest::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// 读取标准输入，逐行执行命令，直到 `quit` 或输入结束
    pub async fn run(&mut self) -> Result<()> {
        println!("{}", HELP);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await.context("读取标准输入失败")? else {
                break;
            };

            match self.handle_line(&line).await {
                CommandResult::Ok(Some(output)) => println!("{}", output),
                CommandResult::Ok(None) => {}
                CommandResult::Error(message) => println!("❌ {}", message),
                CommandResult::Quit => break,
            }
        }

        info!("👋 会话结束，已选 {} 道题", self.session.selected().len());
        Ok(())
    }

    /// 解析并执行一行输入
    pub async fn handle_line(&mut self, line: &str) -> CommandResult {
        match parse_command(line) {
            Ok(Some(command)) => self.handle(command).await,
            Ok(None) => CommandResult::Ok(None),
            Err(message) => CommandResult::Error(message),
        }
    }

    /// 执行一条命令
    pub async fn handle(&mut self, command: Command) -> CommandResult {
        let page = self.session.current_page();

        match command {
            Command::Generate(request) => self.generate(request).await,
            Command::Topics(topics) => {
                self.last_request.topics = topics;
                CommandResult::Ok(Some(format!(
                    "Topics: {} (easy {} / medium {} / hard {})",
                    self.last_request.topics,
                    self.last_request.easy,
                    self.last_request.medium,
                    self.last_request.hard
                )))
            }
            Command::NextPage => self.apply_and_show(Action::NextPage),
            Command::PrevPage => self.apply_and_show(Action::PrevPage),
            Command::GoToPage(target) => self.apply_and_show(Action::GoToPage(target)),
            Command::Show => CommandResult::Ok(Some(self.page_view())),
            Command::Add(index) => self.apply_and_show(Action::Select { page, index }),
            Command::Undo(index) => self.apply_and_show(Action::Deselect { page, index }),
            Command::Selected => CommandResult::Ok(Some(self.selected_view())),
            Command::Remove(position) => self.apply_and_list(Action::RemoveSelected(position)),
            Command::Move { from, to } => self.apply_and_list(Action::MoveSelected { from, to }),
            Command::Clear => self.apply_with_message(Action::ClearSelection, "Selection cleared."),
            Command::ShowAnswers(show) => {
                let message = if show {
                    "Correct answers will be shown in the question paper."
                } else {
                    "Correct answers will be hidden in the question paper."
                };
                self.apply_with_message(Action::SetShowAnswers(show), message)
            }
            Command::ExamName(name) => {
                let message = format!("Exam name: {}", name);
                self.apply_with_message(Action::SetExamName(name), &message)
            }
            Command::Duration(duration) => {
                let message = format!("Duration: {} mins", duration);
                self.apply_with_message(Action::SetDuration(duration), &message)
            }
            Command::Date(date) => {
                let message = format!("Date: {}", date);
                self.apply_with_message(Action::SetDate(date), &message)
            }
            Command::Export(dir) => {
                let dir = dir.unwrap_or_else(|| PathBuf::from(&self.config.output_dir));
                self.export_command(&dir).await
            }
            Command::Help => CommandResult::Ok(Some(HELP.to_string())),
            Command::Quit => CommandResult::Quit,
        }
    }

    // ========== 命令实现 ==========

    async fn generate(&mut self, request: Option<GenerationRequest>) -> CommandResult {
        let request = request.unwrap_or_else(|| self.last_request.clone());

        let records = match self.flow.generate_page(&request).await {
            Ok(records) => records,
            Err(e) => {
                warn!("⚠️ 出题失败: {}", e);
                return match e.downcast_ref::<GenerationError>() {
                    Some(GenerationError::NoQuestionsParsed { raw }) => CommandResult::Error(
                        format!("{}\n--- LLM response ---\n{}", e, raw),
                    ),
                    _ => CommandResult::Error(e.to_string()),
                };
            }
        };

        let count = records.len();
        match self.apply(Action::AddPage(records)) {
            Ok(()) => {
                self.last_request = request;
                log_page_generated(self.session.page_count(), count);
                CommandResult::Ok(Some(self.page_view()))
            }
            Err(e) => CommandResult::Error(e.to_string()),
        }
    }

    async fn export_command(&self, dir: &Path) -> CommandResult {
        if self.session.selected().is_empty() {
            return CommandResult::Error(
                "No questions selected. Use 'add N' to add questions first.".to_string(),
            );
        }

        match self.export(dir).await {
            Ok((paper, key)) => CommandResult::Ok(Some(format!(
                "Exported {} questions:\n  {}\n  {}",
                self.session.selected().len(),
                paper.display(),
                key.display()
            ))),
            Err(e) => CommandResult::Error(e.to_string()),
        }
    }

    /// 渲染已选题目并写入 `dir`，返回试卷和答案的路径
    pub async fn export(&self, dir: &Path) -> AppResult<(PathBuf, PathBuf)> {
        let records = self.session.selected_records();
        let documents = render(&records, self.session.metadata())?;

        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            AppError::File(FileError::CreateDirFailed {
                path: dir.display().to_string(),
                source: e,
            })
        })?;

        let paper_path = dir.join(QUESTION_PAPER_FILE);
        write_file(&paper_path, &documents.question_paper).await?;

        let key_path = dir.join(ANSWER_KEY_FILE);
        write_file(&key_path, &documents.answer_key).await?;

        log_export(
            records.len(),
            &paper_path.display().to_string(),
            &key_path.display().to_string(),
        );
        Ok((paper_path, key_path))
    }

    // ========== 会话更新 ==========

    fn apply(&mut self, action: Action) -> Result<(), SessionError> {
        self.session = self.session.apply(action)?;
        Ok(())
    }

    fn apply_and_show(&mut self, action: Action) -> CommandResult {
        match self.apply(action) {
            Ok(()) => CommandResult::Ok(Some(self.page_view())),
            Err(e) => CommandResult::Error(e.to_string()),
        }
    }

    fn apply_and_list(&mut self, action: Action) -> CommandResult {
        match self.apply(action) {
            Ok(()) => CommandResult::Ok(Some(self.selected_view())),
            Err(e) => CommandResult::Error(e.to_string()),
        }
    }

    fn apply_with_message(&mut self, action: Action, message: &str) -> CommandResult {
        match self.apply(action) {
            Ok(()) => CommandResult::Ok(Some(message.to_string())),
            Err(e) => CommandResult::Error(e.to_string()),
        }
    }

    // ========== 显示 ==========

    /// 当前页题目，已加入试卷的题目带 `[added]` 标记
    fn page_view(&self) -> String {
        if self.session.page_count() == 0 {
            return "No questions yet. Use 'generate' to create a page.".to_string();
        }

        let page = self.session.current_page();
        let mut out = format!("Page {}/{}", page + 1, self.session.page_count());
        for (index, record) in self.session.current_records().iter().enumerate() {
            let marker = if self.session.is_selected(page, index) {
                "[added]"
            } else {
                "[     ]"
            };
            out.push_str(&format!("\n\n{} #{} {}", marker, index + 1, record.question_text()));
            for option in record.options() {
                out.push_str(&format!("\n    {}", option));
            }
            out.push_str(&format!("\n    Correct Answer: {}", record.correct_answer()));
        }
        out
    }

    fn selected_view(&self) -> String {
        let selected = self.session.selected();
        if selected.is_empty() {
            return "No questions selected.".to_string();
        }

        let mut out = format!("Selected questions ({}):", selected.len());
        for (position, item) in selected.iter().enumerate() {
            out.push_str(&format!(
                "\n  {}. {} (page {}, #{})",
                position + 1,
                item.record.stem_without_number(),
                item.page + 1,
                item.index + 1
            ));
        }
        out
    }
}

async fn write_file(path: &Path, bytes: &[u8]) -> AppResult<()> {
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))
}
