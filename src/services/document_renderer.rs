//! 文档渲染 - 业务能力层
//!
//! 纯函数：已选题目 + 试卷抬头 → docx 字节。不读写文件，不依赖会话。
//!
//! 先把内容排成 [`DocLine`] 列表，再映射到 `docx-rs` 的段落，
//! 这样排版内容可以脱离 docx 格式单独测试。

use docx_rs::{AlignmentType, Docx, Header, Paragraph, Run};
use std::io::Cursor;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::exam::ExamMetadata;
use crate::models::question::QuestionRecord;

/// 标题字号（半磅）
const HEADING_SIZE: usize = 32;

/// 文档中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocLine {
    /// 大标题
    Heading(String),
    /// 题干，加粗
    Question(String),
    /// 选项
    Option(String),
    /// 正确答案，加粗
    Answer(String),
    /// 普通段落
    Plain(String),
}

/// 渲染结果：试卷 + 答案
#[derive(Debug, Clone)]
pub struct RenderedDocuments {
    pub question_paper: Vec<u8>,
    pub answer_key: Vec<u8>,
}

/// 同时渲染试卷和答案
pub fn render(questions: &[QuestionRecord], metadata: &ExamMetadata) -> AppResult<RenderedDocuments> {
    Ok(RenderedDocuments {
        question_paper: render_question_paper(questions, metadata)?,
        answer_key: render_answer_key(questions)?,
    })
}

/// 渲染试卷，页眉右侧是考试名称、日期、时长
pub fn render_question_paper(
    questions: &[QuestionRecord],
    metadata: &ExamMetadata,
) -> AppResult<Vec<u8>> {
    let mut header = Header::new();
    for line in header_lines(metadata) {
        header = header.add_paragraph(
            Paragraph::new()
                .align(AlignmentType::Right)
                .add_run(Run::new().add_text(line)),
        );
    }

    let docx = to_docx(Docx::new().header(header), &question_paper_lines(questions, metadata));
    debug!("渲染试卷: {} 道题", questions.len());
    pack(docx, "question_paper")
}

/// 渲染答案
pub fn render_answer_key(questions: &[QuestionRecord]) -> AppResult<Vec<u8>> {
    let docx = to_docx(Docx::new(), &answer_key_lines(questions));
    debug!("渲染答案: {} 道题", questions.len());
    pack(docx, "answer_key")
}

/// 页眉文字
pub fn header_lines(metadata: &ExamMetadata) -> Vec<String> {
    vec![
        metadata.exam_name.clone(),
        format!("Date: {}", metadata.date),
        format!("Duration: {} mins", metadata.duration_minutes),
    ]
}

/// 试卷正文，题号按选中顺序重新编排
pub fn question_paper_lines(questions: &[QuestionRecord], metadata: &ExamMetadata) -> Vec<DocLine> {
    let mut lines = Vec::with_capacity(questions.len() * 6);
    for (i, question) in questions.iter().enumerate() {
        lines.push(DocLine::Question(format!(
            "{}. {}",
            i + 1,
            question.stem_without_number()
        )));
        lines.extend(
            question
                .options()
                .iter()
                .map(|option| DocLine::Option(option.to_string())),
        );
        if metadata.show_answers {
            lines.push(DocLine::Answer(format!(
                "Correct Answer: {}",
                question.correct_answer()
            )));
        }
    }
    lines
}

/// 答案正文
pub fn answer_key_lines(questions: &[QuestionRecord]) -> Vec<DocLine> {
    std::iter::once(DocLine::Heading("Answer Key".to_string()))
        .chain(
            questions
                .iter()
                .enumerate()
                .map(|(i, q)| DocLine::Plain(format!("{}. {}", i + 1, q.correct_answer()))),
        )
        .collect()
}

fn to_docx(mut docx: Docx, lines: &[DocLine]) -> Docx {
    for line in lines {
        let paragraph = match line {
            DocLine::Heading(text) => {
                Paragraph::new().add_run(Run::new().add_text(text).bold().size(HEADING_SIZE))
            }
            DocLine::Question(text) | DocLine::Answer(text) => {
                Paragraph::new().add_run(Run::new().add_text(text).bold())
            }
            DocLine::Option(text) | DocLine::Plain(text) => {
                Paragraph::new().add_run(Run::new().add_text(text))
            }
        };
        docx = docx.add_paragraph(paragraph);
    }
    docx
}

fn pack(docx: Docx, document: &'static str) -> AppResult<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| AppError::pack_failed(document, e))?;
    Ok(buffer.into_inner())
}
