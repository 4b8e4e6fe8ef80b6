//! 出题流程 - 流程层
//!
//! 流程顺序：
//! 1. 校验请求（主题非空、题目数在 1 到上限之间）
//! 2. 构建提示词 → 调用 LLM
//! 3. 解析题目，一道都没解析出来时把原文交给调用方展示

use anyhow::Result;
use tracing::{info, warn};

use crate::error::GenerationError;
use crate::models::question::QuestionRecord;
use crate::models::request::{GenerationRequest, MAX_QUESTIONS};
use crate::services::llm_service::TextGenerator;
use crate::services::prompt_builder::build_generation_prompt;
use crate::services::question_extractor::extract_questions;
use crate::utils::logging::truncate_text;

/// 出题流程
///
/// - 只编排 "校验 → 提示词 → LLM → 解析"
/// - 不持有会话状态，结果交给调用方写入 Session
pub struct GenerationFlow<G> {
    generator: G,
}

impl<G: TextGenerator> GenerationFlow<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// 生成一页题目
    ///
    /// # 错误
    /// - 请求不合法时返回 [`GenerationError`]，不会调用 LLM
    /// - LLM 调用失败时原样返回
    /// - 解析结果为空时返回 [`GenerationError::NoQuestionsParsed`]，其中带有原文
    pub async fn generate_page(&self, request: &GenerationRequest) -> Result<Vec<QuestionRecord>> {
        validate_request(request)?;

        info!(
            "🤖 正在生成 {} 道题目 (简单 {} / 中等 {} / 困难 {})，主题: {}",
            request.total(),
            request.easy,
            request.medium,
            request.hard,
            request.topics.trim()
        );

        let prompt = build_generation_prompt(request);
        let raw = self.generator.generate(&prompt).await?;

        let records = records_from_response(&raw, request.total())?;
        info!("✓ 解析出 {} 道题目", records.len());
        Ok(records)
    }
}

/// 出题前的请求校验
pub fn validate_request(request: &GenerationRequest) -> Result<(), GenerationError> {
    if !request.has_topics() {
        return Err(GenerationError::EmptyTopics);
    }
    if request.total() == 0 {
        return Err(GenerationError::NoQuestionsRequested);
    }
    if request.total() > MAX_QUESTIONS {
        return Err(GenerationError::TooManyQuestions { max: MAX_QUESTIONS });
    }
    Ok(())
}

/// 解析 LLM 返回内容
///
/// 题目少于请求数量只记警告；一道都没有时视为失败
pub fn records_from_response(
    raw: &str,
    requested: u32,
) -> Result<Vec<QuestionRecord>, GenerationError> {
    let records = extract_questions(raw);

    if records.is_empty() {
        warn!(
            "⚠️ 无法从 LLM 返回内容中解析出题目: {}",
            truncate_text(raw, 200)
        );
        return Err(GenerationError::NoQuestionsParsed {
            raw: raw.to_string(),
        });
    }

    if records.len() < requested as usize {
        warn!(
            "⚠️ 请求 {} 道题，只解析出 {} 道，格式不完整的题目已丢弃",
            requested,
            records.len()
        );
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 固定返回值，并记录被调用的次数
    struct CannedGenerator {
        response: String,
        calls: AtomicUsize,
    }

    impl CannedGenerator {
        fn new(response: &str) -> Self {
            Self {
                response: response.to_string(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl TextGenerator for &CannedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            assert!(prompt.contains("Correct Answer"));
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.response.clone())
        }
    }

    const TWO_QUESTIONS: &str = "**1. What is 2+2?**\nA) 3\nB) 4\nC) 5\nD) 6\n**Correct Answer: B**\n\n\
                                 **2. What is 3+3?**\nA) 6\nB) 7\nC) 8\nD) 9\n**Correct Answer: A**";

    #[tokio::test]
    async fn test_generate_page_parses_response() {
        let generator = CannedGenerator::new(TWO_QUESTIONS);
        let flow = GenerationFlow::new(&generator);

        let records = flow
            .generate_page(&GenerationRequest::new("Arithmetic", 2, 0, 0))
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_request_skips_llm() {
        let generator = CannedGenerator::new(TWO_QUESTIONS);
        let flow = GenerationFlow::new(&generator);

        let err = flow
            .generate_page(&GenerationRequest::new(" , ", 1, 0, 0))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GenerationError>(),
            Some(GenerationError::EmptyTopics)
        ));

        let err = flow
            .generate_page(&GenerationRequest::new("Rust", 0, 0, 0))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GenerationError>(),
            Some(GenerationError::NoQuestionsRequested)
        ));

        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unparseable_response_keeps_raw_text() {
        let generator = CannedGenerator::new("I'm sorry, I can't do that.");
        let flow = GenerationFlow::new(&generator);

        let err = flow
            .generate_page(&GenerationRequest::new("Rust", 1, 0, 0))
            .await
            .unwrap_err();

        match err.downcast_ref::<GenerationError>() {
            Some(GenerationError::NoQuestionsParsed { raw }) => {
                assert_eq!(raw, "I'm sorry, I can't do that.")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_oversized_counts_are_rejected() {
        let err = validate_request(&GenerationRequest::new("Rust", u32::MAX, 1, 0)).unwrap_err();
        assert!(matches!(err, GenerationError::TooManyQuestions { max: MAX_QUESTIONS }));

        let err = validate_request(&GenerationRequest::new("Rust", 60, 41, 0)).unwrap_err();
        assert!(matches!(err, GenerationError::TooManyQuestions { .. }));

        assert!(validate_request(&GenerationRequest::new("Rust", 50, 40, 10)).is_ok());
    }

    #[test]
    fn test_partial_result_is_still_ok() {
        let records = records_from_response(TWO_QUESTIONS, 5).unwrap();
        assert_eq!(records.len(), 2);
    }
}
