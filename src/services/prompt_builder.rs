//! 出题提示词

use crate::models::request::GenerationRequest;

/// 系统消息
pub const SYSTEM_MESSAGE: &str =
    "You are an expert question paper creator who writes clear, accurate multiple-choice questions.";

/// 根据主题和难度分布构建出题提示词
///
/// 输出格式必须与 [`crate::services::question_extractor`] 的约定保持一致。
pub fn build_generation_prompt(request: &GenerationRequest) -> String {
    format!(
        r#"Generate a question paper with {total} multiple-choice questions (MCQs) on the following topic(s): {topics}.
The questions should have the following difficulty distribution:
- {easy} easy questions
- {medium} medium questions
- {hard} hard questions

The questions should be a mix of all difficulty levels, not grouped by difficulty.
Do not include difficulty levels like '(Easy)', '(Medium)', or '(Hard)' in the output.

Each question must be a multiple-choice question with four options (A, B, C, D) and a single correct answer.
Ensure the questions are clear, concise, directly related to the specified topics, and that the answers are accurate.

Format the output precisely as follows for each question, with no other text:
**1. [Question text]**
A) [Option A]
B) [Option B]
C) [Option C]
D) [Option D]
**Correct Answer: [Letter of the correct option]**"#,
        total = request.total(),
        topics = request.topics.trim(),
        easy = request.easy,
        medium = request.medium,
        hard = request.hard,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::question_extractor::extract_questions;

    #[test]
    fn test_prompt_contains_counts_and_topics() {
        let request = GenerationRequest::new("  Rust, Ownership ", 2, 1, 4);
        let prompt = build_generation_prompt(&request);

        assert!(prompt.contains("7 multiple-choice questions"));
        assert!(prompt.contains("topic(s): Rust, Ownership."));
        assert!(prompt.contains("- 2 easy questions"));
        assert!(prompt.contains("- 1 medium questions"));
        assert!(prompt.contains("- 4 hard questions"));
    }

    #[test]
    fn test_format_example_matches_extractor_convention() {
        let prompt = build_generation_prompt(&GenerationRequest::default());
        let example = prompt
            .split_once("with no other text:\n")
            .map(|(_, example)| example.replace("[Letter of the correct option]", "A"))
            .unwrap();

        // 填上答案字母后，模板本身就应该能被解析成一道题
        let records = extract_questions(&example);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].question_text(), "1. [Question text]");
        assert_eq!(records[0].options()[2].text, "[Option C]");
    }
}
