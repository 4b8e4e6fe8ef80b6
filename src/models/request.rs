use serde::{Deserialize, Serialize};

/// 单次请求允许的题目总数上限
pub const MAX_QUESTIONS: u32 = 100;

/// 一次出题请求：主题 + 各难度题目数量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// 逗号分隔的主题
    pub topics: String,
    pub easy: u32,
    pub medium: u32,
    pub hard: u32,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            topics: "Python, Data Structures".to_string(),
            easy: 3,
            medium: 3,
            hard: 2,
        }
    }
}

impl GenerationRequest {
    pub fn new(topics: impl Into<String>, easy: u32, medium: u32, hard: u32) -> Self {
        Self {
            topics: topics.into(),
            easy,
            medium,
            hard,
        }
    }

    /// 题目总数，溢出时取 `u32::MAX`
    pub fn total(&self) -> u32 {
        self.easy.saturating_add(self.medium).saturating_add(self.hard)
    }

    /// 主题是否为空（全是空白或逗号也算空）
    pub fn has_topics(&self) -> bool {
        self.topics.split(',').any(|t| !t.trim().is_empty())
    }
}
