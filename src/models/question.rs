use serde::{Deserialize, Serialize};
use std::fmt;

/// 选项标签，固定为 A-D
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl OptionLabel {
    /// 按顺序排列的全部标签
    pub const ALL: [OptionLabel; 4] = [
        OptionLabel::A,
        OptionLabel::B,
        OptionLabel::C,
        OptionLabel::D,
    ];

    /// 从字母解析，大小写不敏感
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(OptionLabel::A),
            'B' => Some(OptionLabel::B),
            'C' => Some(OptionLabel::C),
            'D' => Some(OptionLabel::D),
            _ => None,
        }
    }

    /// 从只含一个字母的字符串解析
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            OptionLabel::A => 'A',
            OptionLabel::B => 'B',
            OptionLabel::C => 'C',
            OptionLabel::D => 'D',
        }
    }

    /// 在 A-D 中的位置（0-based）
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// 单个选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionOption {
    pub label: OptionLabel,
    pub text: String,
}

impl fmt::Display for QuestionOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}) {}", self.label, self.text)
    }
}

/// 解析出的一道选择题
///
/// 只能通过 [`QuestionRecord::new`] 构造，构造成功即满足：
/// 题干非空、恰好四个选项且按 A-D 排列、选项文本非空。
/// 正确答案必然对应其中一个选项。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionRecord {
    question_text: String,
    options: [QuestionOption; 4],
    correct_answer: OptionLabel,
}

impl QuestionRecord {
    /// 按 A-D 顺序传入四个选项文本，任何一项为空都返回 `None`
    pub fn new(
        question_text: impl Into<String>,
        option_texts: [String; 4],
        correct_answer: OptionLabel,
    ) -> Option<Self> {
        let question_text = question_text.into();
        if question_text.trim().is_empty() || option_texts.iter().any(|t| t.trim().is_empty()) {
            return None;
        }

        let [a, b, c, d] = option_texts;
        let options = [
            QuestionOption { label: OptionLabel::A, text: a },
            QuestionOption { label: OptionLabel::B, text: b },
            QuestionOption { label: OptionLabel::C, text: c },
            QuestionOption { label: OptionLabel::D, text: d },
        ];

        Some(Self {
            question_text,
            options,
            correct_answer,
        })
    }

    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    pub fn options(&self) -> &[QuestionOption; 4] {
        &self.options
    }

    pub fn correct_answer(&self) -> OptionLabel {
        self.correct_answer
    }

    /// 正确选项的文本
    pub fn correct_option(&self) -> &QuestionOption {
        &self.options[self.correct_answer.index()]
    }

    /// 去掉模型自带的 "1. " 编号后的题干，导出时按选中顺序重新编号
    pub fn stem_without_number(&self) -> &str {
        let text = self.question_text.trim_start();
        let digits = text.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits > 0 {
            if let Some(rest) = text[digits..].strip_prefix('.') {
                if rest.starts_with(char::is_whitespace) && !rest.trim().is_empty() {
                    return rest.trim_start();
                }
            }
        }
        text
    }
}

impl fmt::Display for QuestionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.question_text)?;
        for option in &self.options {
            writeln!(f, "{}", option)?;
        }
        write!(f, "Correct Answer: {}", self.correct_answer)
    }
}
