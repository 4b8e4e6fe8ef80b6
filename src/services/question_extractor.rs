//! 题目解析 - 业务能力层
//!
//! 把 LLM 返回的自然语言文本解析成结构化的选择题。
//!
//! 约定格式（LLM 不一定严格遵守）：
//!
//! ```text
//! **1. 题干**
//! A) 选项
//! B) 选项
//! C) 选项
//! D) 选项
//! **Correct Answer: B**
//! ```
//!
//! 容错规则：
//! - 整段文本外包裹的 ``` 代码块标记会先被去掉
//! - 每个加粗编号开头到下一个加粗编号之间算一个题块
//! - 题块内第一个 `Correct Answer:` 是右边界，大小写不敏感
//! - 选项标签 A-D 大小写不敏感；一行一个时后跟 `)`、`.` 或 `:`，
//!   挤在同一行时只认 `)`，避免把 "Vitamin C." 这类正文当成标签
//! - 出现 E) 及以后的选项说明不是四选一，整块丢弃
//! - 任何不完整的题块整块丢弃，不会产生残缺记录，也不会报错
//!
//! 已知限制：题干内部再出现加粗（如 `**1. Which is **not** prime?**`）时，
//! 题干在第一个 `**` 处截断。

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;
use tracing::debug;

use crate::models::question::{OptionLabel, QuestionRecord};

/// 单独成行的代码块标记，如 ``` 或 ```markdown
static FENCE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*```[\w+-]*[ \t]*$\n?").expect("valid regex"));

/// 题块开头：加粗的 "数字. 题干"，题干到第一个 `**` 为止
static OPENING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\*\*[ \t]*(\d+\.\s+.+?)\s*\*\*").expect("valid regex"));

/// 题块结尾：Correct Answer: X，允许加粗、括号
static ANSWER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:\*\*)?[ \t]*correct[ \t]+answer[ \t]*(?:\*\*)?[ \t]*:[ \t]*(?:\*\*)?[ \t]*\(?([a-d])\b",
    )
    .expect("valid regex")
});

/// 行首的选项标签，允许前置缩进、"-"/"*" 列表符号或左括号
static LINE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:[-*][ \t]+)?\(?([a-d])[).:]").expect("valid regex")
});

/// 任意位置的选项标签，前面必须是空白或文本开头，只认 `)`
static INLINE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|\s)\(?([a-d])\)").expect("valid regex"));

/// D 之后的多余选项：行首的 E-H 标签，或行内的 `E)` 形式
static EXTRA_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)(?:^[ \t]*(?:[-*][ \t]+)?\(?[e-h][).:]|(?:^|\s)\(?[e-h]\))(?:\s|$)")
        .expect("valid regex")
});

/// 选项标签在题块中的位置
#[derive(Debug, Clone, Copy)]
struct LabelMatch {
    label: OptionLabel,
    /// 整个标签匹配的起点，即上一个选项文本的终点
    start: usize,
    /// 标签字母本身的位置，用来判断两种匹配是否指向同一个标签
    letter_at: usize,
    /// 选项文本的起点
    end: usize,
}

impl LabelMatch {
    fn from_captures(caps: &Captures<'_>) -> Option<Self> {
        let whole = caps.get(0)?;
        let letter = caps.get(1)?;
        Some(Self {
            label: OptionLabel::parse(letter.as_str())?,
            start: whole.start(),
            letter_at: letter.start(),
            end: whole.end(),
        })
    }
}

/// 从 LLM 原始返回中解析所有完整的题目，保持原文顺序
///
/// 空输入或完全无法识别的输入返回空列表，由调用方决定如何提示用户。
pub fn extract_questions(raw: &str) -> Vec<QuestionRecord> {
    let text = normalize_input(raw);

    let openings: Vec<_> = OPENING.captures_iter(&text).collect();
    let mut records = Vec::with_capacity(openings.len());

    for (i, caps) in openings.iter().enumerate() {
        let (Some(whole), Some(stem)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let body_end = openings
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(text.len(), |m| m.start());
        let body = &text[whole.end()..body_end];

        match parse_block(stem.as_str(), body) {
            Some(record) => records.push(record),
            None => debug!(
                "丢弃不完整的题块 #{}: {}",
                i + 1,
                collapse_whitespace(stem.as_str())
            ),
        }
    }

    debug!(
        "解析完成: 识别到 {} 个题块，得到 {} 道完整题目",
        openings.len(),
        records.len()
    );

    records
}

/// 去掉包裹在外面的代码块标记
///
/// 单独成行的 ``` 连同语言标记整行删除，残留的 ``` 也一并删除。
pub fn strip_code_fences(raw: &str) -> Cow<'_, str> {
    if !raw.contains("```") {
        return Cow::Borrowed(raw);
    }
    let without_lines = FENCE_LINE.replace_all(raw, "");
    Cow::Owned(without_lines.replace("```", ""))
}

fn normalize_input(raw: &str) -> String {
    strip_code_fences(&raw.replace("\r\n", "\n")).into_owned()
}

/// 解析单个题块，`body` 是题干之后到下一个题块之前的文本
fn parse_block(stem: &str, body: &str) -> Option<QuestionRecord> {
    let answer_caps = ANSWER.captures(body)?;
    let answer = OptionLabel::parse(answer_caps.get(1)?.as_str())?;
    let options_region = &body[..answer_caps.get(0)?.start()];

    if EXTRA_LABEL.is_match(options_region) {
        return None;
    }

    let labels = locate_labels(options_region)?;
    let option_texts: [String; 4] = std::array::from_fn(|i| {
        let from = labels[i].end;
        let to = labels.get(i + 1).map_or(options_region.len(), |m| m.start);
        clean_text(&options_region[from..to])
    });

    QuestionRecord::new(clean_text(stem), option_texts, answer)
}

/// 按 A→B→C→D 的顺序找出四个选项标签
///
/// 优先按"一行一个选项"识别；行首标签不是恰好 A、B、C、D 时，
/// 退回到按顺序在全文中查找，但每个行首标签都必须被选中，
/// 否则说明存在重复或乱序的选项，整块丢弃。
fn locate_labels(region: &str) -> Option<[LabelMatch; 4]> {
    let line_labels: Vec<LabelMatch> = LINE_LABEL
        .captures_iter(region)
        .filter_map(|caps| LabelMatch::from_captures(&caps))
        .collect();

    if let Ok(labels) = <[LabelMatch; 4]>::try_from(line_labels.as_slice()) {
        if labels
            .iter()
            .zip(OptionLabel::ALL)
            .all(|(m, expected)| m.label == expected)
        {
            return Some(labels);
        }
    }

    let mut picked: Vec<LabelMatch> = Vec::with_capacity(4);
    for caps in INLINE_LABEL.captures_iter(region) {
        let Some(candidate) = LabelMatch::from_captures(&caps) else {
            continue;
        };
        if candidate.label == OptionLabel::ALL[picked.len()] {
            picked.push(candidate);
            if picked.len() == OptionLabel::ALL.len() {
                break;
            }
        }
    }

    let labels = <[LabelMatch; 4]>::try_from(picked.as_slice()).ok()?;
    let all_line_labels_used = line_labels
        .iter()
        .all(|line| labels.iter().any(|m| m.letter_at == line.letter_at));

    all_line_labels_used.then_some(labels)
}

/// 压缩空白，并去掉整段包裹的加粗标记
fn clean_text(raw: &str) -> String {
    let text = raw.trim();
    let text = match text.strip_prefix("**").and_then(|t| t.strip_suffix("**")) {
        Some(inner) if !inner.trim().is_empty() => inner,
        _ => text,
    };
    collapse_whitespace(text)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
