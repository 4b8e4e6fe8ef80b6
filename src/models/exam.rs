use crate::config::Config;
use serde::Serialize;

/// 试卷抬头信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExamMetadata {
    pub exam_name: String,
    /// 考试时长（分钟），按用户输入原样保留
    pub duration_minutes: String,
    /// YYYY-MM-DD
    pub date: String,
    /// 是否在试卷中直接显示正确答案
    pub show_answers: bool,
}

impl Default for ExamMetadata {
    fn default() -> Self {
        Self {
            exam_name: "Mid-Term Exam".to_string(),
            duration_minutes: "90".to_string(),
            date: today(),
            show_answers: false,
        }
    }
}

impl ExamMetadata {
    /// 用配置中的默认值创建，日期取今天
    pub fn from_config(config: &Config) -> Self {
        Self {
            exam_name: config.exam_name.clone(),
            duration_minutes: config.exam_duration.clone(),
            date: today(),
            show_answers: config.show_answers,
        }
    }
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
