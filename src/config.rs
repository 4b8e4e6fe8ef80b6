use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    // --- LLM 配置 ---
    /// 为空表示未配置，启动时只给出警告
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_temperature: f32,
    /// 导出文档的目录
    pub output_dir: String,
    // --- 试卷抬头默认值 ---
    pub exam_name: String,
    pub exam_duration: String,
    /// 是否在试卷中显示正确答案
    pub show_answers: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemini-2.5-flash".to_string(),
            llm_temperature: 0.7,
            output_dir: "output".to_string(),
            exam_name: "Mid-Term Exam".to_string(),
            exam_duration: "90".to_string(),
            show_answers: false,
            verbose_logging: false,
        }
    }
}

/// config.toml 中允许出现的字段，全部可选
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    llm_api_key: Option<String>,
    llm_api_base_url: Option<String>,
    llm_model_name: Option<String>,
    llm_temperature: Option<f32>,
    output_dir: Option<String>,
    exam_name: Option<String>,
    exam_duration: Option<String>,
    show_answers: Option<bool>,
    verbose_logging: Option<bool>,
}

impl Config {
    /// 加载配置：默认值 → config.toml（若存在）→ 环境变量
    pub fn load(toml_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(path) = toml_path.filter(|p| p.exists()) {
            let content =
                std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
                    path: path.display().to_string(),
                    source,
                })?;
            config = config.merge_toml(&content, &path.display().to_string())?;
        }
        config.apply_env(|name| std::env::var(name).ok())
    }

    /// 只从环境变量加载
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_env(|name| std::env::var(name).ok())
    }

    /// 是否配置了 API key
    pub fn has_api_key(&self) -> bool {
        !self.llm_api_key.trim().is_empty()
    }

    fn merge_toml(mut self, content: &str, path: &str) -> Result<Self, ConfigError> {
        let file: FileConfig =
            toml::from_str(content).map_err(|source| ConfigError::TomlParseFailed {
                path: path.to_string(),
                source,
            })?;

        if let Some(v) = file.llm_api_key {
            self.llm_api_key = v;
        }
        if let Some(v) = file.llm_api_base_url {
            self.llm_api_base_url = v;
        }
        if let Some(v) = file.llm_model_name {
            self.llm_model_name = v;
        }
        if let Some(v) = file.llm_temperature {
            self.llm_temperature = v;
        }
        if let Some(v) = file.output_dir {
            self.output_dir = v;
        }
        if let Some(v) = file.exam_name {
            self.exam_name = v;
        }
        if let Some(v) = file.exam_duration {
            self.exam_duration = v;
        }
        if let Some(v) = file.show_answers {
            self.show_answers = v;
        }
        if let Some(v) = file.verbose_logging {
            self.verbose_logging = v;
        }
        Ok(self)
    }

    /// 用环境变量覆盖配置，`lookup` 便于测试时注入
    fn apply_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(v) = lookup("LLM_API_KEY").or_else(|| lookup("GEMINI_API_KEY")) {
            self.llm_api_key = v;
        }
        if let Some(v) = lookup("LLM_API_BASE_URL") {
            self.llm_api_base_url = v;
        }
        if let Some(v) = lookup("LLM_MODEL_NAME") {
            self.llm_model_name = v;
        }
        if let Some(v) = lookup("LLM_TEMPERATURE") {
            self.llm_temperature = parse_env("LLM_TEMPERATURE", &v, "f32")?;
        }
        if let Some(v) = lookup("OUTPUT_DIR") {
            self.output_dir = v;
        }
        if let Some(v) = lookup("EXAM_NAME") {
            self.exam_name = v;
        }
        if let Some(v) = lookup("EXAM_DURATION") {
            self.exam_duration = v;
        }
        if let Some(v) = lookup("SHOW_ANSWERS") {
            self.show_answers = parse_env("SHOW_ANSWERS", &v, "bool")?;
        }
        if let Some(v) = lookup("VERBOSE_LOGGING") {
            self.verbose_logging = parse_env("VERBOSE_LOGGING", &v, "bool")?;
        }
        Ok(self)
    }
}

fn parse_env<T: std::str::FromStr>(
    var_name: &str,
    value: &str,
    expected_type: &str,
) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value: value.to_string(),
            expected_type: expected_type.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_env_overrides_defaults() {
        let config = Config::default()
            .apply_env(env(&[
                ("LLM_MODEL_NAME", "gemini-2.0-flash"),
                ("SHOW_ANSWERS", "true"),
                ("EXAM_NAME", "Final Exam"),
            ]))
            .unwrap();

        assert_eq!(config.llm_model_name, "gemini-2.0-flash");
        assert!(config.show_answers);
        assert_eq!(config.exam_name, "Final Exam");
        assert_eq!(config.exam_duration, "90");
    }

    #[test]
    fn test_gemini_key_is_fallback() {
        let config = Config::default()
            .apply_env(env(&[("GEMINI_API_KEY", "g-key")]))
            .unwrap();
        assert_eq!(config.llm_api_key, "g-key");

        let config = Config::default()
            .apply_env(env(&[("GEMINI_API_KEY", "g-key"), ("LLM_API_KEY", "l-key")]))
            .unwrap();
        assert_eq!(config.llm_api_key, "l-key");
    }

    #[test]
    fn test_bad_bool_is_error() {
        let err = Config::default()
            .apply_env(env(&[("SHOW_ANSWERS", "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::EnvVarParseFailed { ref var_name, .. } if var_name == "SHOW_ANSWERS"));
    }

    #[test]
    fn test_toml_then_env() {
        let config = Config::default()
            .merge_toml(
                "exam_name = \"Quiz 3\"\nllm_temperature = 0.2\noutput_dir = \"papers\"\n",
                "config.toml",
            )
            .unwrap()
            .apply_env(env(&[("OUTPUT_DIR", "elsewhere")]))
            .unwrap();

        assert_eq!(config.exam_name, "Quiz 3");
        assert!((config.llm_temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.output_dir, "elsewhere");
    }

    #[test]
    fn test_missing_key_detected() {
        assert!(!Config::default().has_api_key());
    }
}
