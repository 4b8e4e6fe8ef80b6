//! LLM 服务 - 业务能力层
//!
//! 只负责"把提示词发给 LLM 并拿回文本"，不关心解析和会话
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 默认走 Gemini 的 OpenAI 兼容端点，也可以换成任何兼容 OpenAI API 的服务

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use std::future::Future;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::GenerationError;
use crate::services::prompt_builder::SYSTEM_MESSAGE;

/// 文本生成能力
///
/// 出题流程只依赖这个 trait，测试时可以换成固定返回值的实现
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}

/// LLM 服务
///
/// 职责：
/// - 调用兼容 OpenAI 的 chat completion 接口
/// - 不做重试，失败直接返回错误
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
    temperature: f32,
    has_api_key: bool,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
            temperature: config.llm_temperature,
            has_api_key: config.has_api_key(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 通用的 LLM 调用函数
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（已去掉首尾空白）
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> Result<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(self.temperature)
            .build()?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            anyhow::anyhow!("LLM API 调用失败 (模型: {}): {}", self.model_name, e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .ok_or_else(|| anyhow::anyhow!("LLM 返回结果为空 (模型: {})", self.model_name))?
            .message
            .content
            .clone()
            .ok_or_else(|| anyhow::anyhow!("LLM 返回内容为空 (模型: {})", self.model_name))?;

        Ok(content.trim().to_string())
    }
}

impl TextGenerator for LlmService {
    async fn generate(&self, prompt: &str) -> Result<String> {
        if !self.has_api_key {
            return Err(GenerationError::MissingApiKey.into());
        }
        self.send_to_llm(prompt, Some(SYSTEM_MESSAGE)).await
    }
}
