use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 出题流程错误
    #[error("出题错误: {0}")]
    Generation(#[from] GenerationError),
    /// 会话状态错误
    #[error("会话错误: {0}")]
    Session(#[from] SessionError),
    /// 文档渲染错误
    #[error("文档错误: {0}")]
    Render(#[from] RenderError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("配置文件解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 出题流程错误
#[derive(Debug, Error)]
pub enum GenerationError {
    /// 未配置 API key
    #[error("未配置 LLM API key，请设置 LLM_API_KEY 或 GEMINI_API_KEY")]
    MissingApiKey,
    /// 主题为空
    #[error("请至少输入一个主题")]
    EmptyTopics,
    /// 题目总数为 0
    #[error("请至少指定一道题目")]
    NoQuestionsRequested,
    /// 题目总数超过上限
    #[error("单次最多生成 {max} 道题目")]
    TooManyQuestions { max: u32 },
    /// LLM 返回了内容，但一道题都没解析出来
    #[error("无法从 LLM 返回内容中解析出题目 (共 {} 字符)", .raw.chars().count())]
    NoQuestionsParsed { raw: String },
}

/// 会话状态错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// 页码超出范围
    #[error("第 {page} 页不存在 (共 {page_count} 页)")]
    PageOutOfRange { page: usize, page_count: usize },
    /// 题目索引超出范围
    #[error("第 {page} 页没有第 {index} 题 (共 {len} 题)")]
    QuestionOutOfRange {
        page: usize,
        index: usize,
        len: usize,
    },
    /// 已选题目位置超出范围
    #[error("已选列表中没有位置 {position} (共 {len} 题)")]
    SelectionOutOfRange { position: usize, len: usize },
    /// 空页面
    #[error("不能添加空的题目页")]
    EmptyPage,
}

/// 文档渲染错误
#[derive(Debug, Error)]
pub enum RenderError {
    /// 打包 docx 失败
    #[error("打包 {document} 失败: {source}")]
    PackFailed {
        document: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 创建目录失败
    #[error("创建目录失败 ({path}): {source}")]
    CreateDirFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建打包失败错误
    pub fn pack_failed(
        document: &'static str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Render(RenderError::PackFailed {
            document,
            source: Box::new(source),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
