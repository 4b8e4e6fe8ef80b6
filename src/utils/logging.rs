/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug / info。
/// 日志写到 stderr，stdout 留给交互输出。
/// 重复调用不会报错（测试中可能多次初始化）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `model`: 使用的模型名称
/// - `output_dir`: 导出目录
pub fn log_startup(model: &str, output_dir: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 选择题试卷生成器");
    info!("🤖 模型: {}", model);
    info!("📁 导出目录: {}", output_dir);
    info!(
        "🕒 启动时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
}

/// 记录新生成的一页题目
///
/// # 参数
/// - `page_number`: 页码（从 1 开始）
/// - `question_count`: 本页题目数
pub fn log_page_generated(page_number: usize, question_count: usize) {
    info!("\n{}", "─".repeat(60));
    info!("📄 第 {} 页生成完成: {} 道题", page_number, question_count);
    info!("{}", "─".repeat(60));
}

/// 记录导出结果
pub fn log_export(question_count: usize, paper_path: &str, key_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 导出完成: {} 道题", question_count);
    info!("📝 试卷: {}", paper_path);
    info!("🔑 答案: {}", key_path);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("题目解析失败了", 4), "题目解析...");
    }
}
