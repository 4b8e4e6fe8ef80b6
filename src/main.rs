use anyhow::{Context, Result};
use question_paper_generator::orchestrator::App;
use question_paper_generator::utils::logging;
use question_paper_generator::Config;
use std::path::Path;
use tracing::warn;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置（config.toml 可选，环境变量优先）
    let config = Config::load(Some(Path::new("config.toml"))).context("加载配置失败")?;

    // 初始化日志
    logging::init(config.verbose_logging);
    logging::log_startup(&config.llm_model_name, &config.output_dir);

    if !config.has_api_key() {
        warn!("⚠️ 未配置 LLM_API_KEY / GEMINI_API_KEY，generate 命令将不可用");
    }

    // 运行交互会话
    App::from_config(config).run().await?;

    Ok(())
}
