use anyhow::Result;
use gradewise::orchestrator::{App, Command};
use gradewise::utils::logging;
use gradewise::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    let command = Command::parse(std::env::args().skip(1))?;

    // 初始化并运行应用
    App::initialize(config)?.run(command).await?;

    Ok(())
}
