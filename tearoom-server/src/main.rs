use tearoom_server::{Config, Server, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 设置环境 (dotenv, 日志)
    setup_environment();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Tearoom server starting...");

    // 2. 加载配置
    let config = Config::from_env()?;

    // 3. 打开数据库并初始化状态
    let server = Server::new(config).await?;

    // 4. 启动 HTTP 服务器
    if let Err(e) = server.run().await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    Ok(())
}
