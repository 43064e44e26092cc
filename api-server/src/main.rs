//! HackMate API 服务入口

use std::sync::Arc;

use anyhow::Context;
use api_server::db::MongoConnector;
use api_server::state::AppState;
use api_server::SERVICE_NAME;
use common::config::{load_dotenv, AppConfig};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 需在日志初始化前加载，RUST_LOG 才能生效
    let dotenv = load_dotenv();

    // 初始化日志追踪
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    match dotenv {
        Ok(Some(path)) => info!(path = %path.display(), "已加载 .env"),
        Ok(None) => {}
        Err(e) => warn!(error = %e, "读取 .env 失败"),
    }

    // 加载配置
    let config = AppConfig::load_with_service(SERVICE_NAME);
    let state = AppState::new(config.clone());

    // 先绑定端口，数据库不可用时健康检查仍可访问
    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("绑定地址失败: {addr}"))?;
    info!(
        service = SERVICE_NAME,
        address = %addr,
        static_root = %config.static_root.display(),
        "API listening on http://localhost:{}",
        config.port
    );

    api_server::serve(listener, state, Arc::new(MongoConnector), shutdown_signal())
        .await
        .context("服务运行失败")?;

    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "无法监听 Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "无法监听 SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("收到 Ctrl-C，正在关闭"),
        _ = terminate => info!("收到 SIGTERM，正在关闭"),
    }
}
