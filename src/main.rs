//! 商品目录 HTTP 服务

use catalog::{
    app,
    config::load_config,
    infrastructure::{self, Logger},
    AppState, ProductService,
};
use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "catalog-server", version, about = "商品目录 REST 服务")]
struct Args {
    /// 配置文件路径，默认搜索 config.toml 和 ./config/config.toml
    #[arg(short, long, env = "CATALOG_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    let _log_guard = Logger::init(&config.logging)?;

    let store = infrastructure::connect(&config.store).await?;
    info!("存储后端: {}", store.backend());

    let state = AppState::new(ProductService::new(store));
    let router = app::router(state, &config.http);

    let listener =
        TcpListener::bind((config.http.bind_address.as_str(), config.http.port)).await?;
    info!("🚀 服务器运行在 http://{}", listener.local_addr()?);
    info!("   GET    {}      - 获取所有商品", app::PRODUCTS_PATH);
    info!("   POST   {}      - 创建商品", app::PRODUCTS_PATH);
    info!("   PUT    {}/:id  - 更新商品", app::PRODUCTS_PATH);
    info!("   DELETE {}/:id  - 删除商品", app::PRODUCTS_PATH);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("服务器已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("监听退出信号失败: {}", e);
        std::future::pending::<()>().await;
    }
}
