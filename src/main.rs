use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use product_demo::app::product::model::Product;
use product_demo::core::repository::EntityStore;
use product_demo::infrastructure::config::{load_config, AppConfig, StoreBackend};
use product_demo::infrastructure::logger::Logger;
use product_demo::{product_repository, router, AppState, MemoryStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, config_path) = load_config().context("加载配置失败")?;

    Logger::init(&config.logging);

    match &config_path {
        Some(path) => info!("从配置文件加载: {}", path.display()),
        None => info!("未找到配置文件，使用默认配置"),
    }

    let store = build_store(&config).await?;
    let state = AppState::new(Arc::new(product_repository(store)));
    let app = router(state);

    let listener = TcpListener::bind(config.http.socket_addr())
        .await
        .with_context(|| format!("无法绑定到 {}", config.http.socket_addr()))?;
    let addr = listener.local_addr()?;

    info!("🚀 产品 API 服务器运行在 http://{}", addr);
    info!("📖 API 端点:");
    info!("   GET    /api/products      - 获取所有产品");
    info!("   POST   /api/products      - 创建新产品");
    info!("   GET    /api/products/:id  - 获取特定产品");
    info!("   PUT    /api/products/:id  - 更新产品");
    info!("   DELETE /api/products/:id  - 删除产品");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("服务器已停止");
    Ok(())
}

async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn EntityStore<Product>>> {
    match config.database.backend {
        StoreBackend::Memory => {
            info!("使用内存存储");
            Ok(Arc::new(MemoryStore::<Product>::new()))
        }
        #[cfg(feature = "database")]
        StoreBackend::Postgres => {
            use product_demo::infrastructure::database::{DatabaseManager, PgProductStore};

            let manager = DatabaseManager::new(&config.database)
                .await
                .context("连接数据库失败")?;
            manager.create_tables().await.context("创建数据表失败")?;
            Ok(Arc::new(PgProductStore::new(manager.get_pool().clone())))
        }
        #[cfg(not(feature = "database"))]
        StoreBackend::Postgres => {
            anyhow::bail!("postgres 后端需要启用 `database` feature")
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("无法监听 Ctrl-C 信号: {}", e);
        std::future::pending::<()>().await;
    }
    info!("收到关闭信号");
}
