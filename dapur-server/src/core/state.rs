use std::path::Path;
use std::time::Instant;

use sqlx::SqlitePool;

use crate::core::{Config, Result, ServerError};
use crate::db::{DbService, seed};
use crate::orders::OrderEngine;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 克隆成本极低 (连接池与订单引擎内部均为 Arc)。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | 数据库连接池 |
/// | orders | OrderEngine | 订单引擎 |
/// | started_at | Instant | 启动时间 (健康检查) |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub orders: OrderEngine,
    pub started_at: Instant,
}

impl ServerState {
    pub fn new(config: Config, pool: SqlitePool, orders: OrderEngine) -> Self {
        Self {
            config,
            pool,
            orders,
            started_at: Instant::now(),
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 创建工作目录
    /// 2. 打开数据库并执行迁移
    /// 3. 写入演示数据 (可选)
    /// 4. 构建订单引擎
    pub async fn initialize(config: &Config) -> Result<Self> {
        if config.is_production() && config.seed_demo_data {
            return Err(ServerError::Config(
                "SEED_DEMO_DATA must not be enabled in production".into(),
            ));
        }

        std::fs::create_dir_all(&config.work_dir)?;
        if let Some(parent) = Path::new(&config.database_path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let db = DbService::new(&config.database_path, config.db_options()).await?;

        if config.seed_demo_data {
            seed::seed_demo_data(&db.pool)
                .await
                .map_err(shared::error::AppError::from)?;
        }

        let orders = OrderEngine::from_store(db.store());
        Ok(Self::new(config.clone(), db.pool, orders))
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
