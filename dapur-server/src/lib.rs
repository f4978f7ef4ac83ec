//! Dapur Server - 餐厅点餐后端
//!
//! # 架构概述
//!
//! 订单创建是核心：一次下单在单个数据库事务内完成校验、定价、扣减库存
//! 与落库，任何一步失败都不会留下部分写入。
//!
//! # 模块结构
//!
//! ```text
//! dapur-server/src/
//! ├── core/          # 配置、状态、错误、HTTP 服务器
//! ├── orders/        # 订单引擎与存储抽象
//! ├── db/            # SQLite 连接池、迁移、仓储、演示数据
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use orders::{OrderEngine, OrderError};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

/// 加载 `.env` 并初始化日志
///
/// 必须在 [`Config::from_env`] 之前调用 `dotenv`，这里只负责日志部分。
pub fn setup_environment(config: &Config) {
    init_logger_with_file(
        Some(&config.log_level),
        config.log_json,
        config.log_dir.as_deref(),
    );
}

pub fn print_banner() {
    println!(
        r#"
    ____
   / __ \____ _____  __  _______
  / / / / __ `/ __ \/ / / / ___/
 / /_/ / /_/ / /_/ / /_/ / /
/_____/\__,_/ .___/\__,_/_/
           /_/
    "#
    );
}
