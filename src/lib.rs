//! Taramen POS backend core
//!
//! Order-and-discount computation engine for a restaurant point of sale,
//! plus the menu bundle composition logic and the catalog persistence
//! both depend on. Transport layers (HTTP, RPC, CLI) live outside this
//! crate and wrap the operations exposed here.
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/      # 配置 (env-driven config)
//! ├── utils/     # logger, time helpers, AppError
//! ├── db/        # SQLite pool + migrations, models, repositories
//! ├── pricing/   # decimal money helpers + discount resolver
//! ├── catalog/   # menu item service + bundle composition
//! ├── orders/    # order builder, mutator, numbering
//! └── reports/   # sales aggregates
//! ```

pub mod catalog;
pub mod core;
pub mod db;
pub mod orders;
pub mod pricing;
pub mod reports;
pub mod utils;

// Re-export 公共类型
pub use core::Config;
pub use db::DbService;
pub use utils::logger::{init_logger, init_logger_with_file};
pub use utils::{AppError, AppResult};
