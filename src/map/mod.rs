//! 哈希表核心模块 - 实现分离链接哈希表及其链操作

pub mod chain;
pub mod chained_map;

pub use chained_map::{ChainedTable, TableConfig, TableStats};

use once_cell::sync::Lazy;

/// 全局默认配置
pub static DEFAULT_CONFIG: Lazy<TableConfig> = Lazy::new(TableConfig::default);

/// 默认桶数量
pub const DEFAULT_BUCKET_COUNT: usize = 10;
