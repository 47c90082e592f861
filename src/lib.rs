//! 固定桶数的分离链接哈希表
//!
//! 整数键、字符串值。桶数量在构造时确定，之后不再扩容；冲突的键在同一个桶里
//! 按插入顺序组成单向链。
//!
//! ## 主要特性
//! - 条目集中存放在竞技场中，链接使用索引而非指针
//! - 负键按欧几里得取模定位桶，结果总在 `[0, N)` 内
//! - 查找返回 `Option<&str>`，空字符串值与未命中可区分
//! - 重复键可选择追加 (默认) 或覆盖
//! - 可选的操作统计与Prometheus格式导出
//!
//! ## 快速开始
//!
//! ```rust
//! use chained_hashtable::*;
//!
//! fn main() -> Result<(), TableError> {
//!     // 创建10个桶的哈希表
//!     let mut table = ChainedTable::new(10)?;
//!
//!     // 插入键值对
//!     table.insert(12345, "Alice");
//!     table.insert(67890, "Bob");
//!
//!     // 获取值
//!     assert_eq!(table.get(12345), Some("Alice"));
//!     assert_eq!(table.get(99999), None);
//!
//!     // 删除键
//!     table.remove(12345);
//!     assert_eq!(table.get(12345), None);
//!
//!     println!("{:?}", table.stats());
//!     Ok(())
//! }
//! ```
//!
//! ## 并发
//!
//! 表内部不加锁。修改需要 `&mut self`，跨线程共享时由调用方在整个表外加锁。

#![warn(clippy::all)]
#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        log::info!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        log::warn!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        log::error!($($arg)*)
    };
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {};
}
// 核心模块导出
pub mod error;
pub mod types;
pub mod map;
pub mod memory;
pub mod hash;
pub mod stats;

// 公共接口导出
pub use crate::{
    map::{
        ChainedTable,
        TableConfig,
        TableStats,
        DEFAULT_BUCKET_COUNT,
        DEFAULT_CONFIG
    },
    hash::{
        HashStrategy,
        ModuloStrategy,
        bucket_index,
        default_hash_strategy
    },
    memory::{
        EntryArena,
        ArenaStats
    },
    stats::{
        OperationRecorder,
        OperationStatsSnapshot
    },
    error::TableError,
    types::{Key, Value, DuplicatePolicy, EntryIndex, OperationType}
};

// 便捷功能函数

/// 按给定顺序批量插入，返回插入数量
///
/// 记录加载器在这里把解析出的 (id, name) 逐条交给表。
pub fn batch_insert<V: Into<Value>>(
    table: &mut ChainedTable,
    items: impl IntoIterator<Item = (Key, V)>
) -> usize {
    let mut count = 0;
    for (key, value) in items {
        table.insert(key, value);
        count += 1;
    }
    log_debug!("批量插入 {} 条, 当前大小 {}", count, table.len());
    count
}

/// 批量查询
pub fn batch_get<'a>(
    table: &ChainedTable,
    keys: impl IntoIterator<Item = &'a Key>
) -> Vec<Option<String>> {
    keys.into_iter()
        .map(|&key| table.get(key).map(str::to_owned))
        .collect()
}
