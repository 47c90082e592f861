//! 哈希模块 - 键到桶的映射

pub mod strategy;

pub use strategy::{bucket_index, HashStrategy, ModuloStrategy};

use crate::error::TableError;

/// 默认哈希策略
pub fn default_hash_strategy(bucket_count: usize) -> Result<Box<dyn HashStrategy>, TableError> {
    Ok(Box::new(ModuloStrategy::new(bucket_count)?))
}
