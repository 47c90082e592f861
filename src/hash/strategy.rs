//! 哈希策略模块 - 定义桶定位策略

use crate::{error::TableError, types::Key};
use std::num::NonZeroUsize;

/// 哈希策略特征
pub trait HashStrategy: Send + Sync {
    /// 获取键对应的桶位置，结果总在 `[0, bucket_count)` 内
    fn locate_bucket(&self, key: Key) -> usize;

    /// 获取桶数量
    fn bucket_count(&self) -> usize;
}

/// 取模哈希策略
///
/// 使用欧几里得取模，负键同样落在 `[0, N)` 内：N = 10 时 `-1 -> 9`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuloStrategy {
    bucket_count: NonZeroUsize,
}

impl ModuloStrategy {
    /// 创建新策略，桶数量为 0 时返回错误
    pub fn new(bucket_count: usize) -> Result<Self, TableError> {
        NonZeroUsize::new(bucket_count)
            .map(|bucket_count| Self { bucket_count })
            .ok_or(TableError::InvalidBucketCount { requested: 0 })
    }
}

impl HashStrategy for ModuloStrategy {
    fn locate_bucket(&self, key: Key) -> usize {
        bucket_index(key, self.bucket_count)
    }

    fn bucket_count(&self) -> usize {
        self.bucket_count.get()
    }
}

/// 计算键所在的桶
///
/// 在 i128 上取模，任何 usize 桶数量都不会溢出。
pub fn bucket_index(key: Key, bucket_count: NonZeroUsize) -> usize {
    let n = bucket_count.get() as i128;
    (key as i128).rem_euclid(n) as usize
}
