//! 分离链接哈希表核心实现
//!
//! 桶数量在构造时确定且之后不变。每个桶保存链头索引，条目存放在
//! [`EntryArena`] 中并以索引链接后继。新条目总是追加到链尾，所以链的
//! 遍历顺序就是插入顺序。
//!
//! 表本身不加锁：修改操作都需要 `&mut self`，需要跨线程共享时由调用方
//! 在整个表外加锁。

use crate::{
    error::TableError,
    hash::{default_hash_strategy, HashStrategy},
    map::{chain, DEFAULT_BUCKET_COUNT},
    memory::{ArenaStats, Entry, EntryArena},
    stats::{create_recorder, OperationRecorder, OperationStatsSnapshot},
    types::{DuplicatePolicy, EntryIndex, Key, OperationType, Value},
};
use std::{fmt, sync::Arc};

/// 哈希表配置
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableConfig {
    /// 桶数量，必须 >= 1
    pub bucket_count: usize,
    pub duplicate_policy: DuplicatePolicy,
    pub enable_stats: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            bucket_count: DEFAULT_BUCKET_COUNT,
            duplicate_policy: DuplicatePolicy::Append,
            enable_stats: true,
        }
    }
}

impl TableConfig {
    /// 使用指定桶数量的默认配置
    pub fn with_bucket_count(bucket_count: usize) -> Self {
        Self {
            bucket_count,
            ..Self::default()
        }
    }

    /// 设置重复键策略
    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// 开关统计
    pub fn enable_stats(mut self, enabled: bool) -> Self {
        self.enable_stats = enabled;
        self
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), TableError> {
        if self.bucket_count == 0 {
            return Err(TableError::InvalidBucketCount { requested: 0 });
        }
        let max_buckets = isize::MAX as usize / std::mem::size_of::<Option<EntryIndex>>();
        if self.bucket_count > max_buckets {
            return Err(TableError::InvalidConfig {
                reason: format!("bucket_count {} exceeds {}", self.bucket_count, max_buckets),
            });
        }
        Ok(())
    }
}

/// 哈希表统计信息
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TableStats {
    pub size: usize,
    pub bucket_count: usize,
    pub load_factor: f32,
    pub empty_buckets: usize,
    pub longest_chain: usize,
    pub arena: ArenaStats,
    pub operations: OperationStatsSnapshot,
}

/// 固定桶数的分离链接哈希表
pub struct ChainedTable {
    // 每个桶的链头
    buckets: Vec<Option<EntryIndex>>,

    // 条目存储
    arena: EntryArena,

    // 桶定位
    hasher: Box<dyn HashStrategy>,

    config: TableConfig,

    // 操作统计
    stats: Arc<dyn OperationRecorder>,
}

impl ChainedTable {
    /// 创建指定桶数量的哈希表
    ///
    /// 桶数量为 0 时返回 [`TableError::InvalidBucketCount`]。
    pub fn new(bucket_count: usize) -> Result<Self, TableError> {
        Self::with_config(TableConfig::with_bucket_count(bucket_count))
    }

    /// 从有符号桶数量创建，<= 0 时返回错误
    pub fn try_from_signed(bucket_count: i64) -> Result<Self, TableError> {
        if bucket_count <= 0 {
            log_warn!("拒绝非正桶数量: {}", bucket_count);
            return Err(TableError::InvalidBucketCount { requested: bucket_count });
        }
        let bucket_count = usize::try_from(bucket_count).map_err(|_| TableError::InvalidConfig {
            reason: format!("bucket_count {} does not fit in usize", bucket_count),
        })?;
        Self::new(bucket_count)
    }

    /// 使用完整配置创建
    pub fn with_config(config: TableConfig) -> Result<Self, TableError> {
        if let Err(e) = config.validate() {
            log_warn!("无效的哈希表配置 {:?}: {}", config, e);
            return Err(e);
        }
        let hasher = default_hash_strategy(config.bucket_count)?;

        let mut buckets: Vec<Option<EntryIndex>> = Vec::new();
        if let Err(e) = buckets.try_reserve_exact(config.bucket_count) {
            log_warn!("桶数组分配失败 (bucket_count={}): {}", config.bucket_count, e);
            return Err(TableError::InvalidConfig {
                reason: format!("cannot allocate {} buckets: {}", config.bucket_count, e),
            });
        }
        buckets.resize(config.bucket_count, None);

        log_info!(
            "创建哈希表: bucket_count={}, duplicate_policy={:?}",
            config.bucket_count,
            config.duplicate_policy
        );

        Ok(Self {
            buckets,
            arena: EntryArena::new(),
            hasher,
            stats: create_recorder(config.enable_stats),
            config,
        })
    }

    /// 插入键值对
    ///
    /// `Append` 策略下不检查重复键，新条目追加到链尾；`Overwrite` 策略下
    /// 若链中已有该键则原地替换其值。
    pub fn insert(&mut self, key: Key, value: impl Into<Value>) {
        let value = value.into();
        let index = self.hasher.locate_bucket(key);

        let Some(head) = self.buckets[index] else {
            let idx = self.arena.alloc(Entry::new(key, value));
            self.buckets[index] = Some(idx);
            self.stats.record(OperationType::Insert, false);
            return;
        };

        // 只有链中存在其他键时才算冲突
        let mut distinct = false;
        let search = match self.config.duplicate_policy {
            DuplicatePolicy::Append => chain::search_by(&self.arena, Some(head), |entry| {
                distinct |= entry.key != key;
                false
            }),
            DuplicatePolicy::Overwrite => chain::search_by(&self.arena, Some(head), |entry| {
                distinct |= entry.key != key;
                entry.key == key
            }),
        };
        self.stats.record_chain_steps(search.steps);

        if let Some(m) = search.found {
            // Overwrite 下键唯一，匹配之后的条目都是其他键
            if distinct || self.arena[m.current].next.is_some() {
                self.stats.record_collision();
            }
            log_debug!("覆盖键 {} 的值 (桶 {})", key, index);
            self.arena[m.current].value = value;
            self.stats.record(OperationType::Insert, true);
            return;
        }

        if distinct {
            self.stats.record_collision();
            log_debug!("桶 {} 冲突, 键 {} 追加到链尾 (链长 {})", index, key, search.steps + 1);
        }

        // 非空链必有链尾
        let tail = search.last.unwrap_or(head);
        let idx = self.arena.alloc(Entry::new(key, value));
        self.arena[tail].next = Some(idx);
        self.stats.record(OperationType::Insert, false);
    }

    /// 获取键对应的值
    ///
    /// 重复键时返回最早插入的值。`Some("")` 与 `None` 可区分。
    pub fn get(&self, key: Key) -> Option<&str> {
        let index = self.hasher.locate_bucket(key);
        let search = chain::find_first(&self.arena, self.buckets[index], key);

        self.stats.record_chain_steps(search.steps);
        self.stats.record(OperationType::Get, search.found.is_some());

        search.found.map(|m| self.arena[m.current].value.as_str())
    }

    /// 兼容写法：未找到时返回空字符串
    pub fn get_or_empty(&self, key: Key) -> &str {
        self.get(key).unwrap_or("")
    }

    /// 检查键是否存在
    pub fn contains_key(&self, key: Key) -> bool {
        self.get(key).is_some()
    }

    /// 删除键对应的第一个条目并返回其值
    ///
    /// 只删除链中第一个匹配的条目。键不存在时为空操作，返回 `None`。
    pub fn remove(&mut self, key: Key) -> Option<Value> {
        let index = self.hasher.locate_bucket(key);
        let search = chain::find_first(&self.arena, self.buckets[index], key);

        self.stats.record_chain_steps(search.steps);
        self.stats.record(OperationType::Remove, search.found.is_some());

        let m = search.found?;
        let next = self.arena[m.current].next;
        match m.prev {
            None => self.buckets[index] = next,
            Some(prev) => self.arena[prev].next = next,
        }

        log_debug!("删除键 {} (桶 {}, 第 {} 个条目)", key, index, search.steps);
        self.arena.free(m.current).map(|entry| entry.value)
    }

    /// 清空所有条目，桶数量不变
    pub fn clear(&mut self) {
        self.buckets.fill(None);
        self.arena.clear();
    }

    /// 条目数量 (包含重复键)
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// 负载因子
    pub fn load_factor(&self) -> f32 {
        self.len() as f32 / self.bucket_count() as f32
    }

    /// 指定桶的链长度，越界返回 `None`
    pub fn chain_len(&self, bucket: usize) -> Option<usize> {
        let head = *self.buckets.get(bucket)?;
        Some(chain::chain_len(&self.arena, head))
    }

    /// 键所在的桶
    pub fn bucket_of(&self, key: Key) -> usize {
        self.hasher.locate_bucket(key)
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// 获取操作统计接口
    pub fn operation_stats(&self) -> &dyn OperationRecorder {
        self.stats.as_ref()
    }

    /// 获取统计信息
    pub fn stats(&self) -> TableStats {
        let mut empty_buckets = 0;
        let mut longest_chain = 0;
        for &head in &self.buckets {
            let len = chain::chain_len(&self.arena, head);
            if len == 0 {
                empty_buckets += 1;
            }
            longest_chain = longest_chain.max(len);
        }

        TableStats {
            size: self.len(),
            bucket_count: self.bucket_count(),
            load_factor: self.load_factor(),
            empty_buckets,
            longest_chain,
            arena: self.arena.stats(),
            operations: self.stats.snapshot(),
        }
    }
}

impl Extend<(Key, Value)> for ChainedTable {
    fn extend<I: IntoIterator<Item = (Key, Value)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl fmt::Debug for ChainedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedTable")
            .field("size", &self.len())
            .field("bucket_count", &self.bucket_count())
            .field("load_factor", &self.load_factor())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_table(bucket_count: usize) -> ChainedTable {
        ChainedTable::new(bucket_count).unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let mut table = create_test_table(10);
        table.insert(12345, "Alice");
        table.insert(67890, "Bob");

        assert_eq!(table.get(12345), Some("Alice"));
        assert_eq!(table.get(67890), Some("Bob"));
        assert_eq!(table.get(99999), None);
        assert_eq!(table.get_or_empty(99999), "");

        assert_eq!(table.remove(12345), Some("Alice".to_string()));
        assert_eq!(table.get(12345), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_invalid_bucket_count() {
        assert_eq!(
            ChainedTable::new(0).unwrap_err(),
            TableError::InvalidBucketCount { requested: 0 }
        );
        assert_eq!(
            ChainedTable::try_from_signed(-4).unwrap_err(),
            TableError::InvalidBucketCount { requested: -4 }
        );
        assert!(ChainedTable::try_from_signed(0).is_err());
        assert_eq!(ChainedTable::try_from_signed(3).unwrap().bucket_count(), 3);
    }

    #[test]
    fn test_config_validate() {
        assert!(TableConfig::default().validate().is_ok());
        assert!(matches!(
            TableConfig::with_bucket_count(usize::MAX).validate(),
            Err(TableError::InvalidConfig { .. })
        ));
        assert!(ChainedTable::with_config(TableConfig::with_bucket_count(0)).is_err());
    }

    #[test]
    fn test_empty_value_is_distinct_from_missing() {
        let mut table = create_test_table(4);
        table.insert(1, "");
        assert_eq!(table.get(1), Some(""));
        assert!(table.contains_key(1));
        assert!(!table.contains_key(2));
    }

    #[test]
    fn test_duplicates_append() {
        let mut table = create_test_table(10);
        table.insert(7, "a");
        table.insert(7, "b");
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(7), Some("a"));

        assert_eq!(table.remove(7).as_deref(), Some("a"));
        assert_eq!(table.get(7), Some("b"));
        assert_eq!(table.remove(7).as_deref(), Some("b"));
        assert_eq!(table.get(7), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_duplicates_overwrite() {
        let config = TableConfig::with_bucket_count(10).duplicate_policy(DuplicatePolicy::Overwrite);
        let mut table = ChainedTable::with_config(config).unwrap();
        table.insert(17, "x");
        table.insert(7, "a");
        table.insert(7, "b");

        assert_eq!(table.len(), 2);
        assert_eq!(table.get(7), Some("b"));
        assert_eq!(table.chain_len(7), Some(2));
        assert_eq!(table.remove(7).as_deref(), Some("b"));
        assert_eq!(table.get(7), None);
        assert_eq!(table.get(17), Some("x"));
    }

    #[test]
    fn test_remove_middle_and_tail_of_chain() {
        let mut table = create_test_table(10);
        for key in [3, 13, 23, 33] {
            table.insert(key, format!("v{}", key));
        }
        assert_eq!(table.chain_len(3), Some(4));

        assert_eq!(table.remove(23).as_deref(), Some("v23"));
        assert_eq!(table.remove(33).as_deref(), Some("v33"));
        assert_eq!(table.chain_len(3), Some(2));
        assert_eq!(table.get(3), Some("v3"));
        assert_eq!(table.get(13), Some("v13"));

        // 删除后追加仍落在链尾
        table.insert(43, "v43");
        assert_eq!(table.chain_len(3), Some(3));
        assert_eq!(table.get(43), Some("v43"));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut table = create_test_table(10);
        table.insert(1, "one");
        assert_eq!(table.remove(11), None);
        assert_eq!(table.remove(2), None);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(1), Some("one"));
    }

    #[test]
    fn test_negative_keys() {
        let mut table = create_test_table(10);
        table.insert(-1, "minus one");
        table.insert(9, "nine");
        table.insert(i64::MIN, "min");

        assert_eq!(table.bucket_of(-1), 9);
        assert_eq!(table.chain_len(9), Some(2));
        assert_eq!(table.get(-1), Some("minus one"));
        assert_eq!(table.get(9), Some("nine"));
        assert_eq!(table.get(i64::MIN), Some("min"));
        assert_eq!(table.remove(-1).as_deref(), Some("minus one"));
        assert_eq!(table.get(9), Some("nine"));
    }

    #[test]
    fn test_single_bucket() {
        let mut table = create_test_table(1);
        for key in -5..5 {
            table.insert(key, key.to_string());
        }
        assert_eq!(table.chain_len(0), Some(10));
        for key in (-5..5).step_by(2) {
            assert_eq!(table.remove(key), Some(key.to_string()));
        }
        for key in -5..5 {
            let expected = if (key + 5) % 2 == 0 { None } else { Some(key.to_string()) };
            assert_eq!(table.get(key).map(str::to_string), expected);
        }
    }

    #[test]
    fn test_stats() {
        let mut table = create_test_table(4);
        table.insert(0, "a");
        table.insert(4, "b");
        table.insert(1, "c");
        table.get(4);
        table.get(8);
        table.remove(0);

        let stats = table.stats();
        assert_eq!(stats.size, 2);
        assert_eq!(stats.bucket_count, 4);
        assert_eq!(stats.empty_buckets, 2);
        assert_eq!(stats.longest_chain, 1);
        assert!((stats.load_factor - 0.5).abs() < f32::EPSILON);
        assert_eq!(stats.arena.free_slots, 1);
        assert_eq!(stats.operations.insert_count, 3);
        assert_eq!(stats.operations.get_count, 2);
        assert_eq!(stats.operations.remove_count, 1);
        assert_eq!(stats.operations.hit_count, 2);
        assert_eq!(stats.operations.miss_count, 1);
        assert_eq!(stats.operations.collision_count, 1);
    }

    #[test]
    fn test_duplicate_key_is_not_a_collision() {
        let mut table = create_test_table(10);
        table.insert(7, "a");
        table.insert(7, "b");
        assert_eq!(table.stats().operations.collision_count, 0);

        table.insert(17, "c");
        assert_eq!(table.stats().operations.collision_count, 1);
        table.insert(7, "d");
        assert_eq!(table.stats().operations.collision_count, 2);
    }

    #[test]
    fn test_overwrite_collision_counting() {
        let config = TableConfig::with_bucket_count(10).duplicate_policy(DuplicatePolicy::Overwrite);
        let mut table = ChainedTable::with_config(config).unwrap();
        table.insert(7, "a");
        table.insert(7, "b");
        assert_eq!(table.stats().operations.collision_count, 0);

        table.insert(17, "x");
        assert_eq!(table.stats().operations.collision_count, 1);
        // 覆盖链头，但链中还有 17
        table.insert(7, "c");
        assert_eq!(table.stats().operations.collision_count, 2);
        assert_eq!(table.get(7), Some("c"));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_unallocatable_bucket_count_is_an_error() {
        let config = TableConfig::with_bucket_count(1 << 58);
        assert!(config.validate().is_ok());
        assert!(matches!(
            ChainedTable::with_config(config),
            Err(TableError::InvalidConfig { .. })
        ));
        assert!(matches!(ChainedTable::new(1 << 58), Err(TableError::InvalidConfig { .. })));
    }

    #[test]
    fn test_clear_resets_arena_stats() {
        let mut table = create_test_table(4);
        table.insert(1, "a");
        table.remove(1);
        table.insert(2, "b");
        assert_eq!(table.stats().arena.reuse_count, 1);

        table.clear();
        assert_eq!(table.stats().arena, ArenaStats::default());
    }

    #[test]
    fn test_stats_disabled() {
        let config = TableConfig::with_bucket_count(4).enable_stats(false);
        let mut table = ChainedTable::with_config(config).unwrap();
        table.insert(1, "a");
        table.get(1);
        assert_eq!(table.stats().operations, OperationStatsSnapshot::default());
        assert_eq!(table.stats().size, 1);
    }

    #[test]
    fn test_clear_and_extend() {
        let mut table = create_test_table(3);
        table.extend((0..6).map(|k| (k, format!("v{}", k))));
        assert_eq!(table.len(), 6);
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.bucket_count(), 3);
        assert_eq!(table.get(1), None);
        table.insert(1, "again");
        assert_eq!(table.get(1), Some("again"));
    }

    #[test]
    fn test_chain_len_out_of_range() {
        let table = create_test_table(2);
        assert_eq!(table.chain_len(2), None);
        assert_eq!(table.chain_len(1), Some(0));
    }

    #[test]
    fn test_debug_format() {
        let mut table = create_test_table(10);
        table.insert(1, "a");
        let text = format!("{:?}", table);
        assert!(text.contains("ChainedTable"));
        assert!(text.contains("size: 1"));
        assert!(text.contains("bucket_count: 10"));
    }
}
