//! 核心类型定义 - 共享类型和枚举

use std::fmt;

/// 键类型 - 有符号整数
pub type Key = i64;

/// 值类型 - 字符串
pub type Value = String;

/// 条目在竞技场中的位置
///
/// 桶头与条目的后继链接都以 `Option<EntryIndex>` 表示，`None` 即链尾。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct EntryIndex(usize);

impl EntryIndex {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// 获取原始位置
    pub const fn as_usize(self) -> usize {
        self.0
    }
}

impl fmt::Display for EntryIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 重复键插入策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// 追加新条目到链尾，旧条目保留 (查找与删除均作用于最早的条目)
    #[default]
    Append,
    /// 覆盖已存在条目的值，每个键最多一个条目
    Overwrite,
}

/// 操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    Insert,
    Get,
    Remove,
}

impl OperationType {
    /// 指标名中使用的小写名称
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Get => "get",
            Self::Remove => "remove",
        }
    }
}
