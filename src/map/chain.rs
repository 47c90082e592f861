// src/map/chain.rs
//! 链操作 - 在竞技场中沿后继链接遍历单个桶的链

use crate::{
    memory::{Entry, EntryArena},
    types::{EntryIndex, Key},
};

/// 链上的一次匹配
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainMatch {
    /// 前驱条目，`None` 表示匹配的是链头
    pub prev: Option<EntryIndex>,
    pub current: EntryIndex,
}

/// 链搜索结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainSearch {
    /// 第一个满足条件的条目
    pub found: Option<ChainMatch>,
    /// 最后访问的条目；未命中时即链尾，空链为 `None`
    pub last: Option<EntryIndex>,
    /// 访问过的条目数
    pub steps: u64,
}

/// 按插入顺序遍历一条链
pub(crate) struct ChainIter<'a> {
    arena: &'a EntryArena,
    next: Option<EntryIndex>,
}

impl<'a> ChainIter<'a> {
    pub(crate) fn new(arena: &'a EntryArena, head: Option<EntryIndex>) -> Self {
        Self { arena, next: head }
    }
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = (EntryIndex, &'a Entry);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.next?;
        let entry = &self.arena[idx];
        self.next = entry.next;
        Some((idx, entry))
    }
}

/// 从链头开始搜索第一个满足谓词的条目
pub fn search_by(
    arena: &EntryArena,
    head: Option<EntryIndex>,
    mut pred: impl FnMut(&Entry) -> bool,
) -> ChainSearch {
    let mut prev = None;
    let mut steps = 0;

    for (idx, entry) in ChainIter::new(arena, head) {
        steps += 1;
        if pred(entry) {
            return ChainSearch {
                found: Some(ChainMatch { prev, current: idx }),
                last: Some(idx),
                steps,
            };
        }
        prev = Some(idx);
    }

    ChainSearch { found: None, last: prev, steps }
}

/// 查找链中第一个键匹配的条目
pub fn find_first(arena: &EntryArena, head: Option<EntryIndex>, key: Key) -> ChainSearch {
    search_by(arena, head, |entry| entry.key == key)
}

/// 链长度
pub fn chain_len(arena: &EntryArena, head: Option<EntryIndex>) -> usize {
    ChainIter::new(arena, head).count()
}
