// src/memory/arena.rs
//! 竞技场实现 - 以位置索引管理链条目
//!
//! 所有条目集中存放在一个 `Vec` 中，链接只保存索引。被删除的槽位进入
//! 空闲链表，下次分配时优先复用。

use crate::types::{EntryIndex, Key, Value};
use std::ops::{Index, IndexMut};

/// 链中的一个条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: Key,
    pub value: Value,
    /// 后继条目，`None` 表示链尾
    pub next: Option<EntryIndex>,
}

impl Entry {
    /// 创建无后继的新条目
    pub fn new(key: Key, value: Value) -> Self {
        Self { key, value, next: None }
    }
}

#[derive(Debug)]
enum ArenaSlot {
    Occupied(Entry),
    Vacant { next_free: Option<EntryIndex> },
}

/// 竞技场统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ArenaStats {
    /// 已分配的槽位总数 (含空闲)
    pub total_slots: usize,
    /// 正在使用的槽位
    pub live_entries: usize,
    /// 空闲链表中的槽位
    pub free_slots: usize,
    /// 复用空闲槽位的次数
    pub reuse_count: u64,
}

/// 条目竞技场
#[derive(Debug, Default)]
pub struct EntryArena {
    slots: Vec<ArenaSlot>,
    free_head: Option<EntryIndex>,
    live: usize,
    reuse_count: u64,
}

impl EntryArena {
    /// 创建空竞技场
    pub fn new() -> Self {
        Self::default()
    }

    /// 分配槽位存放条目，优先复用空闲槽位
    pub fn alloc(&mut self, entry: Entry) -> EntryIndex {
        self.live += 1;

        if let Some(idx) = self.free_head {
            let slot = &mut self.slots[idx.as_usize()];
            if let ArenaSlot::Vacant { next_free } = *slot {
                self.free_head = next_free;
                *slot = ArenaSlot::Occupied(entry);
                self.reuse_count += 1;
                return idx;
            }
        }

        let idx = EntryIndex::new(self.slots.len());
        self.slots.push(ArenaSlot::Occupied(entry));
        idx
    }

    /// 释放槽位并返回其中的条目
    ///
    /// 对空闲或越界的索引返回 `None`，竞技场不变。
    pub fn free(&mut self, idx: EntryIndex) -> Option<Entry> {
        let slot = self.slots.get_mut(idx.as_usize())?;
        if matches!(slot, ArenaSlot::Vacant { .. }) {
            return None;
        }

        let vacant = ArenaSlot::Vacant { next_free: self.free_head };
        match std::mem::replace(slot, vacant) {
            ArenaSlot::Occupied(entry) => {
                self.free_head = Some(idx);
                self.live -= 1;
                Some(entry)
            }
            ArenaSlot::Vacant { .. } => None,
        }
    }

    /// 获取条目
    pub fn get(&self, idx: EntryIndex) -> Option<&Entry> {
        match self.slots.get(idx.as_usize())? {
            ArenaSlot::Occupied(entry) => Some(entry),
            ArenaSlot::Vacant { .. } => None,
        }
    }

    /// 获取可变条目
    pub fn get_mut(&mut self, idx: EntryIndex) -> Option<&mut Entry> {
        match self.slots.get_mut(idx.as_usize())? {
            ArenaSlot::Occupied(entry) => Some(entry),
            ArenaSlot::Vacant { .. } => None,
        }
    }

    /// 正在使用的条目数
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// 丢弃所有条目
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.live = 0;
        self.reuse_count = 0;
    }

    /// 获取统计信息
    pub fn stats(&self) -> ArenaStats {
        ArenaStats {
            total_slots: self.slots.len(),
            live_entries: self.live,
            free_slots: self.slots.len() - self.live,
            reuse_count: self.reuse_count,
        }
    }
}

impl Index<EntryIndex> for EntryArena {
    type Output = Entry;

    /// 访问已释放的槽位说明链接已损坏，直接 panic
    fn index(&self, idx: EntryIndex) -> &Entry {
        match self.get(idx) {
            Some(entry) => entry,
            None => panic!("悬空的条目索引 {}", idx),
        }
    }
}

impl IndexMut<EntryIndex> for EntryArena {
    fn index_mut(&mut self, idx: EntryIndex) -> &mut Entry {
        match self.get_mut(idx) {
            Some(entry) => entry,
            None => panic!("悬空的条目索引 {}", idx),
        }
    }
}
