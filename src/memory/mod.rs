//! 内存管理模块 - 链条目的竞技场存储

pub mod arena;

pub use arena::{ArenaStats, Entry, EntryArena};
