// src/stats/operation.rs
//! 操作统计 - 跟踪哈希表操作次数与链遍历开销

use crate::types::OperationType;
use std::{
    fmt::Write,
    sync::atomic::{AtomicU64, Ordering},
};

/// 操作统计接口
///
/// 接收 `&self`，查找路径上也能记录。
pub trait OperationRecorder: Send + Sync {
    /// 记录一次操作，`hit` 表示是否命中已有键
    fn record(&self, op_type: OperationType, hit: bool);

    /// 记录一次插入冲突 (目标桶的链中已有其他键)
    fn record_collision(&self);

    /// 记录遍历链时经过的条目数
    fn record_chain_steps(&self, steps: u64);

    /// 获取统计快照
    fn snapshot(&self) -> OperationStatsSnapshot;

    /// 重置统计
    fn reset(&self);

    /// 导出Prometheus格式指标
    fn export_prometheus(&self) -> String;
}

/// 操作统计快照
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OperationStatsSnapshot {
    pub insert_count: u64,
    pub get_count: u64,
    pub remove_count: u64,
    pub hit_count: u64,
    pub miss_count: u64,
    pub collision_count: u64,
    pub chain_steps: u64,
}

impl OperationStatsSnapshot {
    fn count_of(&self, op: OperationType) -> u64 {
        match op {
            OperationType::Insert => self.insert_count,
            OperationType::Get => self.get_count,
            OperationType::Remove => self.remove_count,
        }
    }
}

/// 原子操作统计
#[derive(Debug, Default)]
pub struct AtomicOperationStats {
    insert_count: AtomicU64,
    get_count: AtomicU64,
    remove_count: AtomicU64,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
    collision_count: AtomicU64,
    chain_steps: AtomicU64,
}

impl AtomicOperationStats {
    /// 创建新统计
    pub fn new() -> Self {
        Self::default()
    }

    fn counters(&self) -> [&AtomicU64; 7] {
        [
            &self.insert_count,
            &self.get_count,
            &self.remove_count,
            &self.hit_count,
            &self.miss_count,
            &self.collision_count,
            &self.chain_steps,
        ]
    }
}

impl OperationRecorder for AtomicOperationStats {
    fn record(&self, op_type: OperationType, hit: bool) {
        match op_type {
            OperationType::Insert => self.insert_count.fetch_add(1, Ordering::Relaxed),
            OperationType::Get => self.get_count.fetch_add(1, Ordering::Relaxed),
            OperationType::Remove => self.remove_count.fetch_add(1, Ordering::Relaxed),
        };

        // 插入总是成功，只统计查找与删除的命中情况
        if op_type != OperationType::Insert {
            if hit {
                self.hit_count.fetch_add(1, Ordering::Relaxed);
            } else {
                self.miss_count.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn record_collision(&self) {
        self.collision_count.fetch_add(1, Ordering::Relaxed);
    }

    fn record_chain_steps(&self, steps: u64) {
        self.chain_steps.fetch_add(steps, Ordering::Relaxed);
    }

    fn snapshot(&self) -> OperationStatsSnapshot {
        OperationStatsSnapshot {
            insert_count: self.insert_count.load(Ordering::Relaxed),
            get_count: self.get_count.load(Ordering::Relaxed),
            remove_count: self.remove_count.load(Ordering::Relaxed),
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
            collision_count: self.collision_count.load(Ordering::Relaxed),
            chain_steps: self.chain_steps.load(Ordering::Relaxed),
        }
    }

    fn reset(&self) {
        for counter in self.counters() {
            counter.store(0, Ordering::Relaxed);
        }
    }

    fn export_prometheus(&self) -> String {
        let snapshot = self.snapshot();
        let mut output = String::new();

        for op in [OperationType::Insert, OperationType::Get, OperationType::Remove] {
            let _ = writeln!(
                output,
                "# HELP chained_operation_{0}_count Total {0} operations",
                op.as_str()
            );
            let _ = writeln!(output, "# TYPE chained_operation_{}_count counter", op.as_str());
            let _ = writeln!(
                output,
                "chained_operation_{}_count {}",
                op.as_str(),
                snapshot.count_of(op)
            );
        }

        let extra = [
            ("hit_count", "Lookups and removes that found the key", snapshot.hit_count),
            ("miss_count", "Lookups and removes that missed", snapshot.miss_count),
            ("collision_count", "Inserts into a bucket already holding a different key", snapshot.collision_count),
            ("chain_steps", "Entries visited while walking chains", snapshot.chain_steps),
        ];
        for (name, help, value) in extra {
            let _ = writeln!(output, "# HELP chained_operation_{} {}", name, help);
            let _ = writeln!(output, "# TYPE chained_operation_{} counter", name);
            let _ = writeln!(output, "chained_operation_{} {}", name, value);
        }

        output
    }
}

/// 禁用操作统计实现
#[derive(Debug, Default)]
pub struct DisabledOperationRecorder;

impl OperationRecorder for DisabledOperationRecorder {
    fn record(&self, _op_type: OperationType, _hit: bool) {}
    fn record_collision(&self) {}
    fn record_chain_steps(&self, _steps: u64) {}
    fn snapshot(&self) -> OperationStatsSnapshot { OperationStatsSnapshot::default() }
    fn reset(&self) {}
    fn export_prometheus(&self) -> String { String::new() }
}
