//! 统计模块 - 哈希表操作计数

pub mod operation;

pub use operation::{
    AtomicOperationStats, DisabledOperationRecorder, OperationRecorder, OperationStatsSnapshot,
};

use std::sync::Arc;

/// 根据开关创建操作统计记录器
pub fn create_recorder(enabled: bool) -> Arc<dyn OperationRecorder> {
    if enabled {
        Arc::new(AtomicOperationStats::new())
    } else {
        Arc::new(DisabledOperationRecorder)
    }
}
