//! 统一错误处理 - 哈希表可能返回的错误类型

/// 链式哈希表可能发生的错误
///
/// 查找未命中与删除未命中都不是错误：前者返回 `None`，后者为空操作。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("无效的桶数量: {requested} (必须 >= 1)")]
    InvalidBucketCount {
        requested: i64,
    },

    #[error("无效配置: {reason}")]
    InvalidConfig {
        reason: String,
    },
}

impl TableError {
    /// 获取错误恢复建议
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidBucketCount { .. } => Some("使用正整数作为桶数量"),
            Self::InvalidConfig { .. } => Some("检查配置参数"),
        }
    }

    /// 判断错误是否可恢复
    ///
    /// 两类错误都发生在构造阶段，修正参数后重新构造即可。
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidBucketCount { .. } | Self::InvalidConfig { .. }
        )
    }
}
