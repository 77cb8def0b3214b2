//! 文档模型错误定义

use crate::layer::LayerId;
use crate::primitive::PrimitiveId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    #[error("Cannot remove the last remaining layer")]
    LastLayer,

    #[error("Layer {0} is locked")]
    LayerLocked(LayerId),

    #[error("Layer not found: {0}")]
    LayerNotFound(LayerId),

    #[error("Primitive not found: {0}")]
    PrimitiveNotFound(PrimitiveId),

    #[error("Invalid offset ({dx}, {dy})")]
    InvalidOffset { dx: f64, dy: f64 },
}

impl DocumentError {
    /// 是否是不变量校验失败（删除最后一个图层、修改锁定图层、非有限偏移）
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DocumentError::LastLayer | DocumentError::LayerLocked(_) | DocumentError::InvalidOffset { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, DocumentError>;
