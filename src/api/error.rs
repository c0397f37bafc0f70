// ==========================================
// 航线舱位配置向导 - API 层错误类型
// ==========================================
// 职责: 将仓储/导入层错误转换为面向用户的错误消息
// 说明: 表单不完整不是错误（求解返回 None）, 不在此列
// ==========================================

use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("存储错误: {0}")]
    StorageError(String),

    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::InvalidPath(msg) => ApiError::InvalidInput(msg),
            RepositoryError::ReferenceDataError { path, message } => {
                ApiError::NotFound(format!("{}: {}", path, message))
            }
            RepositoryError::Other(e) => ApiError::Other(e),
            other => ApiError::StorageError(other.to_string()),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(path) => ApiError::NotFound(path),
            ImportError::Other(e) => ApiError::Other(e),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
