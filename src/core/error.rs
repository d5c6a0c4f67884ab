//! 核心错误处理模块

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

/// 存储层错误
///
/// 存储层的错误原样向上传递，仓储层不做转换也不重试。
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("操作已取消")]
    Cancelled,
    #[error("更新失败: 存储中不存在 id = {0} 的记录")]
    Concurrency(i32),
    #[error("存储不可用: {0}")]
    Unavailable(String),
    #[error("数据库错误: {0}")]
    Database(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(Box::new(err))
    }
}

/// 处理器错误类型
///
/// 响应体是纯文本，内容固定，不包含任何内部错误细节。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(&'static str),
    NotFound(i32),
    Internal(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) | ApiError::Internal(msg) => msg.to_string(),
            ApiError::NotFound(id) => format!("Product with Id = {} not found", id),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.message()).into_response()
    }
}

/// 把存储错误收敛为固定文案的 500
pub trait StoreResultExt<T> {
    fn or_internal(self, message: &'static str) -> Result<T, ApiError>;
}

impl<T> StoreResultExt<T> for Result<T, StoreError> {
    fn or_internal(self, message: &'static str) -> Result<T, ApiError> {
        self.map_err(|e| {
            error!(error = %e, "{}", message);
            ApiError::Internal(message)
        })
    }
}
