// ==========================================
// 车队班次仿真 - 服务层错误类型
// ==========================================
// 职责: 将核心错误转换为调用方可理解的错误消息
// ==========================================

use crate::error::SimulationError;
use thiserror::Error;

/// 服务层错误类型
#[derive(Error, Debug)]
pub enum ServiceError {
    // ==========================================
    // 请求错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 数据与搜索错误
    // ==========================================
    #[error("车队数据不可用: {0}")]
    DataUnavailable(String),

    #[error("无可行方案: {0}")]
    NoValidScenario(String),

    // ==========================================
    // 运行时错误
    // ==========================================
    #[error("后台任务执行失败: {0}")]
    TaskJoinError(String),

    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 SimulationError 转换
// ==========================================
impl From<SimulationError> for ServiceError {
    fn from(err: SimulationError) -> Self {
        match err {
            SimulationError::DataUnavailable(msg) => ServiceError::DataUnavailable(msg),
            SimulationError::InvalidConfiguration { field, message } => {
                ServiceError::InvalidInput(format!("字段{}错误: {}", field, message))
            }
            SimulationError::NoValidScenario { sampled } => ServiceError::NoValidScenario(format!(
                "共采样 {} 个场景,全部仿真失败",
                sampled
            )),
            SimulationError::InternalError(msg) => ServiceError::InternalError(msg),
            SimulationError::Other(err) => ServiceError::Other(err),
        }
    }
}

impl From<tokio::task::JoinError> for ServiceError {
    fn from(err: tokio::task::JoinError) -> Self {
        ServiceError::TaskJoinError(err.to_string())
    }
}

/// Result 类型别名
pub type ServiceResult<T> = Result<T, ServiceError>;
