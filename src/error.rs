// ==========================================
// 车队班次仿真 - 核心错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 预测失败由 PredictionError 表示, 在引擎内部兜底,不向外传播
// ==========================================

use thiserror::Error;

/// 仿真核心错误类型
#[derive(Error, Debug)]
pub enum SimulationError {
    // ===== 数据错误 =====
    #[error("车队数据不可用: {0}")]
    DataUnavailable(String),

    // ===== 配置错误 =====
    #[error("配置非法 (field={field}): {message}")]
    InvalidConfiguration { field: String, message: String },

    // ===== 搜索错误 =====
    #[error("无有效场景: 共采样 {sampled} 个场景,全部失败")]
    NoValidScenario { sampled: usize },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SimulationError {
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        SimulationError::InvalidConfiguration {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Result 类型别名
pub type SimResult<T> = Result<T, SimulationError>;
