// ==========================================
// 露天矿运输车队班次仿真 - 核心库
// ==========================================
// 技术栈: Rust + tokio + rayon
// 系统定位: 决策支持核心 (车队配置推荐,人工最终决策)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体、场景、结果
pub mod domain;

// 配置层 - 财务/仿真/搜索参数
pub mod config;

// 错误类型
pub mod error;

// 车队数据层 - 数据端口 + 只读快照
pub mod fleet;

// 预测服务端口
pub mod predictor;

// 引擎层 - 仿真、结算、采样、选择
pub mod engine;

// 服务层 - 异步门面
pub mod service;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    DelayRiskLevel, EquipmentStatus, PredictionSource, RoadCondition, Shift, ShipmentStatus,
    StrategyObjective, Weather,
};

// 领域实体
pub use domain::{
    CycleOutcome, Excavator, FinancialBreakdown, Operator, RoadSegment, ShipmentVerdict,
    SimulationResult, SimulationScenario, StrategyCandidate, Truck, VesselSchedule,
};

// 配置
pub use config::{FinancialConfig, FinancialOverrides, SearchConfig, SimulationConfig};

// 错误
pub use error::{SimResult, SimulationError};

// 车队数据
pub use fleet::{FleetDataSource, FleetRecords, FleetRegistry, InMemoryFleetSource};

// 预测端口
pub use predictor::{
    CycleFeatures, CyclePrediction, ExclusivePredictor, FallbackOnly, PredictionError,
    PredictiveService, SerializedPredictor,
};

// 引擎
pub use engine::{
    CalibrationEngine, MultiObjectiveSelector, SampleRequest, ScenarioSampler,
    SimulationContext, SimulationEngine,
};

// 服务
pub use service::{
    PlanningService, RecommendationRequest, RecommendationResponse, ServiceError, ServiceResult,
    SimulateRequest,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "露天矿运输车队班次仿真";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
