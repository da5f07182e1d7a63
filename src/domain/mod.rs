// ==========================================
// 车队班次仿真 - 领域模型层
// ==========================================
// 职责: 定义车队实体、场景、结果与枚举类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod fleet;
pub mod result;
pub mod scenario;
pub mod types;

// 重导出核心类型
pub use fleet::{
    Excavator, HaulingRecord, MaintenanceLog, Operator, RoadSegment, Truck, Vessel, VesselSchedule,
};
pub use result::{
    CycleOutcome, DerivedMetrics, FinancialBreakdown, OperatorHeadcount, PhaseTotals,
    ShipmentVerdict, SimulationResult, StrategyCandidate,
};
pub use scenario::{ConfigKey, SimulationScenario};
pub use types::{
    DelayRiskLevel, EquipmentStatus, PredictionSource, RoadCondition, Shift, ShipmentStatus,
    StrategyObjective, Weather,
};
