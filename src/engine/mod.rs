// ==========================================
// 车队班次仿真 - 引擎层
// ==========================================
// 职责: 标定、离散事件仿真、船期/财务结算、场景采样与多目标选择
// 红线: 引擎不访问数据源,只读取 SimulationContext
// ==========================================

pub mod calibration;
pub mod context;
pub mod excavator_pool;
pub mod financial;
pub mod guidelines;
pub mod sampler;
pub mod selector;
pub mod shipment;
pub mod simulation;
pub mod truck;

// 重导出核心引擎
pub use calibration::{CalibratedTiming, CalibrationEngine};
pub use context::{resolve_financial_config, SimulationContext};
pub use excavator_pool::{Acquire, ExcavatorPool, Handoff};
pub use financial::{FinancialAggregator, FinancialInputs};
pub use guidelines::OperationalGuidelines;
pub use sampler::{SampleRequest, ScenarioSample, ScenarioSampler};
pub use selector::{EvaluatedScenario, MultiObjectiveSelector, SearchOutcome, SearchStats};
pub use shipment::ShipmentRiskEvaluator;
pub use simulation::SimulationEngine;
pub use truck::{CycleEstimator, CyclePhase, PhaseDurations, PredictedCycle, TruckProcess};
