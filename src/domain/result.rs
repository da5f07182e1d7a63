// ==========================================
// 车队班次仿真 - 仿真结果模型
// ==========================================
// 职责: 周期明细、分阶段汇总、财务分解、发运判定、候选策略
// 红线: totalTonnage == Σ 周期装载吨位
// 红线: 财务分解要么完整要么不存在
// ==========================================

use crate::domain::scenario::SimulationScenario;
use crate::domain::types::{DelayRiskLevel, PredictionSource, ShipmentStatus, StrategyObjective};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// CycleOutcome - 单个运输周期结果
// ==========================================
// 时长单位: 小时
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleOutcome {
    pub truck_id: String,
    pub load_t: f64,
    pub fuel_l: f64,
    pub delay_probability: f64,
    pub risk_score: f64,
    pub source: PredictionSource,

    // ===== 分阶段时长 =====
    pub haul_hours: f64,
    pub queue_hours: f64,
    pub loading_hours: f64,
    pub return_hours: f64,
    pub dumping_hours: f64,

    /// 周期完成时刻 (相对班次开始, 小时)
    pub completed_at_hours: f64,
}

impl CycleOutcome {
    /// 周期总时长 (含排队)
    pub fn cycle_hours(&self) -> f64 {
        self.haul_hours + self.queue_hours + self.loading_hours + self.return_hours + self.dumping_hours
    }
}

// ==========================================
// PhaseTotals - 分阶段累计时长 (小时)
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseTotals {
    pub hauling_hours: f64,
    pub loading_hours: f64,
    pub return_hours: f64,
    pub dumping_hours: f64,
    pub cycle_hours: f64,
}

// ==========================================
// FinancialBreakdown - 财务分解
// ==========================================
// net_profit = revenue - (fuel + maintenance + operator + queue + incident + demurrage)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialBreakdown {
    pub revenue: f64,
    pub fuel_cost: f64,
    pub maintenance_cost: f64,
    pub operator_cost: f64,
    pub queue_cost: f64,
    pub incident_risk_cost: f64,
    pub demurrage_cost: f64,
    /// 直接运营成本 (燃油 + 保养 + 人工)
    pub operating_cost: f64,
    /// 全部成本项之和
    pub total_cost: f64,
    pub net_profit: f64,
}

impl FinancialBreakdown {
    /// 各成本项 (按固定顺序)
    pub fn cost_components(&self) -> [f64; 6] {
        [
            self.fuel_cost,
            self.maintenance_cost,
            self.operator_cost,
            self.queue_cost,
            self.incident_risk_cost,
            self.demurrage_cost,
        ]
    }
}

// ==========================================
// ShipmentVerdict - 船期风险判定
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentVerdict {
    pub status: ShipmentStatus,
    pub risk_level: DelayRiskLevel,
    pub demurrage_cost: f64,
    pub vessel_name: Option<String>,
    pub remaining_target_t: f64,
    pub hours_remaining: f64,
    pub hours_needed: f64,
    pub days_to_complete: f64,
    pub reason: String,
}

impl ShipmentVerdict {
    /// 无船期 / 船期过旧
    pub fn no_ship(reason: impl Into<String>) -> Self {
        Self {
            status: ShipmentStatus::NoShip,
            risk_level: DelayRiskLevel::None,
            demurrage_cost: 0.0,
            vessel_name: None,
            remaining_target_t: 0.0,
            hours_remaining: 0.0,
            hours_needed: 0.0,
            days_to_complete: 0.0,
            reason: reason.into(),
        }
    }
}

// ==========================================
// OperatorHeadcount - 人员配置
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorHeadcount {
    pub hauling: u32, // 卡车司机 = 卡车数
    pub loading: u32, // 装载挖机司机 = 挖机数
    pub dumping: u32, // 卸载区司机 = 挖机数
}

impl OperatorHeadcount {
    pub fn for_fleet(truck_count: u32, excavator_count: u32) -> Self {
        Self {
            hauling: truck_count,
            loading: excavator_count,
            dumping: excavator_count,
        }
    }

    pub fn total(&self) -> u32 {
        self.hauling + self.loading + self.dumping
    }
}

// ==========================================
// DerivedMetrics - 衍生指标
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub road_distance_km: f64,
    pub total_distance_km: f64,
    /// 吨油耗 (无产量时 999)
    pub fuel_per_ton: f64,
    /// 平均周期时长 (小时, 无完成周期时 999)
    pub avg_cycle_hours: f64,
    pub production_per_truck_t: f64,
    pub avg_hauling_minutes: f64,
    pub avg_queue_minutes: f64,
    pub avg_loading_minutes: f64,
    pub avg_return_minutes: f64,
    pub avg_dumping_minutes: f64,
    /// 匹配系数: <1 卡车不足, >1 挖机不足
    pub match_factor: f64,
    pub headcount: OperatorHeadcount,
}

// ==========================================
// SimulationResult - 单次仿真结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub run_hours: f64,
    pub total_tonnage_t: f64,
    pub total_fuel_l: f64,
    pub cycles_completed: u32,
    pub total_queue_hours: f64,
    pub delay_probability_sum: f64,
    pub maintenance_accrued: f64,
    pub phases: PhaseTotals,
    pub used_truck_ids: Vec<String>,
    pub used_excavator_ids: Vec<String>,
    pub predictor_cycles: u32,
    pub fallback_cycles: u32,
    pub cycles: Vec<CycleOutcome>,
    pub financials: FinancialBreakdown,
    pub shipment: ShipmentVerdict,
    pub metrics: DerivedMetrics,
}

// ==========================================
// StrategyCandidate - 候选策略
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyCandidate {
    pub candidate_id: String,
    pub rank: u32,
    pub objective: StrategyObjective,
    pub objective_label: String,
    pub scenario: SimulationScenario,
    pub result: SimulationResult,
    pub guidelines: Vec<String>,
}

impl StrategyCandidate {
    pub fn new(
        rank: u32,
        objective: StrategyObjective,
        scenario: SimulationScenario,
        result: SimulationResult,
        guidelines: Vec<String>,
    ) -> Self {
        Self {
            candidate_id: Uuid::new_v4().to_string(),
            rank,
            objective_label: objective.title_cn(),
            objective,
            scenario,
            result,
            guidelines,
        }
    }
}
