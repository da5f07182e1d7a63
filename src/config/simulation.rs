// ==========================================
// 车队班次仿真 - 仿真与搜索参数
// ==========================================
// 职责: 引擎常量、兜底估算参数、采样搜索上限
// ==========================================

use crate::error::{SimResult, SimulationError};
use serde::{Deserialize, Serialize};

// ==========================================
// SimulationConfig - 单次仿真参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// 班次仿真时长 (小时)
    pub duration_hours: f64,

    // ===== 兜底估算 =====
    /// 装载系数 (额定载重 × 系数)
    pub fallback_load_factor: f64,
    pub fallback_delay_probability: f64,
    pub fallback_risk_score: f64,
    /// 兜底抖动幅度 (±)
    pub jitter_pct: f64,

    /// 预测油耗往返倍率 (历史版本为 1.6, 可能与训练特征中的运距重复计算, 默认不放大)
    pub predicted_fuel_multiplier: f64,

    /// 雨天装载时长放大
    pub rain_loading_factor: f64,

    /// 无保养记录时的默认距上次保养天数
    pub default_days_since_maintenance: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            duration_hours: 8.0,
            fallback_load_factor: 0.87,
            fallback_delay_probability: 0.05,
            fallback_risk_score: 0.1,
            jitter_pct: 0.05,
            predicted_fuel_multiplier: 1.0,
            rain_loading_factor: 1.1,
            default_days_since_maintenance: 365.0,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> SimResult<()> {
        if !(self.duration_hours.is_finite() && self.duration_hours > 0.0) {
            return Err(SimulationError::invalid("duration_hours", "仿真时长必须大于0"));
        }
        if !(0.0..1.0).contains(&self.jitter_pct) {
            return Err(SimulationError::invalid("jitter_pct", "抖动幅度必须在 [0, 1) 内"));
        }
        if !(self.predicted_fuel_multiplier.is_finite() && self.predicted_fuel_multiplier > 0.0) {
            return Err(SimulationError::invalid(
                "predicted_fuel_multiplier",
                "油耗倍率必须大于0",
            ));
        }
        Ok(())
    }
}

// ==========================================
// SearchConfig - 场景采样与排序参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// 评估场景总数上限
    pub max_scenarios: usize,
    /// 每个 (卡车数, 挖机数) 组合抽取的路线组合数
    pub combinations_per_config: usize,
    pub road_sample_cap: usize,
    pub excavator_sample_cap: usize,
    pub schedule_sample_cap: usize,
    /// 产量目标换算: 单车单班产量 (吨)
    pub tons_per_truck_shift: f64,
    /// 单池排序保留深度
    pub pool_depth: usize,
    /// 卡车数绝对上限
    pub max_truck_count: u32,
    /// 返回策略数
    pub top_k: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_scenarios: 300,
            combinations_per_config: 5,
            road_sample_cap: 30,
            excavator_sample_cap: 20,
            schedule_sample_cap: 10,
            tons_per_truck_shift: 250.0,
            pool_depth: 20,
            max_truck_count: 100,
            top_k: 3,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> SimResult<()> {
        if !(self.tons_per_truck_shift.is_finite() && self.tons_per_truck_shift > 0.0) {
            return Err(SimulationError::invalid(
                "tons_per_truck_shift",
                format!("单车单班产量必须大于0: {}", self.tons_per_truck_shift),
            ));
        }
        if self.max_truck_count == 0 {
            return Err(SimulationError::invalid("max_truck_count", "卡车数上限必须大于0"));
        }
        for (field, value) in [
            ("max_scenarios", self.max_scenarios),
            ("pool_depth", self.pool_depth),
            ("top_k", self.top_k),
        ] {
            if value == 0 {
                return Err(SimulationError::invalid(field, "必须大于0"));
            }
        }
        Ok(())
    }
}
