// ==========================================
// 车队班次仿真 - 仿真场景
// ==========================================
// 职责: 单次仿真的不可变输入 (环境 + 设备配置 + 船期)
// 生命周期: 采样时创建 → 一次引擎运行消费 → 丢弃
// ==========================================

use crate::domain::types::{RoadCondition, Shift, Weather};
use crate::error::{SimResult, SimulationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 配置去重键: (卡车数, 挖机数, 路段ID, 挖机ID)
pub type ConfigKey = (u32, u32, String, String);

// ==========================================
// SimulationScenario - 仿真场景
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationScenario {
    // ===== 环境 =====
    pub weather: Weather,
    pub road_condition: RoadCondition,
    pub shift: Shift,

    // ===== 设备配置 =====
    pub truck_count: u32,
    pub excavator_count: u32,
    pub road_id: String,
    pub excavator_id: String,
    pub schedule_id: Option<String>,

    // ===== 时间与目标 =====
    pub start_time: DateTime<Utc>,
    pub production_target_t: Option<f64>,

    /// 兜底估算抖动的随机种子 (同一种子 + 同一预测桩 ⇒ 结果一致)
    pub seed: u64,
}

impl SimulationScenario {
    /// 创建场景 (环境默认: 晴 / GOOD / SHIFT_1)
    pub fn new(
        truck_count: u32,
        excavator_count: u32,
        road_id: impl Into<String>,
        excavator_id: impl Into<String>,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            weather: Weather::default(),
            road_condition: RoadCondition::default(),
            shift: Shift::default(),
            truck_count,
            excavator_count,
            road_id: road_id.into(),
            excavator_id: excavator_id.into(),
            schedule_id: None,
            start_time,
            production_target_t: None,
            seed: 0,
        }
    }

    pub fn with_environment(mut self, weather: Weather, road_condition: RoadCondition, shift: Shift) -> Self {
        self.weather = weather;
        self.road_condition = road_condition;
        self.shift = shift;
        self
    }

    pub fn with_schedule(mut self, schedule_id: Option<String>) -> Self {
        self.schedule_id = schedule_id;
        self
    }

    pub fn with_production_target(mut self, target_t: Option<f64>) -> Self {
        self.production_target_t = target_t;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// 配置校验 (仿真前拒绝非法配置)
    pub fn validate(&self) -> SimResult<()> {
        if self.truck_count == 0 {
            return Err(SimulationError::InvalidConfiguration {
                field: "truck_count".to_string(),
                message: "卡车数量必须大于0".to_string(),
            });
        }
        if self.excavator_count == 0 {
            return Err(SimulationError::InvalidConfiguration {
                field: "excavator_count".to_string(),
                message: "挖掘机数量必须大于0".to_string(),
            });
        }
        if let Some(target) = self.production_target_t {
            if !target.is_finite() || target < 0.0 {
                return Err(SimulationError::InvalidConfiguration {
                    field: "production_target_t".to_string(),
                    message: format!("产量目标非法: {}", target),
                });
            }
        }
        Ok(())
    }

    pub fn config_key(&self) -> ConfigKey {
        (
            self.truck_count,
            self.excavator_count,
            self.road_id.clone(),
            self.excavator_id.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(trucks: u32, excavators: u32) -> SimulationScenario {
        SimulationScenario::new(trucks, excavators, "R1", "E1", Utc::now())
    }

    #[test]
    fn test_validate_rejects_zero_counts() {
        assert!(matches!(
            scenario(0, 2).validate(),
            Err(SimulationError::InvalidConfiguration { ref field, .. }) if field == "truck_count"
        ));
        assert!(matches!(
            scenario(3, 0).validate(),
            Err(SimulationError::InvalidConfiguration { ref field, .. }) if field == "excavator_count"
        ));
        assert!(scenario(3, 1).validate().is_ok());
    }

    #[test]
    fn test_negative_target_rejected() {
        let s = scenario(3, 1).with_production_target(Some(-5.0));
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_config_key() {
        let key = scenario(7, 2).config_key();
        assert_eq!(key, (7, 2, "R1".to_string(), "E1".to_string()));
    }
}
