// ==========================================
// 车队班次仿真 - 作业指引
// ==========================================
// 职责: 基于天气/路况/车队规模生成作业提示
// 规则: 无任何触发条件时返回默认安全清单
// ==========================================

use crate::domain::scenario::SimulationScenario;
use crate::domain::types::{RoadCondition, Weather};

/// 卡车/挖机比超过该值提示装载点拥堵
const HIGH_TRUCK_PER_EXCAVATOR: f64 = 5.0;

const DEFAULT_SAFETY: [&str; 3] = [
    "作业前召开班前安全会",
    "遵守矿区限速与交通规则",
    "全员佩戴劳保用品并系好安全带",
];

// ==========================================
// OperationalGuidelines - 作业指引生成器
// ==========================================
pub struct OperationalGuidelines {
    // 无状态规则集
}

impl OperationalGuidelines {
    pub fn new() -> Self {
        Self {}
    }

    pub fn for_scenario(&self, scenario: &SimulationScenario) -> Vec<String> {
        self.generate(
            scenario.weather,
            scenario.road_condition,
            scenario.truck_count,
            scenario.excavator_count,
        )
    }

    pub fn generate(
        &self,
        weather: Weather,
        road_condition: RoadCondition,
        truck_count: u32,
        excavator_count: u32,
    ) -> Vec<String> {
        let mut tips: Vec<&str> = Vec::new();

        // ===== 天气 =====
        if weather.is_rain() {
            tips.push("路面湿滑,降低车速");
            tips.push("确认装载/卸载区排水畅通");
            tips.push("必要时切换四驱模式");
        } else if weather == Weather::Fog {
            tips.push("开启雾灯与危险警示灯");
            tips.push("车辆间距保持 50 米以上");
        }

        // ===== 路况 =====
        match road_condition {
            RoadCondition::Poor => {
                tips.push("优先修复坡度/起伏严重路段");
                tips.push("禁止超载,避免加剧路面损坏");
                tips.push("急弯处减速慢行");
            }
            RoadCondition::Fair => tips.push("安排例行平路作业"),
            _ => {}
        }

        // ===== 车队规模 =====
        if truck_count > 10 {
            tips.push("跟车距离不少于 30 米,避免扎堆");
            tips.push("注意装载/卸载区长队风险");
            tips.push("加强交叉路口交通管制");
        }
        if excavator_count > 2 {
            tips.push("确保装载区有多台挖机的作业空间");
            tips.push("挖机司机之间协调分配装载面");
        }
        if excavator_count > 0
            && truck_count as f64 / excavator_count as f64 > HIGH_TRUCK_PER_EXCAVATOR
        {
            tips.push("卡车/挖机配比偏高,装载点排队风险大");
        }

        if tips.is_empty() {
            tips.extend(DEFAULT_SAFETY);
        }
        tips.into_iter().map(str::to_string).collect()
    }
}

impl Default for OperationalGuidelines {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_safety_when_nothing_triggers() {
        let tips = OperationalGuidelines::new().generate(Weather::Clear, RoadCondition::Good, 6, 2);
        assert_eq!(tips, DEFAULT_SAFETY.map(str::to_string).to_vec());
    }

    #[test]
    fn test_rain_poor_road_large_fleet() {
        let tips = OperationalGuidelines::new().generate(Weather::HeavyRain, RoadCondition::Poor, 12, 3);
        // 雨 3 + 差路 3 + 大车队 3 + 多挖机 2
        assert_eq!(tips.len(), 11);
        assert!(!tips.iter().any(|t| t.contains("班前安全会")));
    }

    #[test]
    fn test_fog_and_high_ratio() {
        let tips = OperationalGuidelines::new().generate(Weather::Fog, RoadCondition::Good, 8, 1);
        assert_eq!(tips.len(), 3);
        assert!(tips.iter().any(|t| t.contains("配比偏高")));
    }
}
