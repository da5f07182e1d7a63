// ==========================================
// 车队班次仿真 - 领域类型定义
// ==========================================
// 职责: 设备状态、环境条件、班次、发运风险等枚举
// 序列化格式: SCREAMING_SNAKE_CASE (与车队数据源一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 设备状态 (Equipment Status)
// ==========================================
// 红线: MAINTENANCE / BREAKDOWN / OUT_OF_SERVICE 不可派车
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentStatus {
    Idle,         // 空闲
    Operating,    // 作业中
    Standby,      // 待命
    Maintenance,  // 保养
    Breakdown,    // 故障
    OutOfService, // 停用
}

impl EquipmentStatus {
    /// 是否可进入派车池
    pub fn is_assignable(&self) -> bool {
        !matches!(
            self,
            EquipmentStatus::Maintenance | EquipmentStatus::Breakdown | EquipmentStatus::OutOfService
        )
    }
}

impl fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EquipmentStatus::Idle => write!(f, "IDLE"),
            EquipmentStatus::Operating => write!(f, "OPERATING"),
            EquipmentStatus::Standby => write!(f, "STANDBY"),
            EquipmentStatus::Maintenance => write!(f, "MAINTENANCE"),
            EquipmentStatus::Breakdown => write!(f, "BREAKDOWN"),
            EquipmentStatus::OutOfService => write!(f, "OUT_OF_SERVICE"),
        }
    }
}

// ==========================================
// 天气 (Weather)
// ==========================================
// 车速系数: 小雨 0.85, 大雨 0.60, 其他 1.0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Weather {
    Clear,     // 晴
    Cloudy,    // 多云
    LightRain, // 小雨
    HeavyRain, // 大雨
    Fog,       // 雾
}

impl Weather {
    pub fn speed_factor(&self) -> f64 {
        match self {
            Weather::LightRain => 0.85,
            Weather::HeavyRain => 0.60,
            _ => 1.0,
        }
    }

    pub fn is_rain(&self) -> bool {
        matches!(self, Weather::LightRain | Weather::HeavyRain)
    }
}

impl Default for Weather {
    fn default() -> Self {
        Weather::Clear
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weather::Clear => write!(f, "CLEAR"),
            Weather::Cloudy => write!(f, "CLOUDY"),
            Weather::LightRain => write!(f, "LIGHT_RAIN"),
            Weather::HeavyRain => write!(f, "HEAVY_RAIN"),
            Weather::Fog => write!(f, "FOG"),
        }
    }
}

impl FromStr for Weather {
    type Err = String;

    /// 兼容现场数据中的印尼语写法 (Cerah / Hujan Ringan / Hujan Lebat / Kabut)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "clear" | "sunny" | "cerah" => Ok(Weather::Clear),
            "cloudy" | "berawan" => Ok(Weather::Cloudy),
            "light rain" | "hujan ringan" => Ok(Weather::LightRain),
            "heavy rain" | "hujan lebat" => Ok(Weather::HeavyRain),
            "fog" | "kabut" => Ok(Weather::Fog),
            other => Err(format!("未知天气类型: {}", other)),
        }
    }
}

// ==========================================
// 路况 (Road Condition)
// ==========================================
// 车速系数: FAIR 0.9, POOR 0.7, 其他 1.0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoadCondition {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl RoadCondition {
    pub fn speed_factor(&self) -> f64 {
        match self {
            RoadCondition::Fair => 0.9,
            RoadCondition::Poor => 0.7,
            _ => 1.0,
        }
    }
}

impl Default for RoadCondition {
    fn default() -> Self {
        RoadCondition::Good
    }
}

impl fmt::Display for RoadCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoadCondition::Excellent => write!(f, "EXCELLENT"),
            RoadCondition::Good => write!(f, "GOOD"),
            RoadCondition::Fair => write!(f, "FAIR"),
            RoadCondition::Poor => write!(f, "POOR"),
        }
    }
}

impl FromStr for RoadCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EXCELLENT" => Ok(RoadCondition::Excellent),
            "GOOD" => Ok(RoadCondition::Good),
            "FAIR" => Ok(RoadCondition::Fair),
            "POOR" => Ok(RoadCondition::Poor),
            other => Err(format!("未知路况: {}", other)),
        }
    }
}

// ==========================================
// 班次 (Shift)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shift {
    #[serde(rename = "SHIFT_1")]
    Shift1,
    #[serde(rename = "SHIFT_2")]
    Shift2,
    #[serde(rename = "SHIFT_3")]
    Shift3,
}

impl Default for Shift {
    fn default() -> Self {
        Shift::Shift1
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shift::Shift1 => write!(f, "SHIFT_1"),
            Shift::Shift2 => write!(f, "SHIFT_2"),
            Shift::Shift3 => write!(f, "SHIFT_3"),
        }
    }
}

impl FromStr for Shift {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "SHIFT_1" | "SHIFT1" | "1" => Ok(Shift::Shift1),
            "SHIFT_2" | "SHIFT2" | "2" => Ok(Shift::Shift2),
            "SHIFT_3" | "SHIFT3" | "3" => Ok(Shift::Shift3),
            other => Err(format!("未知班次: {}", other)),
        }
    }
}

// ==========================================
// 发运状态 (Shipment Status)
// ==========================================
// 顺序: NoShip < OnSchedule < TightSchedule < DelayRisk < Late
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipmentStatus {
    NoShip,        // 无船期 / 船期过旧
    OnSchedule,    // 按期
    TightSchedule, // 时间紧
    DelayRisk,     // 延误风险
    Late,          // 已逾期
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShipmentStatus::NoShip => write!(f, "NO_SHIP"),
            ShipmentStatus::OnSchedule => write!(f, "ON_SCHEDULE"),
            ShipmentStatus::TightSchedule => write!(f, "TIGHT_SCHEDULE"),
            ShipmentStatus::DelayRisk => write!(f, "DELAY_RISK"),
            ShipmentStatus::Late => write!(f, "LATE"),
        }
    }
}

// ==========================================
// 延误风险等级 (Delay Risk Level)
// ==========================================
// 顺序: None < Low < Medium < High < Critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DelayRiskLevel {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for DelayRiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DelayRiskLevel::None => write!(f, "NONE"),
            DelayRiskLevel::Low => write!(f, "LOW"),
            DelayRiskLevel::Medium => write!(f, "MEDIUM"),
            DelayRiskLevel::High => write!(f, "HIGH"),
            DelayRiskLevel::Critical => write!(f, "CRITICAL"),
        }
    }
}

// ==========================================
// 周期预测来源
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionSource {
    Predictor, // 预测服务输出
    Fallback,  // 闭式估算兜底
}

// ==========================================
// 策略目标 (Strategy Objective)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum StrategyObjective {
    MaxProfit,
    TargetProduction { target_tons: f64 },
    FastestCycle,
    ShortestRoute,
}

impl StrategyObjective {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyObjective::MaxProfit => "max_profit",
            StrategyObjective::TargetProduction { .. } => "target_production",
            StrategyObjective::FastestCycle => "fastest_cycle",
            StrategyObjective::ShortestRoute => "shortest_route",
        }
    }

    pub fn title_cn(&self) -> String {
        match self {
            StrategyObjective::MaxProfit => "利润最大".to_string(),
            StrategyObjective::TargetProduction { target_tons } => {
                format!("产量目标 ({:.0} 吨)", target_tons)
            }
            StrategyObjective::FastestCycle => "周期最短".to_string(),
            StrategyObjective::ShortestRoute => "运距最短".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_parsing_accepts_field_spellings() {
        assert_eq!("Hujan Ringan".parse::<Weather>().unwrap(), Weather::LightRain);
        assert_eq!("heavy_rain".parse::<Weather>().unwrap(), Weather::HeavyRain);
        assert_eq!("Cerah".parse::<Weather>().unwrap(), Weather::Clear);
        assert!("snow".parse::<Weather>().is_err());
    }

    #[test]
    fn test_speed_factors() {
        assert_eq!(Weather::LightRain.speed_factor(), 0.85);
        assert_eq!(Weather::HeavyRain.speed_factor(), 0.60);
        assert_eq!(Weather::Fog.speed_factor(), 1.0);
        assert_eq!(RoadCondition::Fair.speed_factor(), 0.9);
        assert_eq!(RoadCondition::Poor.speed_factor(), 0.7);
        assert_eq!(RoadCondition::Good.speed_factor(), 1.0);
    }

    #[test]
    fn test_status_assignability() {
        assert!(EquipmentStatus::Idle.is_assignable());
        assert!(EquipmentStatus::Operating.is_assignable());
        assert!(!EquipmentStatus::Maintenance.is_assignable());
        assert!(!EquipmentStatus::Breakdown.is_assignable());
        assert!(!EquipmentStatus::OutOfService.is_assignable());
    }

    #[test]
    fn test_shift_serde_names() {
        let json = serde_json::to_string(&Shift::Shift2).unwrap();
        assert_eq!(json, "\"SHIFT_2\"");
        assert_eq!("shift-3".parse::<Shift>().unwrap(), Shift::Shift3);
    }
}
