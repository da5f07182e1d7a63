// ==========================================
// 车队班次仿真 - 预测特征构建
// ==========================================
// 职责: 从车队快照 + 场景 + 仿真时刻构建特征向量
// 规则: 任一引用记录缺失 → 返回 None (引擎走兜底)
// ==========================================

use crate::domain::fleet::{Excavator, RoadSegment, Truck};
use crate::domain::scenario::SimulationScenario;
use crate::fleet::FleetRegistry;
use crate::predictor::CycleFeatures;
use chrono::{DateTime, Utc};

// ==========================================
// FeatureBuilder - 特征构建器
// ==========================================
pub struct FeatureBuilder<'a> {
    registry: &'a FleetRegistry,
    default_days_since_maintenance: f64,
}

impl<'a> FeatureBuilder<'a> {
    pub fn new(registry: &'a FleetRegistry, default_days_since_maintenance: f64) -> Self {
        Self {
            registry,
            default_days_since_maintenance,
        }
    }

    /// 构建单周期特征向量
    ///
    /// # 参数
    /// - `truck`: 卡车
    /// - `operator_id`: 司机ID (无司机时为 None)
    /// - `road`: 路段
    /// - `excavator`: 装载挖机 (未找到时为 None)
    /// - `scenario`: 场景
    /// - `at`: 周期开始的仿真时刻
    pub fn build(
        &self,
        truck: &Truck,
        operator_id: Option<&str>,
        road: &RoadSegment,
        excavator: Option<&Excavator>,
        scenario: &SimulationScenario,
        at: DateTime<Utc>,
    ) -> Option<CycleFeatures> {
        let operator = self.registry.operator(operator_id?)?;
        let excavator = excavator?;

        let truck_age_days = (at - truck.purchase_date).num_days() as f64;
        let days_since_maintenance = self
            .registry
            .last_completed_maintenance(&truck.id, at)
            .map(|d| (at - d).num_days() as f64)
            .unwrap_or(self.default_days_since_maintenance);

        Some(CycleFeatures {
            truck_capacity_t: truck.capacity_t,
            bucket_capacity_m3: excavator.bucket_capacity_m3,
            operator_rating: operator.rating,
            operator_experience_years: operator.experience_years,
            road_distance_km: road.distance_km,
            road_gradient_pct: road.gradient_pct,
            truck_age_days,
            days_since_maintenance,
            weather: scenario.weather,
            road_condition: scenario.road_condition,
            shift: scenario.shift,
            brand: truck.brand.clone(),
            excavator_model: excavator.model.clone(),
        })
    }
}
