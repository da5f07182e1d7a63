// ==========================================
// 车队班次仿真 - 车队领域模型
// ==========================================
// 职责: 卡车、挖掘机、司机、路段、船期、保养、运输历史
// 红线: 只读快照,仿真过程中不修改
// ==========================================

use crate::domain::types::{EquipmentStatus, RoadCondition, Shift};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Truck - 运输卡车
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Truck {
    pub id: String,
    pub name: Option<String>,
    pub brand: String,
    pub model: String,
    pub capacity_t: f64,                // 额定载重 (吨)
    pub fuel_rate_l_per_km: f64,        // 油耗 (升/公里)
    pub maintenance_cost_per_hour: f64, // 保养费用 (每小时)
    pub purchase_date: DateTime<Utc>,
    pub status: EquipmentStatus,
}

// ==========================================
// Excavator - 挖掘机
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Excavator {
    pub id: String,
    pub name: Option<String>,
    pub brand: String,
    pub model: String,
    pub bucket_capacity_m3: f64,
    pub production_rate_tph: f64, // 装载能力 (吨/小时)
    pub location: Option<String>,
    pub status: EquipmentStatus,
}

// ==========================================
// Operator - 司机
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operator {
    pub id: String,
    pub experience_years: f64,
    pub rating: f64,
    pub shift: Shift,
    #[serde(default)]
    pub monthly_salary: Option<f64>,
}

// ==========================================
// RoadSegment - 运输路段
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadSegment {
    pub id: String,
    pub name: Option<String>,
    pub distance_km: f64,
    pub gradient_pct: f64,
    pub condition: RoadCondition,
}

// ==========================================
// VesselSchedule - 船期
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VesselSchedule {
    pub id: String,
    pub vessel_id: String,
    pub planned_quantity_t: f64,
    #[serde(default)]
    pub actual_quantity_t: Option<f64>, // 缺失视为 0
    pub deadline: DateTime<Utc>,        // 计划离港装船截止时间
    pub status: String,
}

impl VesselSchedule {
    /// 剩余待装吨位 (不小于 0)
    pub fn remaining_quantity_t(&self) -> f64 {
        (self.planned_quantity_t - self.actual_quantity_t.unwrap_or(0.0)).max(0.0)
    }
}

// ==========================================
// Vessel - 船舶
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vessel {
    pub id: String,
    pub name: String,
}

// ==========================================
// MaintenanceLog - 保养记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceLog {
    pub truck_id: String,
    pub completed_at: DateTime<Utc>,
    pub status: String,
}

impl MaintenanceLog {
    pub fn is_completed(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case("COMPLETED")
    }
}

// ==========================================
// HaulingRecord - 历史运输周期记录 (用于参数标定)
// ==========================================
// 时长单位: 分钟
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HaulingRecord {
    #[serde(default)]
    pub shift: Option<Shift>,
    #[serde(default)]
    pub loading_minutes: Option<f64>,
    #[serde(default)]
    pub hauling_minutes: Option<f64>,
    #[serde(default)]
    pub dumping_minutes: Option<f64>,
    #[serde(default)]
    pub return_minutes: Option<f64>,
    #[serde(default)]
    pub distance_km: Option<f64>,
}
