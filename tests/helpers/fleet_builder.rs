// ==========================================
// 车队数据构建器 - 用于集成测试
// ==========================================

use chrono::{DateTime, TimeZone, Utc};
use haul_fleet_sim::domain::fleet::{
    Excavator, HaulingRecord, MaintenanceLog, Operator, RoadSegment, Truck, Vessel, VesselSchedule,
};
use haul_fleet_sim::domain::types::{EquipmentStatus, RoadCondition, Shift};

// ==========================================
// Truck 构建器
// ==========================================

pub struct TruckBuilder {
    id: String,
    brand: String,
    capacity_t: f64,
    fuel_rate_l_per_km: f64,
    maintenance_cost_per_hour: f64,
    purchase_date: DateTime<Utc>,
    status: EquipmentStatus,
}

impl TruckBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            brand: "HINO".to_string(),
            capacity_t: 30.0,
            fuel_rate_l_per_km: 1.2,
            maintenance_cost_per_hour: 150_000.0,
            purchase_date: Utc.with_ymd_and_hms(2022, 6, 1, 0, 0, 0).unwrap(),
            status: EquipmentStatus::Idle,
        }
    }

    pub fn brand(mut self, brand: &str) -> Self {
        self.brand = brand.to_string();
        self
    }

    pub fn capacity(mut self, capacity_t: f64) -> Self {
        self.capacity_t = capacity_t;
        self
    }

    pub fn fuel_rate(mut self, rate: f64) -> Self {
        self.fuel_rate_l_per_km = rate;
        self
    }

    pub fn maintenance_rate(mut self, per_hour: f64) -> Self {
        self.maintenance_cost_per_hour = per_hour;
        self
    }

    pub fn status(mut self, status: EquipmentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn build(self) -> Truck {
        Truck {
            id: self.id,
            name: None,
            brand: self.brand,
            model: "FM260JD".to_string(),
            capacity_t: self.capacity_t,
            fuel_rate_l_per_km: self.fuel_rate_l_per_km,
            maintenance_cost_per_hour: self.maintenance_cost_per_hour,
            purchase_date: self.purchase_date,
            status: self.status,
        }
    }
}

// ==========================================
// Excavator 构建器
// ==========================================

pub struct ExcavatorBuilder {
    id: String,
    model: String,
    status: EquipmentStatus,
}

impl ExcavatorBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            model: "PC400".to_string(),
            status: EquipmentStatus::Operating,
        }
    }

    pub fn model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn status(mut self, status: EquipmentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn build(self) -> Excavator {
        Excavator {
            id: self.id,
            name: None,
            brand: "KOMATSU".to_string(),
            model: self.model,
            bucket_capacity_m3: 2.5,
            production_rate_tph: 600.0,
            location: Some("PIT-A".to_string()),
            status: self.status,
        }
    }
}

// ==========================================
// 简单记录
// ==========================================

pub fn operator(id: &str, salary: Option<f64>) -> Operator {
    Operator {
        id: id.to_string(),
        experience_years: 4.0,
        rating: 4.2,
        shift: Shift::Shift1,
        monthly_salary: salary,
    }
}

pub fn road(id: &str, distance_km: f64) -> RoadSegment {
    RoadSegment {
        id: id.to_string(),
        name: Some(format!("Haul Road {}", id)),
        distance_km,
        gradient_pct: 3.0,
        condition: RoadCondition::Good,
    }
}

pub fn vessel(id: &str, name: &str) -> Vessel {
    Vessel {
        id: id.to_string(),
        name: name.to_string(),
    }
}

pub fn schedule(
    id: &str,
    vessel_id: &str,
    planned_t: f64,
    actual_t: Option<f64>,
    deadline: DateTime<Utc>,
) -> VesselSchedule {
    VesselSchedule {
        id: id.to_string(),
        vessel_id: vessel_id.to_string(),
        planned_quantity_t: planned_t,
        actual_quantity_t: actual_t,
        deadline,
        status: "SCHEDULED".to_string(),
    }
}

pub fn maintenance(truck_id: &str, completed_at: DateTime<Utc>) -> MaintenanceLog {
    MaintenanceLog {
        truck_id: truck_id.to_string(),
        completed_at,
        status: "COMPLETED".to_string(),
    }
}

/// 历史运输记录 (分钟 / 公里)
pub fn hauling_record(
    shift: Shift,
    loading: f64,
    hauling: f64,
    dumping: f64,
    returning: f64,
    distance_km: f64,
) -> HaulingRecord {
    HaulingRecord {
        shift: Some(shift),
        loading_minutes: Some(loading),
        hauling_minutes: Some(hauling),
        dumping_minutes: Some(dumping),
        return_minutes: Some(returning),
        distance_km: Some(distance_km),
    }
}
