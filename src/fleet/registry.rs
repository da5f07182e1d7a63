// ==========================================
// 车队班次仿真 - 车队注册表
// ==========================================
// 职责: 请求级只读车队快照,按 ID 索引的类型化表
// 生命周期: 每个请求加载一次,多个仿真线程通过 Arc 共享
// 红线: 卡车集合为空 → DataUnavailable
// ==========================================

use crate::domain::fleet::{
    Excavator, HaulingRecord, MaintenanceLog, Operator, RoadSegment, Truck, Vessel, VesselSchedule,
};
use crate::error::{SimResult, SimulationError};
use crate::fleet::source::{FleetDataSource, FleetRecords};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tracing::{info, warn};

/// 船期逾期超过该天数视为过旧,不参与采样
pub const STALE_SCHEDULE_DAYS: i64 = 30;

// ==========================================
// Keyed - 表主键
// ==========================================
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Truck {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Excavator {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Operator {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for RoadSegment {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for VesselSchedule {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Vessel {
    fn key(&self) -> &str {
        &self.id
    }
}

// ==========================================
// Table - 按 ID 索引的只读表
// ==========================================
// 保持源数据顺序;重复 ID 保留首条
#[derive(Debug, Clone)]
pub struct Table<T> {
    rows: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T: Keyed> Table<T> {
    pub fn from_rows(rows: Vec<T>) -> Self {
        let mut kept = Vec::with_capacity(rows.len());
        let mut index = HashMap::with_capacity(rows.len());
        for row in rows {
            if index.contains_key(row.key()) {
                warn!(id = %row.key(), "重复ID,忽略后续记录");
                continue;
            }
            index.insert(row.key().to_string(), kept.len());
            kept.push(row);
        }
        Self { rows: kept, index }
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&i| &self.rows[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.rows.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ==========================================
// FleetRegistry - 车队注册表
// ==========================================
#[derive(Debug, Clone)]
pub struct FleetRegistry {
    as_of: DateTime<Utc>,
    trucks: Table<Truck>,
    excavators: Table<Excavator>,
    operators: Table<Operator>,
    roads: Table<RoadSegment>,
    schedules: Table<VesselSchedule>,
    vessels: Table<Vessel>,
    /// truck_id → 已完成保养时间 (升序)
    maintenance: HashMap<String, Vec<DateTime<Utc>>>,
    hauling_history: Vec<HaulingRecord>,
    system_configs: HashMap<String, String>,
}

impl FleetRegistry {
    /// 从数据源加载快照
    pub async fn load(source: &dyn FleetDataSource, as_of: DateTime<Utc>) -> SimResult<Self> {
        let records = source.fetch_records(as_of).await?;
        Self::from_records(records, as_of)
    }

    /// 从原始记录构建快照
    ///
    /// # 规则
    /// - 载重非正的卡车、运距非正的路段被剔除
    /// - 只保留 COMPLETED 保养记录
    pub fn from_records(records: FleetRecords, as_of: DateTime<Utc>) -> SimResult<Self> {
        let FleetRecords {
            trucks,
            excavators,
            operators,
            roads,
            schedules,
            vessels,
            maintenance,
            hauling_history,
            system_configs,
        } = records;

        let total_trucks = trucks.len();
        let trucks: Vec<Truck> = trucks
            .into_iter()
            .filter(|t| t.capacity_t.is_finite() && t.capacity_t > 0.0)
            .collect();
        if trucks.len() < total_trucks {
            warn!(
                dropped = total_trucks - trucks.len(),
                "剔除载重非法的卡车"
            );
        }
        if trucks.is_empty() {
            return Err(SimulationError::DataUnavailable("卡车集合为空".to_string()));
        }

        let total_roads = roads.len();
        let roads: Vec<RoadSegment> = roads
            .into_iter()
            .filter(|r| r.distance_km.is_finite() && r.distance_km > 0.0)
            .collect();
        if roads.len() < total_roads {
            warn!(dropped = total_roads - roads.len(), "剔除运距非法的路段");
        }

        let maintenance = Self::index_maintenance(maintenance);

        let registry = Self {
            as_of,
            trucks: Table::from_rows(trucks),
            excavators: Table::from_rows(excavators),
            operators: Table::from_rows(operators),
            roads: Table::from_rows(roads),
            schedules: Table::from_rows(schedules),
            vessels: Table::from_rows(vessels),
            maintenance,
            hauling_history,
            system_configs,
        };

        info!(
            trucks = registry.trucks.len(),
            excavators = registry.excavators.len(),
            operators = registry.operators.len(),
            roads = registry.roads.len(),
            schedules = registry.schedules.len(),
            "车队快照加载完成"
        );

        Ok(registry)
    }

    fn index_maintenance(logs: Vec<MaintenanceLog>) -> HashMap<String, Vec<DateTime<Utc>>> {
        let mut by_truck: HashMap<String, Vec<DateTime<Utc>>> = HashMap::new();
        for log in logs.into_iter().filter(|l| l.is_completed()) {
            by_truck.entry(log.truck_id).or_default().push(log.completed_at);
        }
        for dates in by_truck.values_mut() {
            dates.sort();
        }
        by_truck
    }

    // ==========================================
    // 按 ID 查询
    // ==========================================

    pub fn as_of(&self) -> DateTime<Utc> {
        self.as_of
    }

    pub fn truck(&self, id: &str) -> Option<&Truck> {
        self.trucks.get(id)
    }

    pub fn excavator(&self, id: &str) -> Option<&Excavator> {
        self.excavators.get(id)
    }

    pub fn operator(&self, id: &str) -> Option<&Operator> {
        self.operators.get(id)
    }

    pub fn road(&self, id: &str) -> Option<&RoadSegment> {
        self.roads.get(id)
    }

    pub fn schedule(&self, id: &str) -> Option<&VesselSchedule> {
        self.schedules.get(id)
    }

    pub fn vessel(&self, id: &str) -> Option<&Vessel> {
        self.vessels.get(id)
    }

    pub fn trucks(&self) -> &Table<Truck> {
        &self.trucks
    }

    pub fn excavators(&self) -> &Table<Excavator> {
        &self.excavators
    }

    pub fn operators(&self) -> &Table<Operator> {
        &self.operators
    }

    pub fn roads(&self) -> &Table<RoadSegment> {
        &self.roads
    }

    pub fn schedules(&self) -> &Table<VesselSchedule> {
        &self.schedules
    }

    pub fn hauling_history(&self) -> &[HaulingRecord] {
        &self.hauling_history
    }

    pub fn system_configs(&self) -> &HashMap<String, String> {
        &self.system_configs
    }

    // ==========================================
    // 派车池与派生查询
    // ==========================================

    /// 可派卡车 (排除保养/故障/停用)
    pub fn active_trucks(&self) -> Vec<&Truck> {
        self.trucks.iter().filter(|t| t.status.is_assignable()).collect()
    }

    /// 可派挖掘机 (排除保养/故障/停用)
    pub fn active_excavators(&self) -> Vec<&Excavator> {
        self.excavators.iter().filter(|e| e.status.is_assignable()).collect()
    }

    /// 指定时间之前 (严格小于) 最近一次已完成保养
    pub fn last_completed_maintenance(
        &self,
        truck_id: &str,
        before: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        let dates = self.maintenance.get(truck_id)?;
        let idx = dates.partition_point(|d| *d < before);
        if idx == 0 {
            None
        } else {
            Some(dates[idx - 1])
        }
    }

    /// 可参与采样的船期 (逾期不超过 30 天)
    pub fn sampleable_schedules(&self) -> Vec<&VesselSchedule> {
        let cutoff = self.as_of - Duration::days(STALE_SCHEDULE_DAYS);
        self.schedules.iter().filter(|s| s.deadline > cutoff).collect()
    }

    /// 司机平均月薪 (无薪资数据时返回 None)
    pub fn mean_operator_salary(&self) -> Option<f64> {
        let salaries: Vec<f64> = self
            .operators
            .iter()
            .filter_map(|o| o.monthly_salary)
            .filter(|s| s.is_finite() && *s > 0.0)
            .collect();
        if salaries.is_empty() {
            None
        } else {
            Some(salaries.iter().sum::<f64>() / salaries.len() as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{EquipmentStatus, RoadCondition, Shift};
    use chrono::TimeZone;

    fn ts(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
    }

    fn truck(id: &str, capacity: f64, status: EquipmentStatus) -> Truck {
        Truck {
            id: id.to_string(),
            name: None,
            brand: "HINO".to_string(),
            model: "FM260".to_string(),
            capacity_t: capacity,
            fuel_rate_l_per_km: 1.0,
            maintenance_cost_per_hour: 100.0,
            purchase_date: ts(1, 0),
            status,
        }
    }

    fn records() -> FleetRecords {
        FleetRecords {
            trucks: vec![
                truck("T1", 30.0, EquipmentStatus::Idle),
                truck("T2", 30.0, EquipmentStatus::Maintenance),
                truck("T3", 0.0, EquipmentStatus::Idle),
                truck("T4", 25.0, EquipmentStatus::OutOfService),
            ],
            roads: vec![RoadSegment {
                id: "R1".to_string(),
                name: None,
                distance_km: 4.0,
                gradient_pct: 2.0,
                condition: RoadCondition::Good,
            }],
            operators: vec![
                Operator {
                    id: "O1".to_string(),
                    experience_years: 3.0,
                    rating: 4.0,
                    shift: Shift::Shift1,
                    monthly_salary: Some(4_000_000.0),
                },
                Operator {
                    id: "O2".to_string(),
                    experience_years: 5.0,
                    rating: 4.5,
                    shift: Shift::Shift1,
                    monthly_salary: Some(6_000_000.0),
                },
            ],
            maintenance: vec![
                MaintenanceLog {
                    truck_id: "T1".to_string(),
                    completed_at: ts(5, 8),
                    status: "COMPLETED".to_string(),
                },
                MaintenanceLog {
                    truck_id: "T1".to_string(),
                    completed_at: ts(10, 8),
                    status: "COMPLETED".to_string(),
                },
                MaintenanceLog {
                    truck_id: "T1".to_string(),
                    completed_at: ts(8, 8),
                    status: "SCHEDULED".to_string(),
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_trucks_is_data_unavailable() {
        let result = FleetRegistry::from_records(FleetRecords::default(), ts(15, 0));
        assert!(matches!(result, Err(SimulationError::DataUnavailable(_))));
    }

    #[test]
    fn test_invalid_capacity_dropped_and_status_filter() {
        let registry = FleetRegistry::from_records(records(), ts(15, 0)).unwrap();
        assert_eq!(registry.trucks().len(), 3);
        assert!(registry.truck("T3").is_none());

        let active: Vec<&str> = registry.active_trucks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(active, vec!["T1"]);
    }

    #[test]
    fn test_last_completed_maintenance_strictly_before() {
        let registry = FleetRegistry::from_records(records(), ts(15, 0)).unwrap();

        assert_eq!(registry.last_completed_maintenance("T1", ts(12, 0)), Some(ts(10, 8)));
        // 严格小于: 恰好等于完成时间时取上一条
        assert_eq!(registry.last_completed_maintenance("T1", ts(10, 8)), Some(ts(5, 8)));
        // 非 COMPLETED 记录不计入
        assert_eq!(registry.last_completed_maintenance("T1", ts(9, 0)), Some(ts(5, 8)));
        assert_eq!(registry.last_completed_maintenance("T1", ts(5, 8)), None);
        assert_eq!(registry.last_completed_maintenance("T2", ts(12, 0)), None);
    }

    #[test]
    fn test_mean_operator_salary() {
        let registry = FleetRegistry::from_records(records(), ts(15, 0)).unwrap();
        assert_eq!(registry.mean_operator_salary(), Some(5_000_000.0));
    }

    #[test]
    fn test_stale_schedules_excluded_from_sampling() {
        let mut recs = records();
        recs.schedules = vec![
            VesselSchedule {
                id: "S-FRESH".to_string(),
                vessel_id: "V1".to_string(),
                planned_quantity_t: 5000.0,
                actual_quantity_t: None,
                deadline: ts(20, 0),
                status: "SCHEDULED".to_string(),
            },
            VesselSchedule {
                id: "S-OLD".to_string(),
                vessel_id: "V1".to_string(),
                planned_quantity_t: 5000.0,
                actual_quantity_t: None,
                deadline: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
                status: "SCHEDULED".to_string(),
            },
        ];
        let registry = FleetRegistry::from_records(recs, ts(15, 0)).unwrap();
        let ids: Vec<&str> = registry.sampleable_schedules().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["S-FRESH"]);
        assert!(registry.schedule("S-OLD").is_some(), "过旧船期仍可按ID查询");
    }
}
