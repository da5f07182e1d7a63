// ==========================================
// 标准测试车队
// ==========================================
// 12 辆可派卡车 + 1 辆保养中, 3 台可派挖机 + 1 台故障
// 6 名司机, 3 条路段 (3 / 5 / 8 km), 1 艘船
// ==========================================

use super::fleet_builder::{
    hauling_record, operator, road, schedule, vessel, ExcavatorBuilder, TruckBuilder,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use haul_fleet_sim::domain::types::{EquipmentStatus, Shift};
use haul_fleet_sim::{
    FleetRecords, FleetRegistry, PredictiveService, SimulationContext, SimulationScenario,
};
use std::sync::Arc;

/// 班次开始时间: 2025-03-01 06:00 UTC
pub fn shift_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 6, 0, 0).unwrap()
}

pub fn standard_records() -> FleetRecords {
    let mut trucks: Vec<_> = (1..=12)
        .map(|i| TruckBuilder::new(&format!("T{:02}", i)).build())
        .collect();
    trucks.push(
        TruckBuilder::new("T99")
            .status(EquipmentStatus::Maintenance)
            .build(),
    );

    let excavators = vec![
        ExcavatorBuilder::new("E1").build(),
        ExcavatorBuilder::new("E2").model("PC200").build(),
        ExcavatorBuilder::new("E3").build(),
        ExcavatorBuilder::new("E9")
            .status(EquipmentStatus::Breakdown)
            .build(),
    ];

    FleetRecords {
        trucks,
        excavators,
        operators: (1..=6)
            .map(|i| operator(&format!("O{}", i), Some(5_000_000.0)))
            .collect(),
        roads: vec![road("R1", 3.0), road("R2", 5.0), road("R3", 8.0)],
        vessels: vec![vessel("V1", "MV Mahakam")],
        ..Default::default()
    }
}

/// 在标准车队上追加三类船期
///
/// - S_OK: 10 天后截止, 剩余 15000 吨
/// - S_LATE: 2 小时前截止
/// - S_OLD: 40 天前截止 (过旧)
pub fn with_schedules(mut records: FleetRecords) -> FleetRecords {
    let start = shift_start();
    records.schedules = vec![
        schedule("S_OK", "V1", 20_000.0, Some(5_000.0), start + Duration::days(10)),
        schedule("S_LATE", "V1", 10_000.0, None, start - Duration::hours(2)),
        schedule("S_OLD", "V1", 10_000.0, None, start - Duration::days(40)),
    ];
    records
}

/// 在标准车队上追加历史运输记录 (SHIFT_1)
pub fn with_history(mut records: FleetRecords) -> FleetRecords {
    records.hauling_history = (0..10)
        .map(|_| hauling_record(Shift::Shift1, 4.0, 12.0, 3.0, 10.0, 5.0))
        .collect();
    records
}

pub fn registry(records: FleetRecords) -> Arc<FleetRegistry> {
    Arc::new(FleetRegistry::from_records(records, shift_start()).expect("车队快照构建失败"))
}

pub fn context(records: FleetRecords, predictor: Arc<dyn PredictiveService>) -> SimulationContext {
    haul_fleet_sim::logging::init_test();
    SimulationContext::new(registry(records), predictor)
}

pub fn scenario(trucks: u32, excavators: u32, road_id: &str) -> SimulationScenario {
    SimulationScenario::new(trucks, excavators, road_id, "E1", shift_start()).with_seed(42)
}
