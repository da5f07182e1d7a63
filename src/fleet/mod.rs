// ==========================================
// 车队班次仿真 - 车队数据层
// ==========================================
// 职责: 车队数据源接口 + 请求级只读注册表
// ==========================================

pub mod registry;
pub mod source;

pub use registry::{FleetRegistry, Keyed, Table, STALE_SCHEDULE_DAYS};
pub use source::{FleetDataSource, FleetRecords, InMemoryFleetSource};
