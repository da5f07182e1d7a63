// ==========================================
// 车队班次仿真 - 配置层
// ==========================================
// 职责: 财务参数、仿真参数、搜索参数,支持多级覆写
// ==========================================

pub mod financial;
pub mod simulation;

// 重导出核心配置
pub use financial::{config_keys, FinancialConfig, FinancialOverrides};
pub use simulation::{SearchConfig, SimulationConfig};
