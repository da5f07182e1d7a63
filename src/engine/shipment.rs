// ==========================================
// 车队班次仿真 - 船期风险评估
// ==========================================
// 职责: 以单班产出推算日产能,判定船期状态与滞期成本
// 规则: 无船期 / 逾期超过30天 → NO_SHIP,不计成本
// 红线: 过旧船期永不判为 LATE
// ==========================================

use crate::config::FinancialConfig;
use crate::domain::result::ShipmentVerdict;
use crate::domain::types::{DelayRiskLevel, ShipmentStatus};
use crate::fleet::{FleetRegistry, STALE_SCHEDULE_DAYS};
use chrono::{DateTime, Utc};
use tracing::debug;

/// 每日有效作业小时 (两班)
pub const EFFECTIVE_HOURS_PER_DAY: f64 = 16.0;

/// 产能为零时的所需小时占位值
pub const UNREACHABLE_HOURS: f64 = 9999.0;

// ===== 风险阈值 (小时) =====
const TIGHT_WINDOW_HOURS: f64 = 24.0;
const HIGH_SHORTFALL_HOURS: f64 = 24.0;
const CRITICAL_SHORTFALL_HOURS: f64 = 48.0;

// ==========================================
// ShipmentRiskEvaluator - 船期风险评估器
// ==========================================
pub struct ShipmentRiskEvaluator {
    // 无状态评估器
}

impl ShipmentRiskEvaluator {
    pub fn new() -> Self {
        Self {}
    }

    /// 评估船期风险
    ///
    /// # 参数
    /// - `registry`: 车队快照
    /// - `schedule_id`: 场景绑定的船期
    /// - `run_tonnage_t`: 本次仿真总产量
    /// - `run_hours`: 本次仿真时长
    /// - `now`: 评估时刻 (班次开始)
    /// - `config`: 财务参数 (罚金/滞期费率)
    pub fn evaluate(
        &self,
        registry: &FleetRegistry,
        schedule_id: Option<&str>,
        run_tonnage_t: f64,
        run_hours: f64,
        now: DateTime<Utc>,
        config: &FinancialConfig,
    ) -> ShipmentVerdict {
        let schedule = match schedule_id.and_then(|id| registry.schedule(id)) {
            Some(s) => s,
            None => {
                return ShipmentVerdict::no_ship(match schedule_id {
                    Some(id) => format!("船期不存在: {}", id),
                    None => "未绑定船期".to_string(),
                })
            }
        };

        let vessel_name = registry
            .vessel(&schedule.vessel_id)
            .map(|v| v.name.clone())
            .unwrap_or_else(|| schedule.vessel_id.clone());
        let remaining_target_t = schedule.remaining_quantity_t();
        let hours_remaining = (schedule.deadline - now).num_seconds() as f64 / 3600.0;

        let daily_rate = if run_hours > 0.0 {
            run_tonnage_t / run_hours * EFFECTIVE_HOURS_PER_DAY
        } else {
            0.0
        };
        let hours_needed = if remaining_target_t <= 0.0 {
            0.0
        } else if daily_rate > 0.0 {
            remaining_target_t / daily_rate * 24.0
        } else {
            UNREACHABLE_HOURS
        };
        let days_to_complete = hours_needed / 24.0;

        let base = ShipmentVerdict {
            vessel_name: Some(vessel_name.clone()),
            remaining_target_t,
            hours_remaining,
            hours_needed,
            days_to_complete,
            ..ShipmentVerdict::no_ship(String::new())
        };

        // ===== 已过截止时间 =====
        if hours_remaining <= 0.0 {
            let hours_late = -hours_remaining;
            if hours_late > (STALE_SCHEDULE_DAYS * 24) as f64 {
                debug!(schedule_id = %schedule.id, hours_late, "船期过旧,按无船期处理");
                return ShipmentVerdict {
                    reason: format!("船期 {} 已逾期 {:.0} 小时,视为过旧", vessel_name, hours_late),
                    ..base
                };
            }
            return ShipmentVerdict {
                status: ShipmentStatus::Late,
                risk_level: DelayRiskLevel::Critical,
                demurrage_cost: config.late_penalty_flat + hours_late * config.demurrage_per_hour,
                reason: format!("船期 {} 已逾期 {:.1} 小时", vessel_name, hours_late),
                ..base
            };
        }

        // ===== 截止时间之前 =====
        let variance = hours_remaining - hours_needed;
        if variance < 0.0 {
            let shortfall = variance.abs();
            let risk_level = if shortfall > CRITICAL_SHORTFALL_HOURS {
                DelayRiskLevel::Critical
            } else if shortfall > HIGH_SHORTFALL_HOURS {
                DelayRiskLevel::High
            } else {
                DelayRiskLevel::Medium
            };
            ShipmentVerdict {
                status: ShipmentStatus::DelayRisk,
                risk_level,
                demurrage_cost: shortfall * config.demurrage_per_hour,
                reason: format!(
                    "按当前产能需 {:.1} 小时,剩余 {:.1} 小时,缺口 {:.1} 小时",
                    hours_needed, hours_remaining, shortfall
                ),
                ..base
            }
        } else if variance < TIGHT_WINDOW_HOURS {
            ShipmentVerdict {
                status: ShipmentStatus::TightSchedule,
                risk_level: DelayRiskLevel::Medium,
                reason: format!("余量仅 {:.1} 小时", variance),
                ..base
            }
        } else {
            ShipmentVerdict {
                status: ShipmentStatus::OnSchedule,
                risk_level: DelayRiskLevel::Low,
                reason: format!("余量 {:.1} 小时", variance),
                ..base
            }
        }
    }
}

impl Default for ShipmentRiskEvaluator {
    fn default() -> Self {
        Self::new()
    }
}
