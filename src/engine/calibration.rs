// ==========================================
// 车队班次仿真 - 作业参数标定
// ==========================================
// 职责: 从历史运输周期记录推导装卸时长与重/空载车速
// 输入: 历史运输记录 (分钟 / 公里)
// 输出: CalibratedTiming
// 红线: 永不失败,无有效历史时使用默认值
// ==========================================

use crate::domain::fleet::HaulingRecord;
use crate::domain::types::Shift;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// ===== 安全区间 =====
const LOADING_MINUTES_RANGE: (f64, f64) = (0.5, 15.0);
const DUMPING_MINUTES_RANGE: (f64, f64) = (0.5, 15.0);
const SPEED_KMH_RANGE: (f64, f64) = (5.0, 70.0);

// ==========================================
// CalibratedTiming - 标定结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibratedTiming {
    pub loading_minutes: f64,
    pub dumping_minutes: f64,
    pub haul_speed_kmh: f64,
    pub return_speed_kmh: f64,
    /// 参与标定的有效记录数 (0 表示默认值)
    pub sample_rows: usize,
}

impl Default for CalibratedTiming {
    fn default() -> Self {
        Self {
            loading_minutes: 3.0,
            dumping_minutes: 2.0,
            haul_speed_kmh: 25.0,
            return_speed_kmh: 30.0,
            sample_rows: 0,
        }
    }
}

impl CalibratedTiming {
    pub fn is_default(&self) -> bool {
        self.sample_rows == 0
    }
}

/// 有效记录的时长与运距
struct ValidRow {
    loading: f64,
    hauling: f64,
    dumping: f64,
    returning: f64,
    distance: f64,
}

fn valid_row(record: &HaulingRecord) -> Option<ValidRow> {
    let row = ValidRow {
        loading: record.loading_minutes?,
        hauling: record.hauling_minutes?,
        dumping: record.dumping_minutes?,
        returning: record.return_minutes?,
        distance: record.distance_km?,
    };
    let values = [row.loading, row.hauling, row.dumping, row.returning, row.distance];
    if values.iter().all(|v| v.is_finite() && *v > 0.0) {
        Some(row)
    } else {
        None
    }
}

fn clamp(value: f64, (lo, hi): (f64, f64)) -> f64 {
    value.max(lo).min(hi)
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    sum / n as f64
}

// ==========================================
// CalibrationEngine - 标定引擎
// ==========================================
pub struct CalibrationEngine {
    // 无状态引擎
}

impl CalibrationEngine {
    pub fn new() -> Self {
        Self {}
    }

    /// 基于全部历史记录标定
    pub fn calibrate(&self, history: &[HaulingRecord]) -> CalibratedTiming {
        let rows: Vec<ValidRow> = history.iter().filter_map(valid_row).collect();
        if rows.is_empty() {
            warn!(history_rows = history.len(), "无有效运输历史,使用默认作业参数");
            return CalibratedTiming::default();
        }

        let loading = mean(rows.iter().map(|r| r.loading));
        let dumping = mean(rows.iter().map(|r| r.dumping));
        let haul_speed = mean(rows.iter().map(|r| r.distance / (r.hauling / 60.0)));
        let return_speed = mean(rows.iter().map(|r| r.distance / (r.returning / 60.0)));

        let timing = CalibratedTiming {
            loading_minutes: clamp(loading, LOADING_MINUTES_RANGE),
            dumping_minutes: clamp(dumping, DUMPING_MINUTES_RANGE),
            haul_speed_kmh: clamp(haul_speed, SPEED_KMH_RANGE),
            return_speed_kmh: clamp(return_speed, SPEED_KMH_RANGE),
            sample_rows: rows.len(),
        };

        info!(
            rows = timing.sample_rows,
            loading_min = timing.loading_minutes,
            dumping_min = timing.dumping_minutes,
            haul_kmh = timing.haul_speed_kmh,
            return_kmh = timing.return_speed_kmh,
            "作业参数标定完成"
        );

        timing
    }

    /// 按班次标定 (该班次无有效记录时退回全量历史)
    pub fn calibrate_for_shift(&self, history: &[HaulingRecord], shift: Shift) -> CalibratedTiming {
        let same_shift: Vec<HaulingRecord> = history
            .iter()
            .filter(|r| r.shift == Some(shift))
            .cloned()
            .collect();

        if same_shift.iter().any(|r| valid_row(r).is_some()) {
            self.calibrate(&same_shift)
        } else {
            self.calibrate(history)
        }
    }
}

impl Default for CalibrationEngine {
    fn default() -> Self {
        Self::new()
    }
}
