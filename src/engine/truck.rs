// ==========================================
// 车队班次仿真 - 卡车周期进程
// ==========================================
// 职责: 单车循环状态机 + 周期预测 (预测服务 / 闭式兜底)
// 状态: HAUL_LOADED → QUEUE_WAIT → LOADING → RETURN_EMPTY → DUMPING → 循环
// 红线: 周期完成前不计入任何产量/油耗 (班次结束时在途周期作废)
// ==========================================

use crate::config::SimulationConfig;
use crate::domain::fleet::{RoadSegment, Truck};
use crate::domain::result::CycleOutcome;
use crate::domain::scenario::SimulationScenario;
use crate::domain::types::PredictionSource;
use crate::engine::calibration::CalibratedTiming;
use crate::error::{SimResult, SimulationError};
use crate::predictor::{CycleFeatures, PredictiveService};
use rand::Rng;
use std::fmt;
use tracing::debug;

// ==========================================
// CyclePhase - 周期阶段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    /// 等待下一周期开始
    Idle,
    HaulLoaded,
    QueueWait,
    Loading,
    ReturnEmpty,
    Dumping,
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CyclePhase::Idle => "IDLE",
            CyclePhase::HaulLoaded => "HAUL_LOADED",
            CyclePhase::QueueWait => "QUEUE_WAIT",
            CyclePhase::Loading => "LOADING",
            CyclePhase::ReturnEmpty => "RETURN_EMPTY",
            CyclePhase::Dumping => "DUMPING",
        };
        write!(f, "{}", s)
    }
}

// ==========================================
// PhaseDurations - 单场景固定阶段时长 (小时)
// ==========================================
// 排队时长由资源池决定,不在此列
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseDurations {
    pub haul_hours: f64,
    pub loading_hours: f64,
    pub return_hours: f64,
    pub dumping_hours: f64,
}

impl PhaseDurations {
    /// 按标定参数 + 天气/路况系数计算
    ///
    /// # 规则
    /// - 重/空载时长 = 运距 / (车速 × 天气系数 × 路况系数)
    /// - 雨天装载时长 × rain_loading_factor
    pub fn for_scenario(
        timing: &CalibratedTiming,
        config: &SimulationConfig,
        road: &RoadSegment,
        scenario: &SimulationScenario,
    ) -> Self {
        let factor = scenario.weather.speed_factor() * scenario.road_condition.speed_factor();
        let loading_minutes = if scenario.weather.is_rain() {
            timing.loading_minutes * config.rain_loading_factor
        } else {
            timing.loading_minutes
        };

        Self {
            haul_hours: road.distance_km / (timing.haul_speed_kmh * factor),
            loading_hours: loading_minutes / 60.0,
            return_hours: road.distance_km / (timing.return_speed_kmh * factor),
            dumping_hours: timing.dumping_minutes / 60.0,
        }
    }

    /// 无排队的名义周期时长
    pub fn nominal_cycle_hours(&self) -> f64 {
        self.haul_hours + self.loading_hours + self.return_hours + self.dumping_hours
    }
}

// ==========================================
// PredictedCycle - 周期开始时确定的产出
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictedCycle {
    pub load_t: f64,
    pub fuel_l: f64,
    pub delay_probability: f64,
    pub risk_score: f64,
    pub source: PredictionSource,
}

// ==========================================
// CycleEstimator - 周期产出估算
// ==========================================
pub struct CycleEstimator<'a> {
    predictor: &'a dyn PredictiveService,
    config: &'a SimulationConfig,
    road_distance_km: f64,
}

impl<'a> CycleEstimator<'a> {
    pub fn new(
        predictor: &'a dyn PredictiveService,
        config: &'a SimulationConfig,
        road_distance_km: f64,
    ) -> Self {
        Self {
            predictor,
            config,
            road_distance_km,
        }
    }

    /// 估算单周期产出
    ///
    /// 特征缺失、预测失败或无输出时走闭式兜底
    pub fn estimate<R: Rng + ?Sized>(
        &self,
        truck: &TruckProcess,
        features: Option<&CycleFeatures>,
        rng: &mut R,
    ) -> PredictedCycle {
        if let Some(features) = features {
            match self.predictor.predict(features).and_then(|p| match p {
                Some(p) => p.sanitized().map(Some),
                None => Ok(None),
            }) {
                Ok(Some(p)) => {
                    return PredictedCycle {
                        load_t: p.load_t,
                        fuel_l: p.fuel_l * self.config.predicted_fuel_multiplier,
                        delay_probability: p.delay_probability,
                        risk_score: p.risk_score,
                        source: PredictionSource::Predictor,
                    };
                }
                Ok(None) => {}
                Err(e) => {
                    debug!(truck_id = %truck.truck_id, error = %e, "预测失败,使用兜底估算");
                }
            }
        }
        self.fallback(truck, rng)
    }

    /// 闭式兜底: 油耗 = 运距×2×油耗率, 装载 = 载重×装载系数, 各带 ±jitter
    fn fallback<R: Rng + ?Sized>(&self, truck: &TruckProcess, rng: &mut R) -> PredictedCycle {
        let j = self.config.jitter_pct;
        let fuel_jitter = rng.gen_range((1.0 - j)..=(1.0 + j));
        let load_jitter = rng.gen_range((1.0 - j)..=(1.0 + j));

        PredictedCycle {
            load_t: truck.capacity_t * self.config.fallback_load_factor * load_jitter,
            fuel_l: self.road_distance_km * 2.0 * truck.fuel_rate_l_per_km * fuel_jitter,
            delay_probability: self.config.fallback_delay_probability,
            risk_score: self.config.fallback_risk_score,
            source: PredictionSource::Fallback,
        }
    }
}

/// 在途周期
#[derive(Debug, Clone, Copy)]
struct InFlightCycle {
    prediction: PredictedCycle,
    haul_hours: f64,
    queue_hours: f64,
    loading_hours: f64,
    return_hours: f64,
}

// ==========================================
// TruckProcess - 单车进程
// ==========================================
#[derive(Debug, Clone)]
pub struct TruckProcess {
    pub slot: usize,
    pub truck_id: String,
    pub operator_id: Option<String>,
    pub capacity_t: f64,
    pub fuel_rate_l_per_km: f64,
    pub maintenance_cost_per_hour: f64,
    phase: CyclePhase,
    cycle: Option<InFlightCycle>,
}

impl TruckProcess {
    pub fn new(slot: usize, truck: &Truck, operator_id: Option<String>) -> Self {
        Self {
            slot,
            truck_id: truck.id.clone(),
            operator_id,
            capacity_t: truck.capacity_t,
            fuel_rate_l_per_km: truck.fuel_rate_l_per_km,
            maintenance_cost_per_hour: truck.maintenance_cost_per_hour,
            phase: CyclePhase::Idle,
            cycle: None,
        }
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    fn transition(&mut self, from: CyclePhase, to: CyclePhase) -> SimResult<()> {
        if self.phase != from {
            return Err(SimulationError::InternalError(format!(
                "卡车 {} 非法状态转换: {} -> {} (期望 {})",
                self.truck_id, self.phase, to, from
            )));
        }
        self.phase = to;
        Ok(())
    }

    fn in_flight(&mut self) -> SimResult<&mut InFlightCycle> {
        let truck_id = &self.truck_id;
        self.cycle
            .as_mut()
            .ok_or_else(|| SimulationError::InternalError(format!("卡车 {} 无在途周期", truck_id)))
    }

    /// 开始新周期 (重载出发)
    ///
    /// # 返回
    /// 到达装载点的时刻
    pub fn begin_cycle(
        &mut self,
        now: f64,
        prediction: PredictedCycle,
        durations: &PhaseDurations,
    ) -> SimResult<f64> {
        self.transition(CyclePhase::Idle, CyclePhase::HaulLoaded)?;
        self.cycle = Some(InFlightCycle {
            prediction,
            haul_hours: durations.haul_hours,
            queue_hours: 0.0,
            loading_hours: 0.0,
            return_hours: 0.0,
        });
        Ok(now + durations.haul_hours)
    }

    /// 到达装载点,进入排队
    pub fn arrive_at_loader(&mut self) -> SimResult<()> {
        self.transition(CyclePhase::HaulLoaded, CyclePhase::QueueWait)
    }

    /// 获得挖机许可,开始装载
    ///
    /// # 返回
    /// 装载完成时刻
    pub fn start_loading(
        &mut self,
        now: f64,
        waited_hours: f64,
        durations: &PhaseDurations,
    ) -> SimResult<f64> {
        self.transition(CyclePhase::QueueWait, CyclePhase::Loading)?;
        let cycle = self.in_flight()?;
        cycle.queue_hours = waited_hours;
        cycle.loading_hours = durations.loading_hours;
        Ok(now + durations.loading_hours)
    }

    /// 装载完成,空载返回
    pub fn finish_loading(&mut self, now: f64, durations: &PhaseDurations) -> SimResult<f64> {
        self.transition(CyclePhase::Loading, CyclePhase::ReturnEmpty)?;
        self.in_flight()?.return_hours = durations.return_hours;
        Ok(now + durations.return_hours)
    }

    /// 返回完成,卸载
    pub fn finish_return(&mut self, now: f64, durations: &PhaseDurations) -> SimResult<f64> {
        self.transition(CyclePhase::ReturnEmpty, CyclePhase::Dumping)?;
        Ok(now + durations.dumping_hours)
    }

    /// 卸载完成,周期结算
    pub fn complete_cycle(&mut self, now: f64, durations: &PhaseDurations) -> SimResult<CycleOutcome> {
        self.transition(CyclePhase::Dumping, CyclePhase::Idle)?;
        let cycle = self.cycle.take().ok_or_else(|| {
            SimulationError::InternalError(format!("卡车 {} 无在途周期", self.truck_id))
        })?;

        Ok(CycleOutcome {
            truck_id: self.truck_id.clone(),
            load_t: cycle.prediction.load_t,
            fuel_l: cycle.prediction.fuel_l,
            delay_probability: cycle.prediction.delay_probability,
            risk_score: cycle.prediction.risk_score,
            source: cycle.prediction.source,
            haul_hours: cycle.haul_hours,
            queue_hours: cycle.queue_hours,
            loading_hours: cycle.loading_hours,
            return_hours: cycle.return_hours,
            dumping_hours: durations.dumping_hours,
            completed_at_hours: now,
        })
    }
}
