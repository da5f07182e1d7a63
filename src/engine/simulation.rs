// ==========================================
// 车队班次仿真 - 离散事件仿真引擎
// ==========================================
// 职责: 单场景单班次仿真 (卡车循环 + 挖机排队 + 船期/财务结算)
// 调度: 未来事件表 = 按 (时刻, 插入序号) 排序的最小堆
// 红线: 同一场景 + 同一种子 + 同一预测器 → 结果完全一致
// 红线: 班次截止时在途周期不计产量
// ==========================================

use crate::domain::fleet::Truck;
use crate::domain::result::{
    CycleOutcome, DerivedMetrics, OperatorHeadcount, PhaseTotals, SimulationResult,
};
use crate::domain::scenario::SimulationScenario;
use crate::domain::types::PredictionSource;
use crate::engine::context::SimulationContext;
use crate::engine::excavator_pool::{Acquire, ExcavatorPool};
use crate::engine::financial::{FinancialAggregator, FinancialInputs};
use crate::engine::shipment::ShipmentRiskEvaluator;
use crate::engine::truck::{CycleEstimator, PhaseDurations, TruckProcess};
use crate::error::{SimResult, SimulationError};
use crate::fleet::FleetRegistry;
use crate::predictor::FeatureBuilder;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;
use tracing::{debug, warn};

/// 无产量 / 无完成周期时的指标占位值
pub const NO_DATA_SENTINEL: f64 = 999.0;

// ==========================================
// 未来事件表
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventKind {
    CycleStart,
    HaulArrived,
    LoadingDone,
    ReturnArrived,
    DumpDone,
}

#[derive(Debug, Clone, Copy)]
struct Event {
    time: f64,
    seq: u64,
    slot: usize,
    kind: EventKind,
}

// BinaryHeap 为最大堆: 反转比较使最早事件先出堆,同刻按插入顺序
impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Event {}

#[derive(Debug, Default)]
struct EventQueue {
    heap: BinaryHeap<Event>,
    next_seq: u64,
}

impl EventQueue {
    fn schedule(&mut self, time: f64, slot: usize, kind: EventKind) {
        self.heap.push(Event {
            time,
            seq: self.next_seq,
            slot,
            kind,
        });
        self.next_seq += 1;
    }

    /// 取出不晚于 horizon 的下一事件
    fn pop_due(&mut self, horizon: f64) -> Option<Event> {
        match self.heap.peek() {
            Some(e) if e.time <= horizon => self.heap.pop(),
            _ => None,
        }
    }
}

// ==========================================
// RunAccumulator - 运行级累计量
// ==========================================
// 只在周期完成时累加
#[derive(Debug, Default)]
struct RunAccumulator {
    total_tonnage_t: f64,
    total_fuel_l: f64,
    delay_probability_sum: f64,
    maintenance_accrued: f64,
    completed_queue_hours: f64,
    phases: PhaseTotals,
    predictor_cycles: u32,
    fallback_cycles: u32,
    cycles: Vec<CycleOutcome>,
}

impl RunAccumulator {
    fn record(&mut self, outcome: CycleOutcome, maintenance_cost_per_hour: f64) {
        let cycle_hours = outcome.cycle_hours();

        self.total_tonnage_t += outcome.load_t;
        self.total_fuel_l += outcome.fuel_l;
        self.delay_probability_sum += outcome.delay_probability;
        self.maintenance_accrued += cycle_hours * maintenance_cost_per_hour;
        self.completed_queue_hours += outcome.queue_hours;

        self.phases.hauling_hours += outcome.haul_hours;
        self.phases.loading_hours += outcome.loading_hours;
        self.phases.return_hours += outcome.return_hours;
        self.phases.dumping_hours += outcome.dumping_hours;
        self.phases.cycle_hours += cycle_hours;

        match outcome.source {
            PredictionSource::Predictor => self.predictor_cycles += 1,
            PredictionSource::Fallback => self.fallback_cycles += 1,
        }
        self.cycles.push(outcome);
    }

    fn cycles_completed(&self) -> u32 {
        self.cycles.len() as u32
    }
}

// ==========================================
// SimulationEngine - 仿真引擎
// ==========================================
pub struct SimulationEngine<'a> {
    ctx: &'a SimulationContext,
}

impl<'a> SimulationEngine<'a> {
    pub fn new(ctx: &'a SimulationContext) -> Self {
        Self { ctx }
    }

    /// 运行单个场景
    ///
    /// # 错误
    /// - InvalidConfiguration: 数量非正 / 路段或挖机不存在 / 仿真参数非法
    /// - DataUnavailable: 无可派卡车
    pub fn run(&self, scenario: &SimulationScenario) -> SimResult<SimulationResult> {
        let started = Instant::now();
        let ctx = self.ctx;

        // ===== 1. 仿真前校验 =====
        scenario.validate()?;
        ctx.config.validate()?;

        let registry: &FleetRegistry = &ctx.registry;
        let road = registry.road(&scenario.road_id).ok_or_else(|| {
            SimulationError::invalid("road_id", format!("路段不存在: {}", scenario.road_id))
        })?;
        let excavator = registry.excavator(&scenario.excavator_id).ok_or_else(|| {
            SimulationError::invalid(
                "excavator_id",
                format!("挖掘机不存在: {}", scenario.excavator_id),
            )
        })?;

        let active_trucks = registry.active_trucks();
        if active_trucks.is_empty() {
            return Err(SimulationError::DataUnavailable("无可派卡车".to_string()));
        }
        if scenario.truck_count as usize > active_trucks.len() {
            debug!(
                requested = scenario.truck_count,
                active = active_trucks.len(),
                "卡车数超过可派卡车数,按轮转复用"
            );
        }

        // ===== 2. 初始化进程与资源 =====
        let operator_ids = registry.operators().ids();
        let slot_trucks: Vec<&Truck> = (0..scenario.truck_count as usize)
            .map(|i| active_trucks[i % active_trucks.len()])
            .collect();
        let mut trucks: Vec<TruckProcess> = slot_trucks
            .iter()
            .enumerate()
            .map(|(i, truck)| {
                let operator_id = if operator_ids.is_empty() {
                    None
                } else {
                    Some(operator_ids[i % operator_ids.len()].to_string())
                };
                TruckProcess::new(i, truck, operator_id)
            })
            .collect();

        let durations = PhaseDurations::for_scenario(&ctx.timing, &ctx.config, road, scenario);
        let mut pool = ExcavatorPool::new(scenario.excavator_count)?;
        let mut queue = EventQueue::default();
        let mut acc = RunAccumulator::default();
        let mut rng = StdRng::seed_from_u64(scenario.seed);
        let features = FeatureBuilder::new(registry, ctx.config.default_days_since_maintenance);
        let estimator = CycleEstimator::new(ctx.predictor.as_ref(), &ctx.config, road.distance_km);
        let horizon = ctx.config.duration_hours;

        for slot in 0..trucks.len() {
            queue.schedule(0.0, slot, EventKind::CycleStart);
        }

        // ===== 3. 事件循环 =====
        let mut events: u64 = 0;
        while let Some(event) = queue.pop_due(horizon) {
            events += 1;
            let slot = event.slot;
            let now = event.time;

            match event.kind {
                EventKind::CycleStart => {
                    let at = scenario.start_time
                        + chrono::Duration::milliseconds((now * 3_600_000.0).round() as i64);
                    let cycle_features = features.build(
                        slot_trucks[slot],
                        trucks[slot].operator_id.as_deref(),
                        road,
                        Some(excavator),
                        scenario,
                        at,
                    );
                    let prediction = estimator.estimate(&trucks[slot], cycle_features.as_ref(), &mut rng);
                    let arrive = trucks[slot].begin_cycle(now, prediction, &durations)?;
                    queue.schedule(arrive, slot, EventKind::HaulArrived);
                }
                EventKind::HaulArrived => {
                    trucks[slot].arrive_at_loader()?;
                    if pool.request(slot, now) == Acquire::Granted {
                        let done = trucks[slot].start_loading(now, 0.0, &durations)?;
                        queue.schedule(done, slot, EventKind::LoadingDone);
                    }
                }
                EventKind::LoadingDone => {
                    if let Some(handoff) = pool.release(now)? {
                        let done =
                            trucks[handoff.slot].start_loading(now, handoff.waited_hours, &durations)?;
                        queue.schedule(done, handoff.slot, EventKind::LoadingDone);
                    }
                    let back = trucks[slot].finish_loading(now, &durations)?;
                    queue.schedule(back, slot, EventKind::ReturnArrived);
                }
                EventKind::ReturnArrived => {
                    let done = trucks[slot].finish_return(now, &durations)?;
                    queue.schedule(done, slot, EventKind::DumpDone);
                }
                EventKind::DumpDone => {
                    let outcome = trucks[slot].complete_cycle(now, &durations)?;
                    acc.record(outcome, trucks[slot].maintenance_cost_per_hour);
                    queue.schedule(now, slot, EventKind::CycleStart);
                }
            }
        }

        if acc.fallback_cycles > 0 && acc.predictor_cycles == 0 {
            debug!(cycles = acc.fallback_cycles, "全部周期使用兜底估算");
        } else if acc.fallback_cycles > 0 {
            warn!(
                predictor_cycles = acc.predictor_cycles,
                fallback_cycles = acc.fallback_cycles,
                "部分周期预测失败,已使用兜底估算"
            );
        }

        // ===== 4. 结算 =====
        let run_hours = horizon;
        let total_queue_hours = pool.total_wait_hours();

        let shipment = ShipmentRiskEvaluator::new().evaluate(
            registry,
            scenario.schedule_id.as_deref(),
            acc.total_tonnage_t,
            run_hours,
            scenario.start_time,
            &ctx.financial,
        );

        let financials = FinancialAggregator::new().aggregate(
            &FinancialInputs {
                total_tonnage_t: acc.total_tonnage_t,
                total_fuel_l: acc.total_fuel_l,
                maintenance_accrued: acc.maintenance_accrued,
                total_queue_hours,
                delay_probability_sum: acc.delay_probability_sum,
                demurrage_cost: shipment.demurrage_cost,
                truck_count: scenario.truck_count,
                excavator_count: scenario.excavator_count,
                run_hours,
            },
            &ctx.financial,
        );

        let metrics = derive_metrics(scenario, road.distance_km, run_hours, &durations, &acc);

        let mut used_truck_ids: Vec<String> = Vec::new();
        for t in &slot_trucks {
            if !used_truck_ids.contains(&t.id) {
                used_truck_ids.push(t.id.clone());
            }
        }
        let used_excavator_ids = rotate_excavators(registry, &scenario.excavator_id, scenario.excavator_count);

        crate::perf::record_run(events, started.elapsed(), &format!("{:?}", scenario.config_key()));
        debug!(
            trucks = scenario.truck_count,
            excavators = scenario.excavator_count,
            road_id = %scenario.road_id,
            events,
            cycles = acc.cycles_completed(),
            tonnage = acc.total_tonnage_t,
            queue_hours = total_queue_hours,
            "场景仿真完成"
        );

        Ok(SimulationResult {
            run_hours,
            total_tonnage_t: acc.total_tonnage_t,
            total_fuel_l: acc.total_fuel_l,
            cycles_completed: acc.cycles_completed(),
            total_queue_hours,
            delay_probability_sum: acc.delay_probability_sum,
            maintenance_accrued: acc.maintenance_accrued,
            phases: acc.phases.clone(),
            used_truck_ids,
            used_excavator_ids,
            predictor_cycles: acc.predictor_cycles,
            fallback_cycles: acc.fallback_cycles,
            cycles: acc.cycles,
            financials,
            shipment,
            metrics,
        })
    }
}

/// 从场景挖机开始,在可派挖机列表中轮转选取
fn rotate_excavators(registry: &FleetRegistry, target_id: &str, count: u32) -> Vec<String> {
    let active = registry.active_excavators();
    if active.is_empty() {
        return Vec::new();
    }
    let start = active.iter().position(|e| e.id == target_id).unwrap_or(0);
    let take = (count as usize).min(active.len());
    (0..take)
        .map(|k| active[(start + k) % active.len()].id.clone())
        .collect()
}

fn derive_metrics(
    scenario: &SimulationScenario,
    road_distance_km: f64,
    run_hours: f64,
    durations: &PhaseDurations,
    acc: &RunAccumulator,
) -> DerivedMetrics {
    let cycles = acc.cycles_completed();
    let per_cycle_minutes = |hours: f64| {
        if cycles > 0 {
            hours / cycles as f64 * 60.0
        } else {
            0.0
        }
    };

    // 单趟平均周期 (分钟),无完成周期时取名义周期
    let trip_minutes = if cycles > 0 {
        per_cycle_minutes(acc.phases.cycle_hours)
    } else {
        durations.nominal_cycle_hours() * 60.0
    };
    let loading_minutes = durations.loading_hours * 60.0;
    let match_factor = if trip_minutes > 0.0 {
        (scenario.truck_count as f64 * loading_minutes)
            / (scenario.excavator_count as f64 * trip_minutes)
    } else {
        0.0
    };

    DerivedMetrics {
        road_distance_km,
        total_distance_km: cycles as f64 * road_distance_km * 2.0,
        fuel_per_ton: if acc.total_tonnage_t > 0.0 {
            acc.total_fuel_l / acc.total_tonnage_t
        } else {
            NO_DATA_SENTINEL
        },
        avg_cycle_hours: if cycles > 0 {
            run_hours / cycles as f64
        } else {
            NO_DATA_SENTINEL
        },
        production_per_truck_t: acc.total_tonnage_t / scenario.truck_count as f64,
        avg_hauling_minutes: per_cycle_minutes(acc.phases.hauling_hours),
        avg_queue_minutes: per_cycle_minutes(acc.completed_queue_hours),
        avg_loading_minutes: per_cycle_minutes(acc.phases.loading_hours),
        avg_return_minutes: per_cycle_minutes(acc.phases.return_hours),
        avg_dumping_minutes: per_cycle_minutes(acc.phases.dumping_hours),
        match_factor,
        headcount: OperatorHeadcount::for_fleet(scenario.truck_count, scenario.excavator_count),
    }
}
