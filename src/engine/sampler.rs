// ==========================================
// 车队班次仿真 - 场景采样器
// ==========================================
// 职责: 在卡车/挖机数量边界内生成待仿真场景
// 规则: 有产量目标 → 围绕估算车数搜索; 否则均匀网格
// 规则: 每个 (卡车数, 挖机数) 组合抽取 ≤5 个 (路段, 挖机, 船期)
// 红线: 同一请求 + 同一种子 → 同一场景序列
// ==========================================

use crate::config::SearchConfig;
use crate::domain::scenario::SimulationScenario;
use crate::domain::types::{RoadCondition, Shift, Weather};
use crate::error::{SimResult, SimulationError};
use crate::fleet::FleetRegistry;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::{info, warn};

/// 小目标阈值 (吨): 低于该值时从 1 辆车开始搜索
const SMALL_TARGET_T: f64 = 1000.0;

// ==========================================
// SampleRequest - 采样请求
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRequest {
    #[serde(default)]
    pub weather: Weather,
    #[serde(default)]
    pub road_condition: RoadCondition,
    #[serde(default)]
    pub shift: Shift,

    // ===== 决策变量边界 =====
    #[serde(default = "default_min_trucks")]
    pub min_trucks: u32,
    #[serde(default = "default_max_trucks")]
    pub max_trucks: u32,
    #[serde(default = "default_min_excavators")]
    pub min_excavators: u32,
    #[serde(default = "default_max_excavators")]
    pub max_excavators: u32,

    #[serde(default)]
    pub production_target_t: Option<f64>,

    // ===== 用户指定目标 (强制进入样本) =====
    #[serde(default)]
    pub pinned_road_id: Option<String>,
    #[serde(default)]
    pub pinned_excavator_id: Option<String>,
    #[serde(default)]
    pub pinned_schedule_id: Option<String>,

    pub start_time: DateTime<Utc>,

    /// 注入种子 (None 时取当前时间)
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_min_trucks() -> u32 {
    5
}

fn default_max_trucks() -> u32 {
    15
}

fn default_min_excavators() -> u32 {
    1
}

fn default_max_excavators() -> u32 {
    3
}

impl SampleRequest {
    pub fn new(start_time: DateTime<Utc>) -> Self {
        Self {
            weather: Weather::default(),
            road_condition: RoadCondition::default(),
            shift: Shift::default(),
            min_trucks: default_min_trucks(),
            max_trucks: default_max_trucks(),
            min_excavators: default_min_excavators(),
            max_excavators: default_max_excavators(),
            production_target_t: None,
            pinned_road_id: None,
            pinned_excavator_id: None,
            pinned_schedule_id: None,
            start_time,
            seed: None,
        }
    }

    pub fn with_truck_bounds(mut self, min: u32, max: u32) -> Self {
        self.min_trucks = min;
        self.max_trucks = max;
        self
    }

    pub fn with_excavator_bounds(mut self, min: u32, max: u32) -> Self {
        self.min_excavators = min;
        self.max_excavators = max;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// 有效产量目标 (≤0 视为无目标)
    pub fn effective_target(&self) -> Option<f64> {
        self.production_target_t.filter(|t| *t > 0.0)
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.min_trucks == 0 || self.min_trucks > self.max_trucks {
            return Err(SimulationError::invalid(
                "truck_bounds",
                format!("卡车数量边界非法: [{}, {}]", self.min_trucks, self.max_trucks),
            ));
        }
        if self.min_excavators == 0 || self.min_excavators > self.max_excavators {
            return Err(SimulationError::invalid(
                "excavator_bounds",
                format!(
                    "挖掘机数量边界非法: [{}, {}]",
                    self.min_excavators, self.max_excavators
                ),
            ));
        }
        if let Some(target) = self.production_target_t {
            if !target.is_finite() || target < 0.0 {
                return Err(SimulationError::invalid(
                    "production_target_t",
                    format!("产量目标非法: {}", target),
                ));
            }
        }
        Ok(())
    }

    /// 由定性输入 + 注入种子派生 RNG 种子
    fn derived_seed(&self, injected: u64) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.weather.hash(&mut hasher);
        self.road_condition.hash(&mut hasher);
        self.shift.hash(&mut hasher);
        (self.min_trucks, self.max_trucks).hash(&mut hasher);
        (self.min_excavators, self.max_excavators).hash(&mut hasher);
        self.pinned_road_id.hash(&mut hasher);
        self.pinned_excavator_id.hash(&mut hasher);
        self.pinned_schedule_id.hash(&mut hasher);
        self.production_target_t.map(f64::to_bits).hash(&mut hasher);
        injected.hash(&mut hasher);
        hasher.finish()
    }
}

// ==========================================
// ScenarioSample - 采样结果
// ==========================================
#[derive(Debug, Clone)]
pub struct ScenarioSample {
    pub scenarios: Vec<SimulationScenario>,
    pub truck_configs: Vec<u32>,
    pub excavator_configs: Vec<u32>,
    /// 实际使用的注入种子
    pub seed: u64,
}

// ==========================================
// ScenarioSampler - 场景采样器
// ==========================================
pub struct ScenarioSampler<'a> {
    config: &'a SearchConfig,
}

impl<'a> ScenarioSampler<'a> {
    pub fn new(config: &'a SearchConfig) -> Self {
        Self { config }
    }

    /// 卡车数网格
    pub fn truck_configs(&self, request: &SampleRequest) -> Vec<u32> {
        let (min, max) = (request.min_trucks, request.max_trucks);

        let Some(target) = request.effective_target() else {
            let step = ((max - min) / 4).max(1);
            let mut configs: Vec<u32> = (min..=max).step_by(step as usize).collect();
            if !configs.contains(&max) {
                configs.push(max);
            }
            return configs;
        };

        let cap = self.config.max_truck_count.max(1);
        // f64 → u32 饱和转换, 先按上限截断
        let estimate = ((target / self.config.tons_per_truck_shift).min(cap as f64) as u32).clamp(1, cap);
        let mut search_min = estimate.saturating_sub(2).max(1);
        let mut search_max = estimate.saturating_add(3);
        if target < SMALL_TARGET_T {
            search_min = 1;
            search_max = search_max.max(5);
        }

        let mut configs: Vec<u32> = (search_min..=search_max.min(cap)).collect();
        if configs.len() < 3 {
            // 贴近上限时向下放宽, 保证至少 3 个取值
            search_min = search_min.min(cap.saturating_sub(2)).max(1);
            search_max = search_max.saturating_add(1);
            configs = (search_min..=search_max.min(cap)).collect();
        }

        info!(
            target_t = target,
            estimate,
            search_min,
            search_max,
            "按产量目标调整卡车搜索区间"
        );
        configs
    }

    /// 生成场景序列
    ///
    /// # 错误
    /// - InvalidConfiguration: 边界或目标非法
    /// - DataUnavailable: 无可用路段或挖机
    pub fn sample(&self, request: &SampleRequest, registry: &FleetRegistry) -> SimResult<ScenarioSample> {
        self.config.validate()?;
        request.validate()?;

        let injected = request.seed.unwrap_or_else(wall_clock_seed);
        let mut rng = StdRng::seed_from_u64(request.derived_seed(injected));

        // ===== 1. 候选集合 =====
        let all_roads: Vec<&str> = registry.roads().ids();
        if all_roads.is_empty() {
            return Err(SimulationError::DataUnavailable("无可用路段".to_string()));
        }
        let all_excavators: Vec<&str> = registry
            .active_excavators()
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        if all_excavators.is_empty() {
            return Err(SimulationError::DataUnavailable("无可派挖掘机".to_string()));
        }
        let all_schedules: Vec<&str> = registry
            .sampleable_schedules()
            .iter()
            .map(|s| s.id.as_str())
            .collect();

        // ===== 2. 限量抽样 + 强制指定目标 =====
        let roads = sample_with_pin(
            &all_roads,
            self.config.road_sample_cap,
            request.pinned_road_id.as_deref(),
            "road",
            &mut rng,
        );
        let excavators = sample_with_pin(
            &all_excavators,
            self.config.excavator_sample_cap,
            request.pinned_excavator_id.as_deref(),
            "excavator",
            &mut rng,
        );
        let schedules: Vec<Option<String>> = if all_schedules.is_empty() {
            warn!("无有效船期,场景不绑定船期");
            vec![None]
        } else {
            sample_with_pin(
                &all_schedules,
                self.config.schedule_sample_cap,
                request.pinned_schedule_id.as_deref(),
                "schedule",
                &mut rng,
            )
            .into_iter()
            .map(Some)
            .collect()
        };

        // ===== 3. 数量网格 × 组合抽取 =====
        let truck_configs = self.truck_configs(request);
        let excavator_configs: Vec<u32> = (request.min_excavators..=request.max_excavators).collect();
        let per_config = self
            .config
            .combinations_per_config
            .min(roads.len())
            .min(excavators.len());

        let mut scenarios = Vec::new();
        'grid: for &truck_count in &truck_configs {
            for &excavator_count in &excavator_configs {
                for _ in 0..per_config {
                    if scenarios.len() >= self.config.max_scenarios {
                        break 'grid;
                    }
                    let (Some(road_id), Some(excavator_id), Some(schedule_id)) = (
                        roads.choose(&mut rng),
                        excavators.choose(&mut rng),
                        schedules.choose(&mut rng),
                    ) else {
                        break 'grid;
                    };

                    let scenario = SimulationScenario::new(
                        truck_count,
                        excavator_count,
                        road_id.clone(),
                        excavator_id.clone(),
                        request.start_time,
                    )
                    .with_environment(request.weather, request.road_condition, request.shift)
                    .with_schedule(schedule_id.clone())
                    .with_production_target(request.effective_target())
                    .with_seed(rng.gen());
                    scenarios.push(scenario);
                }
            }
        }

        info!(
            scenarios = scenarios.len(),
            roads = roads.len(),
            excavators = excavators.len(),
            schedules = schedules.len(),
            truck_options = truck_configs.len(),
            excavator_options = excavator_configs.len(),
            seed = injected,
            "场景采样完成"
        );

        Ok(ScenarioSample {
            scenarios,
            truck_configs,
            excavator_configs,
            seed: injected,
        })
    }
}

/// 限量随机抽样,指定目标不在样本中时替换首个样本
fn sample_with_pin<R: Rng + ?Sized>(
    pool: &[&str],
    cap: usize,
    pinned: Option<&str>,
    entity: &str,
    rng: &mut R,
) -> Vec<String> {
    let mut sample: Vec<String> = pool
        .choose_multiple(rng, cap.min(pool.len()))
        .map(|s| s.to_string())
        .collect();

    if let Some(pin) = pinned {
        if !pool.contains(&pin) {
            warn!(entity, id = pin, "指定目标不存在或不可用,忽略");
        } else if !sample.iter().any(|s| s == pin) {
            match sample.first_mut() {
                Some(first) => *first = pin.to_string(),
                None => sample.push(pin.to_string()),
            }
        }
    }
    sample
}

fn wall_clock_seed() -> u64 {
    let now = Utc::now();
    now.timestamp_nanos_opt()
        .map(|n| n as u64)
        .unwrap_or_else(|| now.timestamp() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request() -> SampleRequest {
        SampleRequest::new(Utc.with_ymd_and_hms(2025, 3, 1, 6, 0, 0).unwrap())
    }

    #[test]
    fn test_grid_without_target_includes_max() {
        let config = SearchConfig::default();
        let sampler = ScenarioSampler::new(&config);

        assert_eq!(sampler.truck_configs(&request()), vec![5, 7, 9, 11, 13, 15]);
        assert_eq!(
            sampler.truck_configs(&request().with_truck_bounds(3, 4)),
            vec![3, 4]
        );
        assert_eq!(
            sampler.truck_configs(&request().with_truck_bounds(10, 30)),
            vec![10, 15, 20, 25, 30]
        );
    }

    #[test]
    fn test_target_window() {
        let config = SearchConfig::default();
        let sampler = ScenarioSampler::new(&config);

        let mut r = request();
        r.production_target_t = Some(3000.0);
        // 估算 12 辆 → [10, 15]
        assert_eq!(sampler.truck_configs(&r), (10..=15).collect::<Vec<u32>>());

        r.production_target_t = Some(400.0);
        assert_eq!(sampler.truck_configs(&r), (1..=5).collect::<Vec<u32>>());
    }

    #[test]
    fn test_target_window_never_exceeds_cap() {
        let config = SearchConfig::default();
        let sampler = ScenarioSampler::new(&config);

        let mut r = request();
        // 估算 101 辆 → 截断到上限 100, 窗口 [98, 100]
        r.production_target_t = Some(25_250.0);
        assert_eq!(sampler.truck_configs(&r), vec![98, 99, 100]);

        for target in [1.0e6, 2.0e12, f64::MAX] {
            r.production_target_t = Some(target);
            let configs = sampler.truck_configs(&r);
            assert!(configs.len() >= 3, "target={} configs={:?}", target, configs);
            assert!(configs.iter().all(|t| *t >= 1 && *t <= config.max_truck_count));
        }
    }

    #[test]
    fn test_target_window_with_small_cap() {
        let config = SearchConfig {
            max_truck_count: 2,
            ..Default::default()
        };
        let sampler = ScenarioSampler::new(&config);

        let mut r = request();
        r.production_target_t = Some(50_000.0);
        assert_eq!(sampler.truck_configs(&r), vec![1, 2]);
    }

    #[test]
    fn test_schedule_pin_changes_seed() {
        let a = request();
        let mut b = request();
        b.pinned_schedule_id = Some("S_OK".to_string());
        assert_ne!(a.derived_seed(7), b.derived_seed(7));
        assert_eq!(b.derived_seed(7), b.clone().derived_seed(7));
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        assert!(request().with_truck_bounds(0, 5).validate().is_err());
        assert!(request().with_truck_bounds(8, 5).validate().is_err());
        assert!(request().with_excavator_bounds(3, 2).validate().is_err());
    }

    #[test]
    fn test_pin_replaces_first_sample() {
        let pool = vec!["R1", "R2", "R3", "R4"];
        let mut rng = StdRng::seed_from_u64(3);
        let sample = sample_with_pin(&pool, 2, Some("R4"), "road", &mut rng);
        assert_eq!(sample.len(), 2);
        assert!(sample.contains(&"R4".to_string()));

        let sample = sample_with_pin(&pool, 2, Some("R9"), "road", &mut rng);
        assert!(!sample.contains(&"R9".to_string()));
    }
}
