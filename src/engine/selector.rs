// ==========================================
// 车队班次仿真 - 多目标策略选择器
// ==========================================
// 职责: 并行仿真全部采样场景,按三个目标各选一个候选
// 目标: (1) 贴近产量目标/利润最大 (2) 周期最短 (3) 运距最短
// 红线: 返回候选的 (卡车数, 挖机数, 路段, 挖机) 两两不同
// 红线: 失败场景丢弃,全部失败 → NoValidScenario
// ==========================================

use crate::config::SearchConfig;
use crate::domain::result::{SimulationResult, StrategyCandidate};
use crate::domain::scenario::{ConfigKey, SimulationScenario};
use crate::domain::types::StrategyObjective;
use crate::engine::context::SimulationContext;
use crate::engine::guidelines::OperationalGuidelines;
use crate::engine::simulation::SimulationEngine;
use crate::error::{SimResult, SimulationError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// 已完成仿真的场景
#[derive(Debug, Clone)]
pub struct EvaluatedScenario {
    pub scenario: SimulationScenario,
    pub result: SimulationResult,
}

// ==========================================
// SearchStats - 搜索统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub sampled: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// 因与已选候选重复而丢弃的兜底候选
    pub duplicates_dropped: usize,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub candidates: Vec<StrategyCandidate>,
    pub stats: SearchStats,
}

// ==========================================
// MultiObjectiveSelector - 多目标选择器
// ==========================================
pub struct MultiObjectiveSelector<'a> {
    ctx: &'a SimulationContext,
    config: &'a SearchConfig,
}

impl<'a> MultiObjectiveSelector<'a> {
    pub fn new(ctx: &'a SimulationContext, config: &'a SearchConfig) -> Self {
        Self { ctx, config }
    }

    /// 并行仿真全部场景 (结果保持输入顺序)
    ///
    /// # 返回
    /// (成功场景, 失败数)
    pub fn evaluate(&self, scenarios: Vec<SimulationScenario>) -> (Vec<EvaluatedScenario>, usize) {
        let engine = SimulationEngine::new(self.ctx);

        let runs: Vec<(SimulationScenario, SimResult<SimulationResult>)> = scenarios
            .into_par_iter()
            .map(|scenario| {
                let result = engine.run(&scenario);
                (scenario, result)
            })
            .collect();

        let mut evaluated = Vec::with_capacity(runs.len());
        let mut failed = 0;
        for (scenario, result) in runs {
            match result {
                Ok(result) => evaluated.push(EvaluatedScenario { scenario, result }),
                Err(e) => {
                    failed += 1;
                    debug!(
                        trucks = scenario.truck_count,
                        excavators = scenario.excavator_count,
                        road_id = %scenario.road_id,
                        excavator_id = %scenario.excavator_id,
                        error = %e,
                        "场景仿真失败,丢弃"
                    );
                }
            }
        }

        if failed > 0 {
            warn!(failed, succeeded = evaluated.len(), "部分场景仿真失败");
        }
        (evaluated, failed)
    }

    /// 仿真 + 选择
    pub fn search(
        &self,
        scenarios: Vec<SimulationScenario>,
        production_target_t: Option<f64>,
    ) -> SimResult<SearchOutcome> {
        let _perf = crate::perf::PerfGuard::new("strategy_search");
        let sampled = scenarios.len();

        let (evaluated, failed) = self.evaluate(scenarios);
        if evaluated.is_empty() {
            return Err(SimulationError::NoValidScenario { sampled });
        }

        let succeeded = evaluated.len();
        let (candidates, duplicates_dropped) = self.select(&evaluated, production_target_t);

        info!(
            sampled,
            succeeded,
            failed,
            candidates = candidates.len(),
            "策略搜索完成"
        );

        Ok(SearchOutcome {
            candidates,
            stats: SearchStats {
                sampled,
                succeeded,
                failed,
                duplicates_dropped,
            },
        })
    }

    /// 构建三个目标池并去重选取
    ///
    /// # 返回
    /// (候选列表, 丢弃的重复兜底数)
    pub fn select(
        &self,
        evaluated: &[EvaluatedScenario],
        production_target_t: Option<f64>,
    ) -> (Vec<StrategyCandidate>, usize) {
        let target = production_target_t.filter(|t| *t > 0.0);

        let primary_objective = match target {
            Some(target_tons) => StrategyObjective::TargetProduction { target_tons },
            None => StrategyObjective::MaxProfit,
        };
        let pools = [
            (primary_objective, self.primary_pool(evaluated, target)),
            (
                StrategyObjective::FastestCycle,
                self.ranked_pool(evaluated, |a, b| {
                    a.result.metrics.avg_cycle_hours.total_cmp(&b.result.metrics.avg_cycle_hours)
                }),
            ),
            (
                StrategyObjective::ShortestRoute,
                self.ranked_pool(evaluated, |a, b| {
                    a.result.metrics.road_distance_km.total_cmp(&b.result.metrics.road_distance_km)
                }),
            ),
        ];

        let guidelines = OperationalGuidelines::new();
        let mut seen: HashSet<ConfigKey> = HashSet::new();
        let mut returned: HashSet<ConfigKey> = HashSet::new();
        let mut candidates = Vec::new();
        let mut duplicates_dropped = 0;

        for (objective, pool) in pools {
            if candidates.len() >= self.config.top_k {
                break;
            }

            let fresh = pool.iter().copied().find(|&i| seen.insert(evaluated[i].scenario.config_key()));
            let Some(index) = fresh.or_else(|| pool.first().copied()) else {
                continue;
            };

            let chosen = &evaluated[index];
            let key = chosen.scenario.config_key();
            if !returned.insert(key) {
                duplicates_dropped += 1;
                debug!(objective = objective.as_str(), "目标池无新配置,兜底候选与已选重复,丢弃");
                continue;
            }

            let rank = candidates.len() as u32 + 1;
            candidates.push(StrategyCandidate::new(
                rank,
                objective,
                chosen.scenario.clone(),
                chosen.result.clone(),
                guidelines.for_scenario(&chosen.scenario),
            ));
        }

        (candidates, duplicates_dropped)
    }

    /// 主目标池: 有目标时 |产量-目标| 升序再利润降序,否则利润降序
    fn primary_pool(&self, evaluated: &[EvaluatedScenario], target: Option<f64>) -> Vec<usize> {
        match target {
            Some(target) => self.ranked_pool(evaluated, |a, b| {
                let da = (a.result.total_tonnage_t - target).abs();
                let db = (b.result.total_tonnage_t - target).abs();
                da.total_cmp(&db).then_with(|| {
                    b.result
                        .financials
                        .net_profit
                        .total_cmp(&a.result.financials.net_profit)
                })
            }),
            None => self.ranked_pool(evaluated, |a, b| {
                b.result
                    .financials
                    .net_profit
                    .total_cmp(&a.result.financials.net_profit)
            }),
        }
    }

    /// 稳定排序后截断到池深度
    fn ranked_pool<F>(&self, evaluated: &[EvaluatedScenario], cmp: F) -> Vec<usize>
    where
        F: Fn(&EvaluatedScenario, &EvaluatedScenario) -> Ordering,
    {
        let mut indices: Vec<usize> = (0..evaluated.len()).collect();
        indices.sort_by(|&a, &b| cmp(&evaluated[a], &evaluated[b]));
        indices.truncate(self.config.pool_depth);
        indices
    }
}
