// ==========================================
// 车队班次仿真 - 规划服务 (异步门面)
// ==========================================
// 职责: 加载车队快照 → 标定 → 财务参数解析 → 采样 + 并行仿真 + 选择
// 架构: 服务层 → 引擎层 (SimulationContext) → 车队数据端口
// 说明: CPU 密集的搜索在 spawn_blocking 中执行
// ==========================================

use crate::config::{FinancialConfig, FinancialOverrides, SearchConfig, SimulationConfig};
use crate::domain::result::{SimulationResult, StrategyCandidate};
use crate::domain::scenario::SimulationScenario;
use crate::domain::types::Shift;
use crate::engine::{
    resolve_financial_config, CalibratedTiming, CalibrationEngine, MultiObjectiveSelector,
    SampleRequest, ScenarioSampler, SearchStats, SimulationContext, SimulationEngine,
};
use crate::fleet::{FleetDataSource, FleetRegistry};
use crate::predictor::PredictiveService;
use crate::service::error::{ServiceError, ServiceResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

// ==========================================
// 请求 / 响应 DTO
// ==========================================

/// 策略推荐请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    #[serde(flatten)]
    pub sample: SampleRequest,

    #[serde(default)]
    pub financial_overrides: FinancialOverrides,

    /// 快照时刻 (默认取班次开始时间)
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
}

impl RecommendationRequest {
    pub fn new(sample: SampleRequest) -> Self {
        Self {
            sample,
            financial_overrides: FinancialOverrides::default(),
            as_of: None,
        }
    }
}

/// 策略推荐响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub request_id: String,
    /// 按 rank 排序,最多 3 个
    pub candidates: Vec<StrategyCandidate>,
    pub stats: SearchStats,
    /// 本次采样使用的种子 (用于复现)
    pub seed: u64,
    pub calibration: CalibratedTiming,
    pub financial: FinancialConfig,
    pub generated_at: DateTime<Utc>,
}

/// 单场景仿真请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulateRequest {
    pub scenario: SimulationScenario,

    #[serde(default)]
    pub financial_overrides: FinancialOverrides,

    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
}

// ==========================================
// PlanningService - 规划服务
// ==========================================
pub struct PlanningService {
    source: Arc<dyn FleetDataSource>,
    predictor: Arc<dyn PredictiveService>,
    search_config: SearchConfig,
    simulation_config: SimulationConfig,
}

impl PlanningService {
    pub fn new(source: Arc<dyn FleetDataSource>, predictor: Arc<dyn PredictiveService>) -> Self {
        Self {
            source,
            predictor,
            search_config: SearchConfig::default(),
            simulation_config: SimulationConfig::default(),
        }
    }

    pub fn with_search_config(mut self, config: SearchConfig) -> Self {
        self.search_config = config;
        self
    }

    pub fn with_simulation_config(mut self, config: SimulationConfig) -> Self {
        self.simulation_config = config;
        self
    }

    /// 推荐最多 3 个配置策略
    ///
    /// # 返回
    /// - Ok(RecommendationResponse): 候选策略 + 搜索统计
    /// - Err(ServiceError::InvalidInput): 边界/目标/财务覆写非法
    /// - Err(ServiceError::DataUnavailable): 车队为空
    /// - Err(ServiceError::NoValidScenario): 全部场景仿真失败
    pub async fn recommend(
        &self,
        request: RecommendationRequest,
    ) -> ServiceResult<RecommendationResponse> {
        let request_id = Uuid::new_v4().to_string();

        request.sample.validate()?;
        validate_overrides(&request.financial_overrides)?;

        let as_of = request.as_of.unwrap_or(request.sample.start_time);
        let ctx = self
            .build_context(as_of, request.sample.shift, &request.financial_overrides)
            .await?;
        let calibration = ctx.timing;
        let financial = ctx.financial.clone();

        info!(
            request_id = %request_id,
            weather = %request.sample.weather,
            road_condition = %request.sample.road_condition,
            min_trucks = request.sample.min_trucks,
            max_trucks = request.sample.max_trucks,
            target_t = ?request.sample.effective_target(),
            "开始策略搜索"
        );

        let search_config = self.search_config.clone();
        let sample_request = request.sample.clone();
        let (outcome, seed) = tokio::task::spawn_blocking(move || {
            let sample = ScenarioSampler::new(&search_config).sample(&sample_request, &ctx.registry)?;
            let outcome = MultiObjectiveSelector::new(&ctx, &search_config)
                .search(sample.scenarios, sample_request.effective_target())?;
            Ok::<_, ServiceError>((outcome, sample.seed))
        })
        .await??;

        info!(
            request_id = %request_id,
            candidates = outcome.candidates.len(),
            sampled = outcome.stats.sampled,
            failed = outcome.stats.failed,
            seed,
            "策略推荐完成"
        );

        Ok(RecommendationResponse {
            request_id,
            candidates: outcome.candidates,
            stats: outcome.stats,
            seed,
            calibration,
            financial,
            generated_at: Utc::now(),
        })
    }

    /// 仿真单个指定场景
    pub async fn simulate(&self, request: SimulateRequest) -> ServiceResult<SimulationResult> {
        request.scenario.validate()?;
        validate_overrides(&request.financial_overrides)?;

        let as_of = request.as_of.unwrap_or(request.scenario.start_time);
        let ctx = self
            .build_context(as_of, request.scenario.shift, &request.financial_overrides)
            .await?;

        let scenario = request.scenario;
        let result = tokio::task::spawn_blocking(move || {
            let _perf = crate::perf::PerfGuard::new("simulate");
            SimulationEngine::new(&ctx).run(&scenario)
        })
        .await??;

        Ok(result)
    }

    /// 构建请求级上下文
    async fn build_context(
        &self,
        as_of: DateTime<Utc>,
        shift: Shift,
        overrides: &FinancialOverrides,
    ) -> ServiceResult<SimulationContext> {
        let registry = Arc::new(FleetRegistry::load(self.source.as_ref(), as_of).await?);

        let timing = CalibrationEngine::new().calibrate_for_shift(registry.hauling_history(), shift);
        let financial = resolve_financial_config(&registry, overrides);

        Ok(SimulationContext::new(registry, self.predictor.clone())
            .with_timing(timing)
            .with_financial(financial)
            .with_config(self.simulation_config.clone()))
    }
}

fn validate_overrides(overrides: &FinancialOverrides) -> ServiceResult<()> {
    let invalid = overrides.invalid_fields();
    if invalid.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::InvalidInput(format!(
            "财务覆写值必须为非负有限数: {}",
            invalid.join(", ")
        )))
    }
}
