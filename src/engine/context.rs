// ==========================================
// 车队班次仿真 - 仿真上下文
// ==========================================
// 职责: 显式传入引擎/选择器的只读上下文
// 内容: 车队快照 + 预测服务 + 财务参数 + 标定参数 + 仿真参数
// 红线: 无全局可变状态
// ==========================================

use crate::config::{FinancialConfig, FinancialOverrides, SimulationConfig};
use crate::engine::calibration::{CalibratedTiming, CalibrationEngine};
use crate::fleet::FleetRegistry;
use crate::predictor::PredictiveService;
use std::sync::Arc;
use tracing::debug;

// ==========================================
// SimulationContext - 仿真上下文
// ==========================================
#[derive(Clone)]
pub struct SimulationContext {
    pub registry: Arc<FleetRegistry>,
    pub predictor: Arc<dyn PredictiveService>,
    pub financial: FinancialConfig,
    pub timing: CalibratedTiming,
    pub config: SimulationConfig,
}

impl SimulationContext {
    /// 以快照默认值构建上下文
    ///
    /// - 财务参数: 默认值 → 司机平均薪资 → 系统配置
    /// - 标定参数: 全量运输历史
    pub fn new(registry: Arc<FleetRegistry>, predictor: Arc<dyn PredictiveService>) -> Self {
        let financial = resolve_financial_config(&registry, &FinancialOverrides::default());
        let timing = CalibrationEngine::new().calibrate(registry.hauling_history());
        Self {
            registry,
            predictor,
            financial,
            timing,
            config: SimulationConfig::default(),
        }
    }

    pub fn with_financial(mut self, financial: FinancialConfig) -> Self {
        self.financial = financial;
        self
    }

    pub fn with_timing(mut self, timing: CalibratedTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }
}

impl std::fmt::Debug for SimulationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationContext")
            .field("as_of", &self.registry.as_of())
            .field("financial", &self.financial)
            .field("timing", &self.timing)
            .field("config", &self.config)
            .finish()
    }
}

/// 解析请求级财务参数
///
/// 优先级 (低 → 高): 默认值 → 司机平均月薪 → 系统配置 → 显式覆写
pub fn resolve_financial_config(
    registry: &FleetRegistry,
    overrides: &FinancialOverrides,
) -> FinancialConfig {
    let mut config = FinancialConfig::default();

    if let Some(mean) = registry.mean_operator_salary() {
        config.avg_operator_monthly_salary = mean;
    }
    config.apply_system_configs(registry.system_configs());
    let config = config.with_overrides(overrides);

    debug!(
        coal_price = config.coal_price_per_ton,
        fuel_price = config.fuel_price_per_liter,
        monthly_salary = config.avg_operator_monthly_salary,
        "财务参数解析完成"
    );
    config
}
