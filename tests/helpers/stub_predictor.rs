// ==========================================
// 预测服务桩实现 - 用于集成测试
// ==========================================

use haul_fleet_sim::predictor::{
    CycleFeatures, CyclePrediction, ExclusivePredictor, PredictionError, PredictiveService,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 固定输出预测器
#[derive(Debug, Clone, Copy)]
pub struct ConstantPredictor {
    pub prediction: CyclePrediction,
}

impl ConstantPredictor {
    pub fn new(fuel_l: f64, load_t: f64) -> Self {
        Self {
            prediction: CyclePrediction {
                fuel_l,
                load_t,
                delay_probability: 0.1,
                risk_score: 0.2,
            },
        }
    }
}

impl PredictiveService for ConstantPredictor {
    fn predict(&self, _features: &CycleFeatures) -> Result<Option<CyclePrediction>, PredictionError> {
        Ok(Some(self.prediction))
    }
}

/// 始终失败的预测器
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingPredictor;

impl PredictiveService for FailingPredictor {
    fn predict(&self, _features: &CycleFeatures) -> Result<Option<CyclePrediction>, PredictionError> {
        Err(PredictionError::ServiceFailure("model offline".to_string()))
    }
}

/// 调用计数包装
pub struct CountingPredictor<P> {
    inner: P,
    calls: Arc<AtomicUsize>,
}

impl<P> CountingPredictor<P> {
    pub fn new(inner: P) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                inner,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

impl<P: PredictiveService> PredictiveService for CountingPredictor<P> {
    fn predict(&self, features: &CycleFeatures) -> Result<Option<CyclePrediction>, PredictionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.predict(features)
    }
}

/// 不可并发调用的模型: 按卡车载重给出装载,记录调用历史
#[derive(Debug, Default)]
pub struct StatefulModel {
    pub history: Vec<f64>,
}

impl ExclusivePredictor for StatefulModel {
    fn predict_mut(
        &mut self,
        features: &CycleFeatures,
    ) -> Result<Option<CyclePrediction>, PredictionError> {
        self.history.push(features.truck_capacity_t);
        Ok(Some(CyclePrediction {
            fuel_l: features.road_distance_km * 2.0,
            load_t: features.truck_capacity_t * 0.9,
            delay_probability: 0.05,
            risk_score: 0.1,
        }))
    }
}
