// ==========================================
// 车队班次仿真 - 预测服务端口
// ==========================================
// 职责: 定义单周期预测接口 (油耗/装载/延误概率/风险分)
// 说明: 模型训练与生命周期不在本核心内
// 红线: 预测失败或无输出 → 引擎闭式估算兜底,不向外传播
// ==========================================

pub mod features;

use crate::domain::types::{RoadCondition, Shift, Weather};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use thiserror::Error;

pub use features::FeatureBuilder;

// ==========================================
// CycleFeatures - 预测特征向量
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleFeatures {
    pub truck_capacity_t: f64,
    pub bucket_capacity_m3: f64,
    pub operator_rating: f64,
    pub operator_experience_years: f64,
    pub road_distance_km: f64,
    pub road_gradient_pct: f64,
    pub truck_age_days: f64,
    pub days_since_maintenance: f64,
    pub weather: Weather,
    pub road_condition: RoadCondition,
    pub shift: Shift,
    pub brand: String,
    pub excavator_model: String,
}

// ==========================================
// CyclePrediction - 预测输出
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CyclePrediction {
    pub fuel_l: f64,
    pub load_t: f64,
    pub delay_probability: f64,
    pub risk_score: f64,
}

impl CyclePrediction {
    /// 输出校验: 非有限值或负值视为预测失败, 延误概率截断到 [0, 1]
    pub fn sanitized(self) -> Result<Self, PredictionError> {
        let values = [self.fuel_l, self.load_t, self.delay_probability, self.risk_score];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(PredictionError::InvalidOutput("存在非有限值".to_string()));
        }
        if self.fuel_l < 0.0 || self.load_t < 0.0 {
            return Err(PredictionError::InvalidOutput(format!(
                "油耗/装载为负: fuel={}, load={}",
                self.fuel_l, self.load_t
            )));
        }
        Ok(Self {
            delay_probability: self.delay_probability.clamp(0.0, 1.0),
            ..self
        })
    }
}

// ==========================================
// PredictionError - 预测错误
// ==========================================
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("预测服务调用失败: {0}")]
    ServiceFailure(String),

    #[error("预测输出非法: {0}")]
    InvalidOutput(String),

    #[error("预测服务锁获取失败: {0}")]
    LockPoisoned(String),
}

// ==========================================
// PredictiveService Trait
// ==========================================
// 约束: 必须支持多个仿真线程并发调用
pub trait PredictiveService: Send + Sync {
    /// 预测单个周期结果
    ///
    /// # 返回
    /// - Ok(Some): 预测成功
    /// - Ok(None): 无输出 (如特征缺失)
    /// - Err: 预测失败
    fn predict(&self, features: &CycleFeatures) -> Result<Option<CyclePrediction>, PredictionError>;
}

// ==========================================
// ExclusivePredictor - 不可并发调用的预测器
// ==========================================
pub trait ExclusivePredictor: Send {
    fn predict_mut(
        &mut self,
        features: &CycleFeatures,
    ) -> Result<Option<CyclePrediction>, PredictionError>;
}

// ==========================================
// SerializedPredictor - 串行化包装
// ==========================================
// 锁只在单次调用期间持有
pub struct SerializedPredictor<P> {
    inner: Mutex<P>,
}

impl<P: ExclusivePredictor> SerializedPredictor<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }
}

impl<P: ExclusivePredictor> PredictiveService for SerializedPredictor<P> {
    fn predict(&self, features: &CycleFeatures) -> Result<Option<CyclePrediction>, PredictionError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| PredictionError::LockPoisoned(e.to_string()))?;
        guard.predict_mut(features)
    }
}

// ==========================================
// FallbackOnly - 无预测服务
// ==========================================
// 所有周期走闭式估算
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackOnly;

impl PredictiveService for FallbackOnly {
    fn predict(&self, _features: &CycleFeatures) -> Result<Option<CyclePrediction>, PredictionError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingPredictor {
        calls: u32,
    }

    impl ExclusivePredictor for CountingPredictor {
        fn predict_mut(
            &mut self,
            _features: &CycleFeatures,
        ) -> Result<Option<CyclePrediction>, PredictionError> {
            self.calls += 1;
            Ok(Some(CyclePrediction {
                fuel_l: self.calls as f64,
                load_t: 20.0,
                delay_probability: 0.1,
                risk_score: 0.2,
            }))
        }
    }

    fn features() -> CycleFeatures {
        CycleFeatures {
            truck_capacity_t: 30.0,
            bucket_capacity_m3: 5.0,
            operator_rating: 4.0,
            operator_experience_years: 3.0,
            road_distance_km: 4.0,
            road_gradient_pct: 2.0,
            truck_age_days: 400.0,
            days_since_maintenance: 20.0,
            weather: Weather::Clear,
            road_condition: RoadCondition::Good,
            shift: Shift::Shift1,
            brand: "HINO".to_string(),
            excavator_model: "PC400".to_string(),
        }
    }

    #[test]
    fn test_sanitize_clamps_delay_probability() {
        let p = CyclePrediction {
            fuel_l: 10.0,
            load_t: 25.0,
            delay_probability: 1.7,
            risk_score: 0.3,
        };
        assert_eq!(p.sanitized().unwrap().delay_probability, 1.0);
    }

    #[test]
    fn test_sanitize_rejects_nan_and_negative() {
        let nan = CyclePrediction {
            fuel_l: f64::NAN,
            load_t: 25.0,
            delay_probability: 0.1,
            risk_score: 0.3,
        };
        assert!(nan.sanitized().is_err());

        let negative = CyclePrediction {
            fuel_l: 10.0,
            load_t: -1.0,
            delay_probability: 0.1,
            risk_score: 0.3,
        };
        assert!(negative.sanitized().is_err());
    }

    #[test]
    fn test_serialized_predictor_shares_state_across_threads() {
        let predictor = std::sync::Arc::new(SerializedPredictor::new(CountingPredictor { calls: 0 }));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let p = predictor.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        p.predict(&features()).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let last = predictor.predict(&features()).unwrap().unwrap();
        assert_eq!(last.fuel_l, 101.0);
    }

    #[test]
    fn test_fallback_only_returns_none() {
        assert_eq!(FallbackOnly.predict(&features()).unwrap(), None);
    }
}
