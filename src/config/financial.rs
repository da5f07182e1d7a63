// ==========================================
// 车队班次仿真 - 财务参数配置
// ==========================================
// 职责: 煤价、油价、罚金、人工等财务参数,支持多级覆写
// 覆写优先级: 显式覆写 > 系统配置键值 > 默认值
// 货币单位: IDR
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// 系统配置键 (system_configs.configKey)
// ==========================================
pub mod config_keys {
    pub const COAL_PRICE: &str = "COAL_PRICE_IDR";
    pub const FUEL_PRICE: &str = "FUEL_PRICE_IDR";
    pub const QUEUE_COST: &str = "QUEUE_COST_IDR";
    pub const VESSEL_PENALTY: &str = "VESSEL_PENALTY_IDR";
    pub const INCIDENT_COST: &str = "INCIDENT_COST_IDR";
    pub const DEMURRAGE_COST: &str = "DEMURRAGE_COST_IDR";
    pub const OPERATOR_SALARY: &str = "OPERATOR_SALARY_IDR";
}

// ==========================================
// FinancialConfig - 财务参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialConfig {
    pub coal_price_per_ton: f64,
    pub fuel_price_per_liter: f64,
    pub queue_cost_per_hour: f64,
    pub late_penalty_flat: f64,
    pub avg_incident_cost: f64,
    pub demurrage_per_hour: f64,
    pub avg_operator_monthly_salary: f64,
}

impl Default for FinancialConfig {
    fn default() -> Self {
        Self {
            coal_price_per_ton: 800_000.0,
            fuel_price_per_liter: 15_000.0,
            queue_cost_per_hour: 100_000.0,
            late_penalty_flat: 100_000_000.0,
            avg_incident_cost: 50_000_000.0,
            demurrage_per_hour: 50_000_000.0,
            avg_operator_monthly_salary: 5_000_000.0,
        }
    }
}

impl FinancialConfig {
    /// 从系统配置键值对读取 (解析失败的键保留默认值)
    pub fn from_system_configs(configs: &HashMap<String, String>) -> Self {
        let mut config = Self::default();
        config.apply_system_configs(configs);
        config
    }

    /// 叠加系统配置键值对
    pub fn apply_system_configs(&mut self, configs: &HashMap<String, String>) {
        let read = |key: &str, current: f64| -> f64 {
            configs
                .get(key)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v >= 0.0)
                .unwrap_or(current)
        };

        self.coal_price_per_ton = read(config_keys::COAL_PRICE, self.coal_price_per_ton);
        self.fuel_price_per_liter = read(config_keys::FUEL_PRICE, self.fuel_price_per_liter);
        self.queue_cost_per_hour = read(config_keys::QUEUE_COST, self.queue_cost_per_hour);
        self.late_penalty_flat = read(config_keys::VESSEL_PENALTY, self.late_penalty_flat);
        self.avg_incident_cost = read(config_keys::INCIDENT_COST, self.avg_incident_cost);
        self.demurrage_per_hour = read(config_keys::DEMURRAGE_COST, self.demurrage_per_hour);
        self.avg_operator_monthly_salary =
            read(config_keys::OPERATOR_SALARY, self.avg_operator_monthly_salary);
    }

    /// 叠加显式覆写
    pub fn with_overrides(mut self, overrides: &FinancialOverrides) -> Self {
        if let Some(v) = overrides.coal_price_per_ton {
            self.coal_price_per_ton = v;
        }
        if let Some(v) = overrides.fuel_price_per_liter {
            self.fuel_price_per_liter = v;
        }
        if let Some(v) = overrides.queue_cost_per_hour {
            self.queue_cost_per_hour = v;
        }
        if let Some(v) = overrides.late_penalty_flat {
            self.late_penalty_flat = v;
        }
        if let Some(v) = overrides.avg_incident_cost {
            self.avg_incident_cost = v;
        }
        if let Some(v) = overrides.demurrage_per_hour {
            self.demurrage_per_hour = v;
        }
        if let Some(v) = overrides.avg_operator_monthly_salary {
            self.avg_operator_monthly_salary = v;
        }
        self
    }

    /// 每名司机每小时人工 (月薪 / 30 / 24)
    pub fn operator_hourly_salary(&self) -> f64 {
        self.avg_operator_monthly_salary / 30.0 / 24.0
    }
}

// ==========================================
// FinancialOverrides - 请求级财务覆写
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialOverrides {
    #[serde(default)]
    pub coal_price_per_ton: Option<f64>,
    #[serde(default)]
    pub fuel_price_per_liter: Option<f64>,
    #[serde(default)]
    pub queue_cost_per_hour: Option<f64>,
    #[serde(default)]
    pub late_penalty_flat: Option<f64>,
    #[serde(default)]
    pub avg_incident_cost: Option<f64>,
    #[serde(default)]
    pub demurrage_per_hour: Option<f64>,
    #[serde(default)]
    pub avg_operator_monthly_salary: Option<f64>,
}

impl FinancialOverrides {
    /// 覆写值校验: 必须为有限非负数
    pub fn invalid_fields(&self) -> Vec<&'static str> {
        let fields: [(&'static str, Option<f64>); 7] = [
            ("coal_price_per_ton", self.coal_price_per_ton),
            ("fuel_price_per_liter", self.fuel_price_per_liter),
            ("queue_cost_per_hour", self.queue_cost_per_hour),
            ("late_penalty_flat", self.late_penalty_flat),
            ("avg_incident_cost", self.avg_incident_cost),
            ("demurrage_per_hour", self.demurrage_per_hour),
            ("avg_operator_monthly_salary", self.avg_operator_monthly_salary),
        ];
        fields
            .iter()
            .filter(|(_, v)| matches!(v, Some(x) if !x.is_finite() || *x < 0.0))
            .map(|(name, _)| *name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_configs_override_defaults() {
        let mut configs = HashMap::new();
        configs.insert(config_keys::COAL_PRICE.to_string(), "900000".to_string());
        configs.insert(config_keys::FUEL_PRICE.to_string(), "not-a-number".to_string());
        configs.insert(config_keys::DEMURRAGE_COST.to_string(), " 25000000 ".to_string());

        let config = FinancialConfig::from_system_configs(&configs);
        assert_eq!(config.coal_price_per_ton, 900_000.0);
        assert_eq!(config.fuel_price_per_liter, 15_000.0, "解析失败应保留默认值");
        assert_eq!(config.demurrage_per_hour, 25_000_000.0);
    }

    #[test]
    fn test_explicit_overrides_win() {
        let overrides = FinancialOverrides {
            coal_price_per_ton: Some(1_000_000.0),
            ..Default::default()
        };
        let config = FinancialConfig::default().with_overrides(&overrides);
        assert_eq!(config.coal_price_per_ton, 1_000_000.0);
        assert_eq!(config.queue_cost_per_hour, 100_000.0);
    }

    #[test]
    fn test_invalid_override_fields() {
        let overrides = FinancialOverrides {
            fuel_price_per_liter: Some(-1.0),
            demurrage_per_hour: Some(f64::NAN),
            ..Default::default()
        };
        assert_eq!(
            overrides.invalid_fields(),
            vec!["fuel_price_per_liter", "demurrage_per_hour"]
        );
    }

    #[test]
    fn test_operator_hourly_salary() {
        let config = FinancialConfig {
            avg_operator_monthly_salary: 7_200_000.0,
            ..Default::default()
        };
        assert_eq!(config.operator_hourly_salary(), 10_000.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: FinancialConfig = serde_json::from_str(r#"{"coal_price_per_ton": 750000}"#).unwrap();
        assert_eq!(config.coal_price_per_ton, 750_000.0);
        assert_eq!(config.late_penalty_flat, 100_000_000.0);
    }
}
