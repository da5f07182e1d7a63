// ==========================================
// 车队班次仿真 - 财务汇总
// ==========================================
// 职责: 由仿真累计量 + 财务参数计算收入与各成本项
// 红线: 各成本项 ≥ 0,净利润 = 收入 - Σ成本项 (可为负)
// 红线: 分解要么完整返回,要么不返回
// ==========================================

use crate::config::FinancialConfig;
use crate::domain::result::FinancialBreakdown;

// ==========================================
// FinancialInputs - 汇总输入
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FinancialInputs {
    pub total_tonnage_t: f64,
    pub total_fuel_l: f64,
    pub maintenance_accrued: f64,
    pub total_queue_hours: f64,
    pub delay_probability_sum: f64,
    pub demurrage_cost: f64,
    pub truck_count: u32,
    pub excavator_count: u32,
    pub run_hours: f64,
}

impl FinancialInputs {
    /// 计薪人数: 卡车司机 + 装载/卸载各一名挖机司机
    pub fn paid_operators(&self) -> u32 {
        self.truck_count + 2 * self.excavator_count
    }
}

// ==========================================
// FinancialAggregator - 财务汇总器
// ==========================================
pub struct FinancialAggregator {
    // 无状态汇总器
}

impl FinancialAggregator {
    pub fn new() -> Self {
        Self {}
    }

    pub fn aggregate(&self, inputs: &FinancialInputs, config: &FinancialConfig) -> FinancialBreakdown {
        let revenue = inputs.total_tonnage_t * config.coal_price_per_ton;

        let fuel_cost = non_negative(inputs.total_fuel_l * config.fuel_price_per_liter);
        let maintenance_cost = non_negative(inputs.maintenance_accrued);
        let operator_cost = non_negative(
            inputs.paid_operators() as f64 * config.operator_hourly_salary() * inputs.run_hours,
        );
        let queue_cost = non_negative(inputs.total_queue_hours * config.queue_cost_per_hour);
        let incident_risk_cost = non_negative(inputs.delay_probability_sum * config.avg_incident_cost);
        let demurrage_cost = non_negative(inputs.demurrage_cost);

        let mut breakdown = FinancialBreakdown {
            revenue,
            fuel_cost,
            maintenance_cost,
            operator_cost,
            queue_cost,
            incident_risk_cost,
            demurrage_cost,
            operating_cost: fuel_cost + maintenance_cost + operator_cost,
            total_cost: 0.0,
            net_profit: 0.0,
        };
        breakdown.total_cost = breakdown.cost_components().iter().sum();
        breakdown.net_profit = breakdown.revenue - breakdown.total_cost;
        breakdown
    }
}

impl Default for FinancialAggregator {
    fn default() -> Self {
        Self::new()
    }
}

fn non_negative(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}
