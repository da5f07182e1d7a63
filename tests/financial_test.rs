// ==========================================
// 财务参数解析与汇总集成测试
// ==========================================
// 测试目标: 验证财务参数优先级及仿真结果中的各成本项
// 覆盖范围:
// - 默认值 → 司机平均月薪 → 系统配置 → 显式覆写
// - 收入 / 人工 / 排队成本公式
// ==========================================

mod helpers;

use helpers::fixtures::{context, registry, scenario, standard_records};
use helpers::stub_predictor::ConstantPredictor;
use haul_fleet_sim::config::config_keys;
use haul_fleet_sim::engine::resolve_financial_config;
use haul_fleet_sim::{FinancialOverrides, FleetRecords, SimulationEngine};
use std::sync::Arc;

fn records_with_configs(pairs: &[(&str, &str)]) -> FleetRecords {
    let mut records = standard_records();
    records.system_configs = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    records
}

#[test]
fn test_financial_precedence() {
    println!("\n=== 测试：财务参数优先级 ===");

    let records = records_with_configs(&[
        (config_keys::COAL_PRICE, "1000000"),
        (config_keys::FUEL_PRICE, "not-a-number"),
    ]);
    let reg = registry(records);

    let resolved = resolve_financial_config(&reg, &FinancialOverrides::default());
    assert_eq!(resolved.coal_price_per_ton, 1_000_000.0, "系统配置应覆盖默认煤价");
    assert_eq!(resolved.fuel_price_per_liter, 15_000.0, "无法解析的配置保留默认值");
    assert_eq!(resolved.avg_operator_monthly_salary, 5_000_000.0);
    println!("✓ 系统配置生效, 非法值忽略");

    let overrides = FinancialOverrides {
        coal_price_per_ton: Some(900_000.0),
        ..Default::default()
    };
    let resolved = resolve_financial_config(&reg, &overrides);
    assert_eq!(resolved.coal_price_per_ton, 900_000.0, "显式覆写优先级最高");
    println!("✓ 显式覆写生效");

    println!("=== 测试通过 ===\n");
}

#[test]
fn test_salary_config_beats_operator_mean() {
    println!("\n=== 测试：系统配置月薪优先于司机平均月薪 ===");

    let mut records = records_with_configs(&[(config_keys::OPERATOR_SALARY, "7200000")]);
    for op in records.operators.iter_mut() {
        op.monthly_salary = Some(6_000_000.0);
    }
    let resolved = resolve_financial_config(&registry(records), &FinancialOverrides::default());

    assert_eq!(resolved.avg_operator_monthly_salary, 7_200_000.0);
    assert_eq!(resolved.operator_hourly_salary(), 10_000.0);
    println!("✓ 时薪 {:.0}", resolved.operator_hourly_salary());

    println!("=== 测试通过 ===\n");
}

#[test]
fn test_cost_components_in_simulation() {
    println!("\n=== 测试：仿真结果成本项 ===");

    let records = records_with_configs(&[(config_keys::OPERATOR_SALARY, "7200000")]);
    let ctx = context(records, Arc::new(ConstantPredictor::new(12.0, 28.0)));
    let result = SimulationEngine::new(&ctx)
        .run(&scenario(10, 2, "R2"))
        .expect("仿真失败");
    let f = &result.financials;

    assert!((f.revenue - result.total_tonnage_t * 800_000.0).abs() < 1e-3);
    assert!((f.fuel_cost - result.total_fuel_l * 15_000.0).abs() < 1e-3);
    // 14 人 × 10000/小时 × 8 小时
    assert!((f.operator_cost - 1_120_000.0).abs() < 1e-6);
    assert!((f.queue_cost - result.total_queue_hours * 100_000.0).abs() < 1e-3);
    assert!((f.incident_risk_cost - result.delay_probability_sum * 50_000_000.0).abs() < 1e-3);
    assert!((f.maintenance_cost - result.maintenance_accrued).abs() < 1e-6);
    assert!((f.total_cost - f.cost_components().iter().sum::<f64>()).abs() < 1e-6);
    println!(
        "✓ 收入 {:.0}, 总成本 {:.0}, 净利润 {:.0}",
        f.revenue, f.total_cost, f.net_profit
    );

    println!("=== 测试通过 ===\n");
}
