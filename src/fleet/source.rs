// ==========================================
// 车队班次仿真 - 车队数据源 Trait
// ==========================================
// 职责: 定义核心所需的车队数据读取接口（不包含实现）
// 红线: 只读,不包含持久化与回退加载逻辑
// ==========================================

use crate::domain::fleet::{
    Excavator, HaulingRecord, MaintenanceLog, Operator, RoadSegment, Truck, Vessel, VesselSchedule,
};
use crate::error::SimResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// FleetRecords - 原始车队记录
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetRecords {
    pub trucks: Vec<Truck>,
    pub excavators: Vec<Excavator>,
    pub operators: Vec<Operator>,
    pub roads: Vec<RoadSegment>,
    pub schedules: Vec<VesselSchedule>,
    pub vessels: Vec<Vessel>,
    pub maintenance: Vec<MaintenanceLog>,
    pub hauling_history: Vec<HaulingRecord>,
    /// 系统配置键值 (财务参数等)
    pub system_configs: HashMap<String, String>,
}

// ==========================================
// FleetDataSource Trait
// ==========================================
// 用途: 请求级加载车队快照
// 实现者: 外部数据层 / InMemoryFleetSource
#[async_trait]
pub trait FleetDataSource: Send + Sync {
    /// 读取截至 `as_of` 的车队记录
    async fn fetch_records(&self, as_of: DateTime<Utc>) -> anyhow::Result<FleetRecords>;
}

// ==========================================
// InMemoryFleetSource - 内存数据源
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct InMemoryFleetSource {
    records: FleetRecords,
}

impl InMemoryFleetSource {
    pub fn new(records: FleetRecords) -> Self {
        Self { records }
    }

    /// 从 JSON 文本构造
    pub fn from_json(raw: &str) -> SimResult<Self> {
        let records: FleetRecords = serde_json::from_str(raw)
            .map_err(|e| anyhow::anyhow!("车队记录 JSON 解析失败: {}", e))?;
        Ok(Self { records })
    }

    pub fn records(&self) -> &FleetRecords {
        &self.records
    }
}

#[async_trait]
impl FleetDataSource for InMemoryFleetSource {
    async fn fetch_records(&self, _as_of: DateTime<Utc>) -> anyhow::Result<FleetRecords> {
        Ok(self.records.clone())
    }
}
