// ==========================================
// 车队班次仿真 - 服务层
// ==========================================
// 职责: 面向调用方的异步门面与请求/响应 DTO
// ==========================================

pub mod error;
pub mod planning_service;

pub use error::{ServiceError, ServiceResult};
pub use planning_service::{
    PlanningService, RecommendationRequest, RecommendationResponse, SimulateRequest,
};
