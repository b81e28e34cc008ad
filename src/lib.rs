// ==========================================
// 板卡选型优化系统 - 核心库
// ==========================================
// 职责: 需求逻辑表达式解析、板卡匹配打分、采购方案优化
// 定位: 纯内存计算核心 (目录加载/报表渲染/HTTP 层为外部协作方)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 业务规则
pub mod engine;

// API 层 - 批处理接口
pub mod api;

// 错误类型
pub mod error;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::board::{BoardRecord, CatalogSnapshot};
pub use domain::channel_fields::{CHANNEL_COUNT, CHANNEL_COUNT_FIELDS};
pub use domain::scalar::Scalar;
pub use domain::types::{Clause, CompareOp, Condition, Dnf, Operand};

// 引擎
pub use engine::{
    ConditionEvaluator, ExpressionParser, MatchingEngine, RequirementAggregator,
    SelectionOptimizer,
};

// API
pub use api::dto::{
    BatchOutput, CandidateBoard, ChannelSatisfaction, LineItem, MatchRecord, ProcurementPlan,
    RequirementInput, RequirementSummaryItem, UnsatisfiedRequirement,
};
pub use api::SelectionApi;

// 错误
pub use error::{CoreError, CoreResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "板卡选型优化系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_channel_count_constant() {
        assert_eq!(CHANNEL_COUNT, CHANNEL_COUNT_FIELDS.len());
    }
}
