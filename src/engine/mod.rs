// ==========================================
// 板卡选型优化系统 - 引擎层
// ==========================================
// 职责: 表达式解析、条件评估、板卡匹配、需求聚合、采购优化
// 红线: 引擎为纯计算，无 I/O；单条件失败降级，不拖垮整个需求
// ==========================================

pub mod aggregator;
pub mod cond_parser;
pub mod evaluator;
pub mod expr_parser;
pub mod matcher;
pub mod optimizer;

// 重导出核心引擎
pub use aggregator::RequirementAggregator;
pub use cond_parser::ConditionParser;
pub use evaluator::ConditionEvaluator;
pub use expr_parser::ExpressionParser;
pub use matcher::{MatchStatus, MatchingEngine, RequirementSpec, SpecEntry, SpecValue};
pub use optimizer::{
    CandidateBoard, ChannelSatisfaction, LineItem, ProcurementPlan, RequirementSummaryItem,
    SelectionOptimizer, UnsatisfiedRequirement,
};
