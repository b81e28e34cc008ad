// ==========================================
// 板卡选型优化系统 - 领域层
// ==========================================
// 职责: 定义标量值、条件/DNF 结构、板卡记录与目录快照
// ==========================================

pub mod board;
pub mod channel_fields;
pub mod scalar;
pub mod types;

// 重导出核心实体
pub use board::{BoardRecord, CatalogSnapshot};
pub use channel_fields::{is_channel_count_field, CHANNEL_COUNT, CHANNEL_COUNT_FIELDS};
pub use scalar::Scalar;
pub use types::{Clause, CompareOp, Condition, Dnf, Operand};
