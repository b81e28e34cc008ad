// ==========================================
// 板卡选型优化系统 - 核心错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 单条件解析/评估失败不致命，形状错误与目录不可用为硬错误
// ==========================================

use thiserror::Error;

/// 核心错误类型
#[derive(Error, Debug)]
pub enum CoreError {
    // ===== 解析错误 =====
    #[error("条件格式无法识别: {0}")]
    MalformedCondition(String),

    #[error("集合格式错误: {0}（期望 {{a, b, c}} 形式）")]
    MalformedSet(String),

    // ===== 形状校验错误 =====
    #[error("需求向量长度错误: 期望 {expected} 个元素，实际 {actual} 个")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("板卡 [{index}] {model} 的通道矩阵长度错误: 期望 {expected} 个元素，实际 {actual} 个")]
    CandidateShapeMismatch {
        index: usize,
        model: String,
        expected: usize,
        actual: usize,
    },

    #[error("候选板卡列表为空，无法求解")]
    NoCandidates,

    // ===== 目录错误 =====
    #[error("板卡目录不可用: {0}")]
    CatalogUnavailable(String),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type CoreResult<T> = Result<T, CoreError>;
