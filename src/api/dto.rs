// ==========================================
// 板卡选型优化系统 - 批处理数据传输对象
// ==========================================
// 职责: 批处理流水线的输入/输出线格式
// 红线: 线上字段名保持既有拼写不变（含 linprog_requiremnets 的历史拼写），
//       协作方已按此拼写对接
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::engine::matcher::{RequirementSpec, SpecValue};

pub use crate::engine::optimizer::{
    CandidateBoard, ChannelSatisfaction, LineItem, ProcurementPlan, RequirementSummaryItem,
    UnsatisfiedRequirement,
};

// ==========================================
// 输入: 需求条目
// ==========================================

/// 批处理输入的单条需求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementInput {
    /// 需求 ID，缺省时由流水线合成
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// 原始自然语言需求文本
    #[serde(default)]
    pub original: String,

    /// DNF 逻辑表达式文本
    #[serde(rename = "DNF", default)]
    pub dnf: String,
}

// ==========================================
// 输出: 匹配记录
// ==========================================

/// 单 (板卡, 需求) 对的匹配记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// 板卡 ID
    pub id: String,

    /// 需求 ID
    pub requirement_id: String,

    /// 板卡型号
    pub model: String,

    /// 板卡描述（简述缺失时为详述）
    pub description: String,

    /// 需求原文
    pub original: String,

    /// 匹配度百分比 (0 ~ 100，向下取整)
    pub match_percentage: u8,

    /// 需求规格: 字段 → 需求值与操作符
    pub requirement_specification: RequirementSpec,

    /// 板卡规格: 需求涉及字段的板卡实际值
    pub board_specification: BTreeMap<String, SpecValue>,

    /// 合规映射: "<字段>_ok" → 是否满足
    pub compliance: BTreeMap<String, bool>,
}

/// 批处理过程统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingInfo {
    /// 输入需求总条数（含被跳过的空 DNF）
    pub requirements_processed: usize,

    /// 进入求解的候选板卡行数（100% 匹配去重后）
    pub boards_found: usize,

    /// 产出的匹配记录总数
    pub matches_made: usize,
}

// ==========================================
// 输出: 批处理结果
// ==========================================

/// 批处理完整输出（匹配报告 + 优化求解结果的合并视图）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutput {
    /// 批次时间戳 (ISO-8601 本地时间)
    pub timestamp: String,

    /// 候选板卡行（100% 匹配集去重，保持目录顺序）
    pub linprog_input_data: Vec<CandidateBoard>,

    /// 聚合后的通道需求向量（39 槽位）
    // 线上拼写如此，不得修正
    #[serde(rename = "linprog_requiremnets")]
    pub linprog_requirements: Vec<i64>,

    /// 全部匹配记录
    pub matched_boards: Vec<MatchRecord>,

    /// 至少命中一条需求字段的板卡数（去重）
    pub total_candidates: usize,

    /// 100% 匹配的板卡数（去重）
    pub total_matches: usize,

    /// 过程统计
    pub processing_info: ProcessingInfo,

    /// 优化求解结果（字段平铺到顶层）
    #[serde(flatten)]
    pub optimization: ProcurementPlan,
}
