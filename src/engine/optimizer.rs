// ==========================================
// 板卡选型优化系统 - 采购方案优化器
// ==========================================
// 职责: 最小成本整数覆盖规划（需求可行性检查 + 约束放宽 + MILP 求解）
// 求解: 委托 good_lp / microlp 通用整数规划求解器，保持最优性保证
// 红线: 求解失败返回结构化 success=false，不抛异常；
//       通道满足度按放宽前的原始需求报告，"不足"状态对外可见
// ==========================================

use good_lp::{constraint, microlp, variable, variables, Expression, Solution, SolverModel};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::channel_fields::{CHANNEL_COUNT, CHANNEL_COUNT_FIELDS};
use crate::error::{CoreError, CoreResult};

// ==========================================
// 输入: 候选板卡
// ==========================================

/// 候选板卡（完全匹配且去重后的采购候选）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateBoard {
    /// 板卡 ID
    pub id: String,

    /// 通道矩阵（39 个槽位，全局固定顺序）
    pub matrix_channel_count: Vec<i64>,

    /// 板卡型号
    pub model: String,

    /// 单价（元）
    pub price_cny: f64,

    /// 该板卡满足的原始需求文本列表
    pub original: Vec<String>,
}

// ==========================================
// 输出: 采购方案
// ==========================================

/// 方案行项: 单一型号的采购数量与金额
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    pub model: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub total_price: f64,
    pub original: Vec<String>,
}

/// 正需求槽位摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementSummaryItem {
    pub index: usize,
    pub channel_type: String,
    pub required: i64,
}

/// 单通道的满足情况（按放宽前的原始需求判定）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSatisfaction {
    pub channel_type: String,
    pub required: i64,
    pub satisfied: i64,
    pub status: String,
}

/// 供给总量不足、被放宽的需求槽位
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsatisfiedRequirement {
    pub index: usize,
    pub channel_type: String,
    pub required: i64,
    pub available: i64,
}

/// 采购方案（优化器单次调用的不可变结果值）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcurementPlan {
    /// 求解是否成功
    pub success: bool,

    /// 结果说明（失败时为求解器诊断信息）
    pub message: String,

    /// 参与求解的候选板卡数
    pub total_cards: usize,

    /// 正需求槽位摘要（按放宽前的原始需求）
    pub requirements_summary: Vec<RequirementSummaryItem>,

    /// 方案行项（失败时为 None）
    pub optimized_solution: Option<Vec<LineItem>>,

    /// 总成本（失败时为 None）
    pub total_cost: Option<f64>,

    /// 各通道满足情况（失败时为 None）
    pub channel_satisfaction: Option<Vec<ChannelSatisfaction>>,

    /// 被放宽的不可满足需求
    pub unsatisfied_requirements: Vec<UnsatisfiedRequirement>,
}

impl ProcurementPlan {
    /// 无候选板卡时的占位结果（批处理层在候选为空时使用）
    pub fn no_candidates() -> Self {
        Self {
            success: false,
            message: "无候选板卡，跳过优化求解".to_string(),
            total_cards: 0,
            requirements_summary: Vec::new(),
            optimized_solution: None,
            total_cost: None,
            channel_satisfaction: None,
            unsatisfied_requirements: Vec::new(),
        }
    }
}

// ==========================================
// SelectionOptimizer - 整数覆盖优化器
// ==========================================
pub struct SelectionOptimizer;

impl SelectionOptimizer {
    /// 求解最小成本采购方案
    ///
    /// # 步骤
    /// 1. 形状校验（需求向量与各候选通道矩阵均须为 39 槽位）
    /// 2. 可行性检查: 正需求槽位的供给总量不足时记录并放宽为 0
    ///    （原始需求保留用于报告）
    /// 3. MILP: min Σ price·x，s.t. Σ cap[i][j]·x[i] ≥ relaxed[j]，x 为非负整数
    /// 4. 求解失败 → success=false + 诊断信息
    /// 5. 成功 → 行项 (x > 0.5)、总成本、按原始需求的通道满足度
    ///
    /// # 错误
    /// - 形状不符 / 候选为空 → 硬校验错误，在求解开始前返回
    pub fn optimize(
        candidates: &[CandidateBoard],
        requirements: &[i64],
    ) -> CoreResult<ProcurementPlan> {
        // 1. 形状校验
        if requirements.len() != CHANNEL_COUNT {
            return Err(CoreError::ShapeMismatch {
                expected: CHANNEL_COUNT,
                actual: requirements.len(),
            });
        }
        if candidates.is_empty() {
            return Err(CoreError::NoCandidates);
        }
        for (index, card) in candidates.iter().enumerate() {
            if card.matrix_channel_count.len() != CHANNEL_COUNT {
                return Err(CoreError::CandidateShapeMismatch {
                    index,
                    model: card.model.clone(),
                    expected: CHANNEL_COUNT,
                    actual: card.matrix_channel_count.len(),
                });
            }
        }

        // 2. 可行性检查与约束放宽
        let mut unsatisfied_requirements = Vec::new();
        let mut relaxed = requirements.to_vec();
        for (j, channel_type) in CHANNEL_COUNT_FIELDS.iter().enumerate() {
            if requirements[j] <= 0 {
                continue;
            }
            let available: i64 = candidates.iter().map(|c| c.matrix_channel_count[j]).sum();
            let max_single: i64 = candidates
                .iter()
                .map(|c| c.matrix_channel_count[j])
                .max()
                .unwrap_or(0);
            debug!(
                "通道 {}: 需求 {}, 可用总量 {}, 单卡最大 {}",
                channel_type, requirements[j], available, max_single
            );
            if available < requirements[j] {
                warn!(
                    "通道 {} 供给不足 (需求 {}, 最大可用 {})，放宽该约束",
                    channel_type, requirements[j], available
                );
                unsatisfied_requirements.push(UnsatisfiedRequirement {
                    index: j,
                    channel_type: channel_type.to_string(),
                    required: requirements[j],
                    available,
                });
                relaxed[j] = 0;
            }
        }

        let requirements_summary: Vec<RequirementSummaryItem> = requirements
            .iter()
            .enumerate()
            .filter(|(_, req)| **req > 0)
            .map(|(index, req)| RequirementSummaryItem {
                index,
                channel_type: CHANNEL_COUNT_FIELDS[index].to_string(),
                required: *req,
            })
            .collect();

        // 3. 整数规划求解
        let mut problem = variables!();
        let quantities: Vec<_> = candidates
            .iter()
            .map(|_| problem.add(variable().integer().min(0)))
            .collect();

        let cost: Expression = quantities
            .iter()
            .zip(candidates)
            .map(|(x, card)| card.price_cny * *x)
            .sum();

        let mut model = problem.minimise(cost).using(microlp);
        for (j, req) in relaxed.iter().enumerate() {
            if *req <= 0 {
                continue;
            }
            let supplied: Expression = quantities
                .iter()
                .zip(candidates)
                .map(|(x, card)| card.matrix_channel_count[j] as f64 * *x)
                .sum();
            model = model.with(constraint!(supplied >= *req as f64));
        }

        // 4. 求解失败 → 结构化失败结果
        let solution = match model.solve() {
            Ok(solution) => solution,
            Err(e) => {
                warn!("优化求解失败: {}", e);
                return Ok(ProcurementPlan {
                    success: false,
                    message: format!("优化求解失败: {}", e),
                    total_cards: candidates.len(),
                    requirements_summary,
                    optimized_solution: None,
                    total_cost: None,
                    channel_satisfaction: None,
                    unsatisfied_requirements,
                });
            }
        };

        // 5. 构建方案（整数约束下求解器仍返回浮点值，> 0.5 即计入）
        let mut line_items = Vec::new();
        let mut total_cost = 0.0;
        let mut solved_quantities = vec![0i64; candidates.len()];
        for (i, (x, card)) in quantities.iter().zip(candidates).enumerate() {
            let raw = solution.value(*x);
            if raw > 0.5 {
                let quantity = raw.round() as i64;
                let total_price = quantity as f64 * card.price_cny;
                solved_quantities[i] = quantity;
                total_cost += total_price;
                line_items.push(LineItem {
                    id: card.id.clone(),
                    model: card.model.clone(),
                    quantity,
                    unit_price: card.price_cny,
                    total_price,
                    original: card.original.clone(),
                });
            }
        }

        // 通道满足度按放宽前的原始需求判定，"不足"对外可见
        let mut channel_satisfaction = Vec::new();
        for (j, channel_type) in CHANNEL_COUNT_FIELDS.iter().enumerate() {
            let satisfied: i64 = candidates
                .iter()
                .zip(&solved_quantities)
                .map(|(c, q)| c.matrix_channel_count[j] * q)
                .sum();
            if requirements[j] > 0 || satisfied > 0 {
                channel_satisfaction.push(ChannelSatisfaction {
                    channel_type: channel_type.to_string(),
                    required: requirements[j],
                    satisfied,
                    status: if satisfied >= requirements[j] {
                        "OK".to_string()
                    } else {
                        "不足".to_string()
                    },
                });
            }
        }

        debug!(
            "优化成功: {} 个行项, 总成本 {}",
            line_items.len(),
            total_cost
        );
        Ok(ProcurementPlan {
            success: true,
            message: "优化成功".to_string(),
            total_cards: candidates.len(),
            requirements_summary,
            optimized_solution: Some(line_items),
            total_cost: Some(total_cost),
            channel_satisfaction: Some(channel_satisfaction),
            unsatisfied_requirements,
        })
    }
}
