// ==========================================
// 板卡选型优化系统 - 匹配引擎
// ==========================================
// 职责: 板卡 × DNF 的布尔匹配、条件覆盖统计、合规映射与匹配度打分
// 注意: 布尔匹配按合取项语义（短路），匹配度按扁平条件逐条计数，
//       两种口径刻意不同，均须保持
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::domain::board::{BoardRecord, CatalogSnapshot};
use crate::domain::scalar::Scalar;
use crate::domain::types::{Clause, CompareOp, Dnf, Operand};
use crate::engine::evaluator::ConditionEvaluator;

// ==========================================
// 需求规格 / 板卡规格
// ==========================================

/// 需求规格条目: 单字段的需求值与操作符
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecEntry {
    /// 标量需求值（比较类操作符）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Scalar>,

    /// 集合需求值（⊇/∈）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,

    /// 操作符
    pub operator: CompareOp,
}

/// 需求规格: 字段名（小写）→ 条目
pub type RequirementSpec = BTreeMap<String, SpecEntry>;

/// 板卡规格条目: 板卡中对应字段的实际值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecValue {
    pub value: Scalar,
}

// ==========================================
// 匹配状态报告
// ==========================================

/// 全需求集的条件覆盖报告
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchStatus {
    /// 各条件是否被至少一块板卡满足
    pub condition_status: BTreeMap<String, bool>,

    /// 满足比例 (0.0 ~ 1.0)
    pub satisfied_ratio: f64,

    /// 被命中合取项覆盖的条件列表
    pub matched_with: Vec<String>,

    /// 条件总数
    pub total_conditions: usize,

    /// 被满足的条件数
    pub matched_conditions_count: usize,
}

// ==========================================
// MatchingEngine - 纯函数匹配引擎
// ==========================================
pub struct MatchingEngine;

impl MatchingEngine {
    /// 布尔匹配: 任一合取项全部满足即匹配
    ///
    /// 合取项内部在首个失败条件处短路。
    pub fn matches_dnf(record: &BoardRecord, dnf: &Dnf) -> bool {
        Self::matching_clause(record, dnf).is_some()
    }

    /// 返回首个被满足的合取项（合取项顺序即隐式偏好，首中即止）
    pub fn matching_clause<'a>(record: &BoardRecord, dnf: &'a Dnf) -> Option<&'a Clause> {
        dnf.iter().find(|clause| {
            !clause.is_empty()
                && clause
                    .iter()
                    .all(|cond| ConditionEvaluator::evaluate(record, cond))
        })
    }

    /// 枚举模式: 评估整个目录，返回匹配板卡与条件覆盖报告
    pub fn find_matching_boards<'a>(
        catalog: &'a CatalogSnapshot,
        dnf: &Dnf,
    ) -> (Vec<&'a BoardRecord>, MatchStatus) {
        let all_conditions = Self::unique_condition_texts(dnf);
        if dnf.is_empty() {
            return (Vec::new(), MatchStatus::default());
        }

        let mut matched = Vec::new();
        let mut matched_conditions: BTreeSet<String> = BTreeSet::new();
        let mut matched_order: Vec<String> = Vec::new();

        for board in catalog.boards() {
            if let Some(clause) = Self::matching_clause(board, dnf) {
                matched.push(board);
                for cond in clause {
                    if matched_conditions.insert(cond.raw.clone()) {
                        matched_order.push(cond.raw.clone());
                    }
                }
            }
        }

        let condition_status: BTreeMap<String, bool> = all_conditions
            .iter()
            .map(|c| (c.clone(), matched_conditions.contains(c)))
            .collect();
        let total = all_conditions.len();
        let satisfied = matched_conditions.len();
        let status = MatchStatus {
            condition_status,
            satisfied_ratio: if total > 0 {
                satisfied as f64 / total as f64
            } else {
                0.0
            },
            matched_with: matched_order,
            total_conditions: total,
            matched_conditions_count: satisfied,
        };

        debug!(
            "枚举匹配完成: {} 块板卡命中, 条件覆盖 {}/{}",
            matched.len(),
            satisfied,
            total
        );
        (matched, status)
    }

    /// 构建合规映射: 每个条件独立评估（不短路），键为 "<字段>_ok"
    ///
    /// 同字段的多个条件会折叠到同一个键（映射语义）。
    pub fn build_compliance(record: &BoardRecord, dnf: &Dnf) -> BTreeMap<String, bool> {
        let mut compliance = BTreeMap::new();
        for clause in dnf {
            for cond in clause {
                let ok = ConditionEvaluator::evaluate(record, cond);
                compliance.insert(format!("{}_ok", cond.field), ok);
            }
        }
        compliance
    }

    /// 匹配度百分比: 满足条件数 / 总条件数 × 100，向下取整
    pub fn match_percentage(compliance: &BTreeMap<String, bool>) -> u8 {
        let total = compliance.len();
        if total == 0 {
            return 0;
        }
        let satisfied = compliance.values().filter(|ok| **ok).count();
        (satisfied * 100 / total) as u8
    }

    /// 提取 DNF 涉及的全部字段名（小写，保持出现顺序，去重）
    pub fn extract_fields(dnf: &Dnf) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut fields = Vec::new();
        for clause in dnf {
            for cond in clause {
                if seen.insert(cond.field.clone()) {
                    fields.push(cond.field.clone());
                }
            }
        }
        fields
    }

    /// 提取需求规格: 字段 → 需求值与操作符（同字段后出现的条件覆盖先前的）
    pub fn extract_requirement_specification(dnf: &Dnf) -> RequirementSpec {
        let mut spec = RequirementSpec::new();
        for clause in dnf {
            for cond in clause {
                let entry = match &cond.operand {
                    Operand::Value(v) => SpecEntry {
                        value: Some(v.clone()),
                        values: None,
                        operator: cond.operator,
                    },
                    Operand::Values(vs) => SpecEntry {
                        value: None,
                        values: Some(vs.clone()),
                        operator: cond.operator,
                    },
                };
                spec.insert(cond.field.clone(), entry);
            }
        }
        spec
    }

    /// 提取板卡规格: 需求规格涉及字段在板卡中的实际值（缺失字段不出现）
    pub fn extract_board_specification(
        record: &BoardRecord,
        requirement_spec: &RequirementSpec,
    ) -> BTreeMap<String, SpecValue> {
        let mut spec = BTreeMap::new();
        for field in requirement_spec.keys() {
            if let Some(value) = record.get(field) {
                spec.insert(field.clone(), SpecValue { value: value.clone() });
            }
        }
        spec
    }

    /// 筛选指定字段中至少一个有值的板卡
    pub fn boards_with_values<'a>(
        catalog: &'a CatalogSnapshot,
        fields: &[String],
    ) -> Vec<&'a BoardRecord> {
        if fields.is_empty() {
            return Vec::new();
        }
        catalog
            .boards()
            .iter()
            .filter(|b| b.has_any_value(fields))
            .collect()
    }

    /// DNF 中的条件原文列表（保持出现顺序，去重）
    fn unique_condition_texts(dnf: &Dnf) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut texts = Vec::new();
        for clause in dnf {
            for cond in clause {
                if seen.insert(cond.raw.clone()) {
                    texts.push(cond.raw.clone());
                }
            }
        }
        texts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::expr_parser::ExpressionParser;

    fn catalog() -> CatalogSnapshot {
        CatalogSnapshot::new(vec![
            BoardRecord::new(vec![
                ("id", Scalar::Text("B001".to_string())),
                ("model", Scalar::Text("UART-8".to_string())),
                ("uart_channel_count", Scalar::Int(8)),
                ("resolution_bits", Scalar::Int(16)),
            ]),
            BoardRecord::new(vec![
                ("id", Scalar::Text("B002".to_string())),
                ("model", Scalar::Text("CAN-2".to_string())),
                ("can_channel_count", Scalar::Int(2)),
                ("resolution_bits", Scalar::Int(12)),
            ]),
            BoardRecord::new(vec![
                ("id", Scalar::Text("B003".to_string())),
                ("model", Scalar::Text("BLANK".to_string())),
            ]),
        ])
    }

    // ==========================================
    // 测试 1: 布尔匹配（合取项语义）
    // ==========================================

    #[test]
    fn test_matches_any_clause() {
        let cat = catalog();
        let dnf = ExpressionParser::parse("uart_channel_count≥4 or can_channel_count≥1");
        assert!(MatchingEngine::matches_dnf(&cat.boards()[0], &dnf));
        assert!(MatchingEngine::matches_dnf(&cat.boards()[1], &dnf));
        assert!(!MatchingEngine::matches_dnf(&cat.boards()[2], &dnf));
    }

    #[test]
    fn test_first_satisfying_clause_wins() {
        let cat = catalog();
        // 两个合取项都满足 B001，返回第一个
        let dnf = ExpressionParser::parse("resolution_bits≥16 or uart_channel_count≥1");
        let clause = MatchingEngine::matching_clause(&cat.boards()[0], &dnf).unwrap();
        assert_eq!(clause[0].field, "resolution_bits");
    }

    #[test]
    fn test_clause_requires_all_conditions() {
        let cat = catalog();
        let dnf = ExpressionParser::parse("uart_channel_count≥1 and resolution_bits≥24");
        assert!(!MatchingEngine::matches_dnf(&cat.boards()[0], &dnf));
    }

    // ==========================================
    // 测试 2: 枚举模式与覆盖报告
    // ==========================================

    #[test]
    fn test_find_matching_boards_coverage() {
        let cat = catalog();
        let dnf = ExpressionParser::parse("uart_channel_count≥4 or can_channel_count≥1");
        let (matched, status) = MatchingEngine::find_matching_boards(&cat, &dnf);
        assert_eq!(matched.len(), 2);
        assert_eq!(status.total_conditions, 2);
        assert_eq!(status.matched_conditions_count, 2);
        assert!((status.satisfied_ratio - 1.0).abs() < 1e-9);
        assert_eq!(status.condition_status["uart_channel_count≥4"], true);
    }

    #[test]
    fn test_coverage_partial() {
        let cat = catalog();
        let dnf = ExpressionParser::parse("uart_channel_count≥4 or lvds_channel_count≥1");
        let (matched, status) = MatchingEngine::find_matching_boards(&cat, &dnf);
        assert_eq!(matched.len(), 1);
        assert_eq!(status.matched_conditions_count, 1);
        assert_eq!(status.condition_status["lvds_channel_count≥1"], false);
        assert!((status.satisfied_ratio - 0.5).abs() < 1e-9);
    }

    // ==========================================
    // 测试 3: 合规映射与匹配度
    // ==========================================

    #[test]
    fn test_compliance_not_short_circuited() {
        let cat = catalog();
        // 合取项语义下 B001 不匹配，但合规映射逐条评估
        let dnf = ExpressionParser::parse("resolution_bits≥24 and uart_channel_count≥1");
        let compliance = MatchingEngine::build_compliance(&cat.boards()[0], &dnf);
        assert_eq!(compliance["resolution_bits_ok"], false);
        assert_eq!(compliance["uart_channel_count_ok"], true);
        assert_eq!(MatchingEngine::match_percentage(&compliance), 50);
    }

    #[test]
    fn test_match_percentage_truncates() {
        let mut compliance = BTreeMap::new();
        compliance.insert("a_ok".to_string(), true);
        compliance.insert("b_ok".to_string(), false);
        compliance.insert("c_ok".to_string(), false);
        // 1/3 → 33（向下取整）
        assert_eq!(MatchingEngine::match_percentage(&compliance), 33);
        assert_eq!(MatchingEngine::match_percentage(&BTreeMap::new()), 0);
    }

    // ==========================================
    // 测试 4: 字段与规格提取
    // ==========================================

    #[test]
    fn test_extract_fields_deduped() {
        let dnf = ExpressionParser::parse("a≥1 and b≥2 or a≥3");
        assert_eq!(MatchingEngine::extract_fields(&dnf), vec!["a", "b"]);
    }

    #[test]
    fn test_extract_requirement_specification() {
        let dnf = ExpressionParser::parse("uart_channel_count≥4 and brand=NI");
        let spec = MatchingEngine::extract_requirement_specification(&dnf);
        assert_eq!(spec["uart_channel_count"].value, Some(Scalar::Int(4)));
        assert_eq!(spec["uart_channel_count"].operator, CompareOp::Ge);
        assert_eq!(spec["brand"].value, Some(Scalar::Text("NI".to_string())));
    }

    #[test]
    fn test_extract_board_specification_skips_missing() {
        let cat = catalog();
        let dnf = ExpressionParser::parse("uart_channel_count≥4 and brand=NI");
        let spec = MatchingEngine::extract_requirement_specification(&dnf);
        let board_spec = MatchingEngine::extract_board_specification(&cat.boards()[0], &spec);
        assert_eq!(board_spec["uart_channel_count"].value, Scalar::Int(8));
        assert!(!board_spec.contains_key("brand"));
    }

    #[test]
    fn test_boards_with_values() {
        let cat = catalog();
        let boards = MatchingEngine::boards_with_values(
            &cat,
            &["uart_channel_count".to_string(), "can_channel_count".to_string()],
        );
        assert_eq!(boards.len(), 2);
        let none = MatchingEngine::boards_with_values(&cat, &[]);
        assert!(none.is_empty());
    }
}
