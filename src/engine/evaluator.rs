// ==========================================
// 板卡选型优化系统 - 条件评估器
// ==========================================
// 职责: 对单板卡 × 单条件给出布尔判定
// 红线: 评估永不失败，无法判定的比较一律视为不满足 (fail-closed)
// ==========================================

use tracing::debug;

use crate::domain::board::BoardRecord;
use crate::domain::channel_fields::is_channel_count_field;
use crate::domain::scalar::Scalar;
use crate::domain::types::{CompareOp, Condition};

/// 浮点等值比较容差
const FLOAT_EQ_EPSILON: f64 = 1e-9;

// ==========================================
// ConditionEvaluator - 纯函数评估器
// ==========================================
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// 评估单个条件
    ///
    /// # 规则
    /// 1. 字段缺失或为空 → false
    /// 2. 通道计数字段: 忽略操作符，退化为"有值且非零"检查
    ///    （领域规则: 通道类需求由"具备该通道"即满足，不做阈值比较；
    ///    此行为会把 ≥10、=0 等数值比较悄然重释为存在性检查，按约保留）
    /// 3. 其余字段按操作符语义比较
    pub fn evaluate(record: &BoardRecord, condition: &Condition) -> bool {
        let Some(field_value) = record.get(&condition.field) else {
            debug!("字段 '{}' 缺失 -> false", condition.field);
            return false;
        };

        if is_channel_count_field(&condition.field) {
            let result = Self::channel_value_present(field_value);
            debug!(
                "字段 '{}': 通道计数字段简化检查, 值 {} -> {}",
                condition.field, field_value, result
            );
            return result;
        }

        match condition.operator {
            CompareOp::Ge => Self::compare_numeric(field_value, condition, |a, b| a >= b),
            CompareOp::Le => Self::compare_numeric(field_value, condition, |a, b| a <= b),
            CompareOp::Gt => Self::compare_numeric(field_value, condition, |a, b| a > b),
            CompareOp::Lt => Self::compare_numeric(field_value, condition, |a, b| a < b),
            CompareOp::Eq => Self::evaluate_eq(field_value, condition),
            CompareOp::Ne => !Self::evaluate_eq(field_value, condition),
            CompareOp::Superset => Self::evaluate_superset(field_value, condition),
            CompareOp::In => Self::evaluate_in(field_value, condition),
        }
    }

    /// 通道计数字段的存在性检查: 有值、可转数值且不为 0
    ///
    /// # 规则
    /// - 数值 → 非零
    /// - 数字文本 → 解析后非零；非数字文本 → 去空白后非空
    /// - 列表 → 视为具备（存在即满足）
    fn channel_value_present(value: &Scalar) -> bool {
        match value {
            Scalar::Int(i) => *i != 0,
            Scalar::Float(f) => *f != 0.0,
            Scalar::Text(s) => match s.trim().parse::<f64>() {
                Ok(n) => n != 0.0,
                Err(_) => !s.trim().is_empty(),
            },
            Scalar::List(_) => true,
            Scalar::Null => false,
        }
    }

    /// 有序数值比较，要求两侧均为数值类型
    fn compare_numeric(
        field_value: &Scalar,
        condition: &Condition,
        cmp: impl Fn(f64, f64) -> bool,
    ) -> bool {
        let operand = condition.value().and_then(|v| v.as_f64());
        match (field_value.as_f64(), operand) {
            (Some(lhs), Some(rhs)) => {
                let result = cmp(lhs, rhs);
                debug!(
                    "字段 '{}': {} {} {} -> {}",
                    condition.field, lhs, condition.operator, rhs, result
                );
                result
            }
            _ => {
                debug!(
                    "字段 '{}': 无法进行数值比较 ({} vs {:?}) -> false",
                    condition.field, field_value, condition.value()
                );
                false
            }
        }
    }

    /// 等值判定: 数值走容差比较，数值强转失败回退为去空白的大小写敏感字符串比较
    fn evaluate_eq(field_value: &Scalar, condition: &Condition) -> bool {
        let Some(operand) = condition.value() else {
            return false;
        };
        if let (Some(lhs), Some(rhs)) = (field_value.as_f64(), operand.as_f64()) {
            return (lhs - rhs).abs() < FLOAT_EQ_EPSILON;
        }
        field_value.to_string().trim() == operand.to_string().trim()
    }

    /// 集合包含 ⊇: 板卡字段值视为集合（逗号分隔文本或列表），
    /// 要求每个需求值都出现在其中（子串或精确匹配）
    fn evaluate_superset(field_value: &Scalar, condition: &Condition) -> bool {
        let Some(required_values) = condition.values() else {
            return false;
        };

        let field_values: Vec<String> = match field_value {
            Scalar::Text(s) => {
                if s.contains(',') {
                    s.split(',').map(|v| v.trim().to_string()).collect()
                } else {
                    vec![s.trim().to_string()]
                }
            }
            Scalar::List(items) => items.iter().map(|v| v.to_string()).collect(),
            other => vec![other.to_string()],
        };

        required_values
            .iter()
            .all(|req| field_values.iter().any(|fv| fv.contains(req.as_str()) || fv == req))
    }

    /// 集合成员 ∈: 板卡字段值的字符串形式须出现在允许值列表中（忽略两侧空白）
    fn evaluate_in(field_value: &Scalar, condition: &Condition) -> bool {
        let Some(allowed_values) = condition.values() else {
            return false;
        };
        let field_str = field_value.to_string().trim().to_string();
        allowed_values.iter().any(|v| v.trim() == field_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Condition;
    use crate::engine::cond_parser::ConditionParser;

    fn board() -> BoardRecord {
        BoardRecord::new(vec![
            ("id", Scalar::Text("B001".to_string())),
            ("uart_channel_count", Scalar::Int(8)),
            ("da_channel_count", Scalar::Int(0)),
            ("resolution_bits", Scalar::Int(16)),
            ("sample_rate_mhz", Scalar::Float(1.25)),
            ("brand", Scalar::Text("NI".to_string())),
            ("interface_type", Scalar::Text("RS422, RS485, CAN".to_string())),
            ("bus_type", Scalar::Text("PXIe".to_string())),
        ])
    }

    fn cond(text: &str) -> Condition {
        ConditionParser::parse(text).unwrap()
    }

    // ==========================================
    // 测试 1: 通道计数字段短路规则
    // ==========================================

    #[test]
    fn test_channel_field_ignores_operator() {
        let b = board();
        // 有值非零 → 无论阈值如何都满足
        assert!(ConditionEvaluator::evaluate(&b, &cond("uart_channel_count≥4")));
        assert!(ConditionEvaluator::evaluate(&b, &cond("uart_channel_count≥100")));
        assert!(ConditionEvaluator::evaluate(&b, &cond("uart_channel_count=0")));
        // 值为 0 → 不满足
        assert!(!ConditionEvaluator::evaluate(&b, &cond("da_channel_count≥1")));
        // 字段缺失 → 不满足
        assert!(!ConditionEvaluator::evaluate(&b, &cond("can_channel_count≥1")));
    }

    #[test]
    fn test_channel_field_text_values() {
        let b = BoardRecord::new(vec![
            ("can_channel_count", Scalar::Text("2".to_string())),
            ("lvds_channel_count", Scalar::Text("0".to_string())),
            ("di_channel_count", Scalar::Text("若干".to_string())),
            ("do_channel_count", Scalar::Text("   ".to_string())),
        ]);
        // 数字文本解析后判非零，非数字文本判非空
        assert!(ConditionEvaluator::evaluate(&b, &cond("can_channel_count≥1")));
        assert!(!ConditionEvaluator::evaluate(&b, &cond("lvds_channel_count≥1")));
        assert!(ConditionEvaluator::evaluate(&b, &cond("di_channel_count≥1")));
        assert!(!ConditionEvaluator::evaluate(&b, &cond("do_channel_count≥1")));
    }

    // ==========================================
    // 测试 2: 数值比较
    // ==========================================

    #[test]
    fn test_numeric_comparisons() {
        let b = board();
        assert!(ConditionEvaluator::evaluate(&b, &cond("resolution_bits≥16")));
        assert!(ConditionEvaluator::evaluate(&b, &cond("resolution_bits<=16")));
        assert!(!ConditionEvaluator::evaluate(&b, &cond("resolution_bits>16")));
        assert!(ConditionEvaluator::evaluate(&b, &cond("sample_rate_mhz>1.0")));
        assert!(ConditionEvaluator::evaluate(&b, &cond("resolution_bits≠12")));
    }

    #[test]
    fn test_numeric_comparison_requires_numeric_field() {
        // 文本字段无法参与有序比较 → false (fail-closed)
        let b = board();
        assert!(!ConditionEvaluator::evaluate(&b, &cond("brand≥4")));
    }

    #[test]
    fn test_eq_epsilon_and_string_fallback() {
        let b = board();
        assert!(ConditionEvaluator::evaluate(&b, &cond("sample_rate_mhz=1.25")));
        // 数值强转失败回退字符串比较
        assert!(ConditionEvaluator::evaluate(&b, &cond("brand=NI")));
        assert!(!ConditionEvaluator::evaluate(&b, &cond("brand=ni")));
    }

    // ==========================================
    // 测试 3: 集合操作符
    // ==========================================

    #[test]
    fn test_superset() {
        let b = board();
        assert!(ConditionEvaluator::evaluate(
            &b,
            &cond("interface_type ⊇ {RS422, CAN}")
        ));
        assert!(!ConditionEvaluator::evaluate(
            &b,
            &cond("interface_type ⊇ {RS422, LVDS}")
        ));
    }

    #[test]
    fn test_in_allow_list() {
        let b = board();
        assert!(ConditionEvaluator::evaluate(
            &b,
            &cond("bus_type=PXI ∨ bus_type=PXIe")
        ));
        assert!(!ConditionEvaluator::evaluate(
            &b,
            &cond("bus_type=PCI ∨ bus_type=VME")
        ));
    }

    // ==========================================
    // 测试 4: 缺失字段
    // ==========================================

    #[test]
    fn test_missing_field_is_false() {
        let b = board();
        assert!(!ConditionEvaluator::evaluate(&b, &cond("weight_g≥100")));
    }
}
