// ==========================================
// 板卡选型优化系统 - 原子条件解析器
// ==========================================
// 职责: 将原子条件文本解析为 Condition
// 检测顺序: ⊇ → ≥ ≤ ≠ > < = (Unicode 优先于 ASCII 拼写)
// 特例: 原子内同时出现 = 与 ∨/or 时按隐式 ∈ (多选一等值) 解析
// ==========================================

use crate::domain::scalar::Scalar;
use crate::domain::types::{CompareOp, Condition};
use crate::error::{CoreError, CoreResult};

/// 比较操作符的拼写表，按检测顺序排列
///
/// ≥/≤/≠ 的 ASCII 拼写先于 >/< 检测，避免 ">=" 被 ">" 抢先命中。
const OPERATOR_SPELLINGS: [(CompareOp, &[&str]); 6] = [
    (CompareOp::Ge, &["≥", ">="]),
    (CompareOp::Le, &["≤", "<="]),
    (CompareOp::Ne, &["≠", "!="]),
    (CompareOp::Gt, &[">"]),
    (CompareOp::Lt, &["<"]),
    (CompareOp::Eq, &["="]),
];

// ==========================================
// ConditionParser - 纯函数解析器
// ==========================================
pub struct ConditionParser;

impl ConditionParser {
    /// 解析单个原子条件
    ///
    /// # 规则
    /// - 操作数无小数点 → 64 位整数，有小数点 → 浮点数，否则保留文本（去引号）
    /// - 字段名解析期统一小写（下游查找全部大小写不敏感）
    ///
    /// # 错误
    /// - 未识别到任何操作符 → `MalformedCondition`
    pub fn parse(text: &str) -> CoreResult<Condition> {
        let condition = text.trim();
        if condition.is_empty() {
            return Err(CoreError::MalformedCondition(text.to_string()));
        }

        // 集合包含 ⊇，操作数为花括号包裹的逗号列表
        if let Some(pos) = condition.find('⊇') {
            let field = &condition[..pos];
            let set_str = condition[pos + '⊇'.len_utf8()..].trim();
            if !(set_str.starts_with('{') && set_str.ends_with('}')) {
                return Err(CoreError::MalformedSet(set_str.to_string()));
            }
            let values: Vec<String> = set_str[1..set_str.len() - 1]
                .split(',')
                .map(Self::strip_quotes)
                .filter(|v| !v.is_empty())
                .collect();
            return Ok(Condition::set(field, CompareOp::Superset, values, condition));
        }

        // 比较操作符，Unicode 与 ASCII 拼写可混用
        for (op, spellings) in OPERATOR_SPELLINGS {
            for spelling in spellings {
                let Some(pos) = condition.find(spelling) else {
                    continue;
                };

                // 特例: = 与 ∨/or 同现 → 隐式 ∈ 条件
                if op == CompareOp::Eq && Self::has_disjunction_marker(condition) {
                    if let Some(cond) = Self::parse_implicit_in(condition, pos) {
                        return Ok(cond);
                    }
                }

                let field = &condition[..pos];
                let value_str = condition[pos + spelling.len()..].trim();
                if field.trim().is_empty() {
                    return Err(CoreError::MalformedCondition(condition.to_string()));
                }
                let value = Self::coerce_operand(value_str);
                return Ok(Condition::comparison(field, op, value, condition));
            }
        }

        Err(CoreError::MalformedCondition(condition.to_string()))
    }

    /// 操作数类型强转
    ///
    /// # 规则
    /// - 不含小数点 → i64；含小数点 → f64；其余保留文本并剥除引号
    fn coerce_operand(value_str: &str) -> Scalar {
        if value_str.contains('.') {
            if let Ok(f) = value_str.parse::<f64>() {
                return Scalar::Float(f);
            }
        } else if let Ok(i) = value_str.parse::<i64>() {
            return Scalar::Int(i);
        }
        Scalar::Text(Self::strip_quotes(value_str))
    }

    /// 隐式 ∈: "field=A ∨ field=B" → field ∈ {A, B}
    fn parse_implicit_in(condition: &str, eq_pos: usize) -> Option<Condition> {
        let field = condition[..eq_pos].trim();
        if field.is_empty() {
            return None;
        }

        let mut values = Vec::new();
        for part in Self::split_disjunction(condition) {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            // 各备选项取 = 右侧的值；无 = 的裸值直接收取
            let value = match part.find('=') {
                Some(p) => Self::strip_quotes(&part[p + 1..]),
                None => Self::strip_quotes(part),
            };
            if !value.is_empty() {
                values.push(value);
            }
        }

        if values.is_empty() {
            return None;
        }
        Some(Condition::set(field, CompareOp::In, values, condition))
    }

    /// 原子内是否含析取标记 (∨ 或大小写不敏感的 " or ")
    fn has_disjunction_marker(condition: &str) -> bool {
        condition.contains('∨') || condition.to_lowercase().contains(" or ")
    }

    /// 按 ∨ / " or " 切分原子内的备选项
    ///
    /// 逐字符扫描，" or " 关键字大小写不敏感；
    /// 不在小写副本上取字节偏移（小写化可能改变字节长度）。
    fn split_disjunction(condition: &str) -> Vec<String> {
        let mut parts = Vec::new();
        for piece in condition.split('∨') {
            let chars: Vec<char> = piece.chars().collect();
            let mut current = String::new();
            let mut i = 0;
            while i < chars.len() {
                if chars[i] == ' '
                    && chars.get(i + 1).is_some_and(|c| c.eq_ignore_ascii_case(&'o'))
                    && chars.get(i + 2).is_some_and(|c| c.eq_ignore_ascii_case(&'r'))
                    && chars.get(i + 3) == Some(&' ')
                {
                    parts.push(std::mem::take(&mut current));
                    i += 4; // " or "
                } else {
                    current.push(chars[i]);
                    i += 1;
                }
            }
            parts.push(current);
        }
        parts
    }

    /// 剥除两侧空白与引号
    fn strip_quotes(s: &str) -> String {
        s.trim().trim_matches(['"', '\'']).trim().to_string()
    }
}
