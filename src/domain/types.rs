// ==========================================
// 板卡选型优化系统 - 领域类型定义
// ==========================================
// 职责: 比较操作符、原子条件、合取项与 DNF
// 红线: 字段名在解析期统一小写，下游查找全部按小写进行
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::scalar::Scalar;

// ==========================================
// 比较操作符 (Compare Operator)
// ==========================================
// 序列化为 Unicode 拼写，与需求规格的线上格式一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    /// 大于等于
    #[serde(rename = "≥")]
    Ge,
    /// 小于等于
    #[serde(rename = "≤")]
    Le,
    /// 大于
    #[serde(rename = ">")]
    Gt,
    /// 小于
    #[serde(rename = "<")]
    Lt,
    /// 等于
    #[serde(rename = "=")]
    Eq,
    /// 不等于
    #[serde(rename = "≠")]
    Ne,
    /// 集合包含（操作数为集合）
    #[serde(rename = "⊇")]
    Superset,
    /// 集合成员（操作数为允许值列表）
    #[serde(rename = "∈")]
    In,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompareOp::Ge => "≥",
            CompareOp::Le => "≤",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Eq => "=",
            CompareOp::Ne => "≠",
            CompareOp::Superset => "⊇",
            CompareOp::In => "∈",
        };
        write!(f, "{}", s)
    }
}

// ==========================================
// 操作数 (Operand)
// ==========================================
// 不变式: ⊇/∈ 携带集合操作数，其余操作符携带标量操作数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    /// 标量操作数
    Value(Scalar),
    /// 集合操作数（⊇/∈）
    Values(Vec<String>),
}

// ==========================================
// 原子条件 (Condition)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// 字段名（已小写）
    pub field: String,

    /// 操作符
    pub operator: CompareOp,

    /// 操作数
    pub operand: Operand,

    /// 原始条件文本（诊断与覆盖统计用）
    pub raw: String,
}

impl Condition {
    /// 构造比较类条件
    pub fn comparison(field: &str, operator: CompareOp, value: Scalar, raw: &str) -> Self {
        Self {
            field: field.trim().to_lowercase(),
            operator,
            operand: Operand::Value(value),
            raw: raw.trim().to_string(),
        }
    }

    /// 构造集合类条件（⊇/∈）
    pub fn set(field: &str, operator: CompareOp, values: Vec<String>, raw: &str) -> Self {
        Self {
            field: field.trim().to_lowercase(),
            operator,
            operand: Operand::Values(values),
            raw: raw.trim().to_string(),
        }
    }

    /// 标量操作数视图
    pub fn value(&self) -> Option<&Scalar> {
        match &self.operand {
            Operand::Value(v) => Some(v),
            Operand::Values(_) => None,
        }
    }

    /// 集合操作数视图
    pub fn values(&self) -> Option<&[String]> {
        match &self.operand {
            Operand::Values(v) => Some(v.as_slice()),
            Operand::Value(_) => None,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.operand {
            Operand::Value(v) => write!(f, "{}{}{}", self.field, self.operator, v),
            Operand::Values(vs) => {
                write!(f, "{}{}{{{}}}", self.field, self.operator, vs.join(", "))
            }
        }
    }
}

// ==========================================
// 合取项与 DNF
// ==========================================

/// 合取项：条件列表，语义为 AND
pub type Clause = Vec<Condition>;

/// 析取范式：合取项列表，语义为 OR
pub type Dnf = Vec<Clause>;
