// ==========================================
// 板卡选型优化系统 - 标量值类型
// ==========================================
// 职责: 目录字段的动态类型槽 (整数/浮点/文本/列表/空)
// 红线: 所有类型转换走显式 match 分支，不做隐式探测
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 目录字段标量值
///
/// 板卡记录的每个字段存放一个 Scalar。
/// 序列化为无标签形式，与目录 JSON 的原生值一一对应。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// 整数
    Int(i64),
    /// 浮点数
    Float(f64),
    /// 文本
    Text(String),
    /// 列表（例如接口类型清单）
    List(Vec<Scalar>),
    /// 空值
    Null,
}

impl Scalar {
    /// 是否为空值
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// 数值视图
    ///
    /// # 规则
    /// - 仅 Int/Float 可参与有序数值比较，文本不做数值强转
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// 整数视图（用于通道矩阵构建）
    ///
    /// # 规则
    /// - Int 直接取值，Float 截断取整
    /// - 纯数字文本按整数解析，其余 → None
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            Scalar::Float(f) => Some(*f as i64),
            Scalar::Text(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Text(s) => write!(f, "{}", s),
            Scalar::List(items) => {
                let parts: Vec<String> = items.iter().map(|s| s.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Scalar::Null => write!(f, ""),
        }
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Text(v)
    }
}
