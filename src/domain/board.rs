// ==========================================
// 板卡选型优化系统 - 板卡记录与目录快照
// ==========================================
// 职责: 只读板卡记录 (小写字段名 → 标量值) 与批次级目录快照
// 红线: 快照由调用方持有一个批次的生命周期，核心不做进程级缓存
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::channel_fields::{CHANNEL_COUNT, CHANNEL_COUNT_FIELDS};
use crate::domain::scalar::Scalar;

// ==========================================
// 板卡记录 (BoardRecord)
// ==========================================

/// 板卡记录
///
/// 目录协作方提供的扁平记录，字段名在构造期统一小写。
/// 核心只读取，不修改。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardRecord {
    /// 字段名（小写）→ 标量值
    fields: BTreeMap<String, Scalar>,
}

impl BoardRecord {
    /// 从字段序列构造记录，字段名统一小写，Null 值照存
    pub fn new<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Scalar)>,
        K: AsRef<str>,
    {
        let fields = entries
            .into_iter()
            .map(|(k, v)| (k.as_ref().trim().to_lowercase(), v))
            .collect();
        Self { fields }
    }

    /// 按字段名取值（大小写不敏感），Null 视同缺失
    pub fn get(&self, field: &str) -> Option<&Scalar> {
        self.fields
            .get(&field.trim().to_lowercase())
            .filter(|v| !v.is_null())
    }

    /// 板卡 ID（字符串形式）
    pub fn id(&self) -> String {
        self.get("id").map(|v| v.to_string()).unwrap_or_default()
    }

    /// 板卡型号
    pub fn model(&self) -> String {
        self.get("model").map(|v| v.to_string()).unwrap_or_default()
    }

    /// 板卡描述（简述缺失时回退到详述）
    pub fn description(&self) -> String {
        self.get("brief_description")
            .or_else(|| self.get("detailed_description"))
            .map(|v| v.to_string())
            .unwrap_or_default()
    }

    /// 板卡单价（元）
    pub fn price_cny(&self) -> f64 {
        self.get("price_cny").and_then(|v| v.as_f64()).unwrap_or(0.0)
    }

    /// 指定字段中是否至少一个有值
    pub fn has_any_value(&self, fields: &[String]) -> bool {
        fields.iter().any(|f| self.get(f).is_some())
    }

    /// 构建板卡通道矩阵（按 39 个通道字段的固定顺序）
    ///
    /// # 规则
    /// - 缺失或无法转为整数的值 → 0
    pub fn matrix_channel_count(&self) -> Vec<i64> {
        let mut matrix = Vec::with_capacity(CHANNEL_COUNT);
        for field in CHANNEL_COUNT_FIELDS {
            let value = self.get(field).and_then(|v| v.as_i64()).unwrap_or(0);
            matrix.push(value);
        }
        matrix
    }
}

// ==========================================
// 目录快照 (CatalogSnapshot)
// ==========================================

/// 板卡目录快照
///
/// 一个批次对目录的单次幂等读取结果，由调用方持有。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    boards: Vec<BoardRecord>,
}

impl CatalogSnapshot {
    /// 从板卡记录列表构造快照
    pub fn new(boards: Vec<BoardRecord>) -> Self {
        Self { boards }
    }

    /// 板卡记录只读视图
    pub fn boards(&self) -> &[BoardRecord] {
        &self.boards
    }

    /// 板卡数量
    pub fn len(&self) -> usize {
        self.boards.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_board() -> BoardRecord {
        BoardRecord::new(vec![
            ("ID", Scalar::Text("B001".to_string())),
            ("Model", Scalar::Text("PXI-6229".to_string())),
            ("price_cny", Scalar::Int(4200)),
            ("AD_channel_count_single_ended", Scalar::Int(32)),
            ("DA_channel_count", Scalar::Float(4.0)),
            ("brand", Scalar::Null),
        ])
    }

    #[test]
    fn test_field_lookup_case_insensitive() {
        let board = sample_board();
        assert_eq!(board.get("model"), Some(&Scalar::Text("PXI-6229".to_string())));
        assert_eq!(board.get("MODEL"), Some(&Scalar::Text("PXI-6229".to_string())));
        // Null 视同缺失
        assert_eq!(board.get("brand"), None);
        assert_eq!(board.get("missing"), None);
    }

    #[test]
    fn test_matrix_channel_count_fixed_order() {
        let board = sample_board();
        let matrix = board.matrix_channel_count();
        assert_eq!(matrix.len(), CHANNEL_COUNT);
        assert_eq!(matrix[0], 32); // AD_channel_count_single_ended
        assert_eq!(matrix[2], 4); // DA_channel_count（浮点截断）
        assert_eq!(matrix[13], 0); // UART_channel_count 缺失 → 0
    }

    #[test]
    fn test_has_any_value() {
        let board = sample_board();
        assert!(board.has_any_value(&["da_channel_count".to_string()]));
        assert!(!board.has_any_value(&["brand".to_string(), "uart_channel_count".to_string()]));
    }

    #[test]
    fn test_price_and_description_fallback() {
        let board = BoardRecord::new(vec![
            ("id", Scalar::Text("B002".to_string())),
            ("detailed_description", Scalar::Text("64路DI板卡".to_string())),
            ("price_cny", Scalar::Float(1999.5)),
        ]);
        assert_eq!(board.description(), "64路DI板卡");
        assert_eq!(board.price_cny(), 1999.5);
    }
}
