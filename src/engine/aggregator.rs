// ==========================================
// 板卡选型优化系统 - 需求聚合器
// ==========================================
// 职责: 将多条需求的通道阈值折叠为固定顺序的需求向量
// 规则: 同通道取最大阈值（不累加），未涉及的槽位为 0
// ==========================================

use crate::domain::channel_fields::{is_channel_count_field, CHANNEL_COUNT_FIELDS};
use crate::engine::matcher::RequirementSpec;
use std::collections::BTreeMap;

// ==========================================
// RequirementAggregator - 纯函数聚合器
// ==========================================
pub struct RequirementAggregator;

impl RequirementAggregator {
    /// 聚合各需求的通道阈值为需求向量（39 个槽位，全局固定顺序）
    ///
    /// # 规则
    /// - 仅统计通道计数字段上的正数值阈值
    /// - 多条需求引用同一通道时取最大值，不叠加（最紧需求为准）
    /// - 未被引用的通道槽位为 0
    pub fn aggregate(specs: &[RequirementSpec]) -> Vec<i64> {
        let mut counts: BTreeMap<String, i64> = BTreeMap::new();

        for spec in specs {
            for (field, entry) in spec {
                if !is_channel_count_field(field) {
                    continue;
                }
                let Some(value) = entry.value.as_ref().and_then(|v| v.as_f64()) else {
                    continue;
                };
                if value > 0.0 {
                    let slot = counts.entry(field.clone()).or_insert(0);
                    *slot = (*slot).max(value as i64);
                }
            }
        }

        CHANNEL_COUNT_FIELDS
            .iter()
            .map(|f| counts.get(&f.to_lowercase()).copied().unwrap_or(0))
            .collect()
    }
}
