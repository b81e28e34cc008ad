// ==========================================
// 板卡选型优化系统 - 批处理流水线
// ==========================================
// 职责: 解析 → 匹配 → 聚合 → 优化的单批次编排
// 红线: 目录为空时整批失败，不产出部分结果；
//       单条需求解析失败只跳过该条，不影响同批其余需求
// ==========================================

use chrono::Local;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::dto::{BatchOutput, MatchRecord, ProcessingInfo, RequirementInput};
use crate::domain::board::CatalogSnapshot;
use crate::engine::aggregator::RequirementAggregator;
use crate::engine::expr_parser::ExpressionParser;
use crate::engine::matcher::{MatchingEngine, RequirementSpec};
use crate::engine::optimizer::{CandidateBoard, ProcurementPlan, SelectionOptimizer};
use crate::error::{CoreError, CoreResult};

// ==========================================
// SelectionApi - 批处理入口
// ==========================================
pub struct SelectionApi;

impl SelectionApi {
    /// 处理一批需求并生成采购方案
    ///
    /// # 步骤
    /// 1. 逐条需求: 解析 DNF → 提取字段与需求规格 → 对候选板卡逐一打分
    /// 2. 聚合各需求的通道阈值为需求向量
    /// 3. 从 100% 匹配集构建去重候选行（保持目录顺序）
    /// 4. 有候选则调优化器求解，无候选则给出结构化失败结果
    ///
    /// # 错误
    /// - 目录为空 → `CatalogUnavailable`（整批失败）
    /// - 形状类校验错误由优化器透传
    pub fn process_batch(
        catalog: &CatalogSnapshot,
        requirements: &[RequirementInput],
    ) -> CoreResult<BatchOutput> {
        if catalog.is_empty() {
            return Err(CoreError::CatalogUnavailable("板卡目录为空".to_string()));
        }
        info!(
            "开始批处理: {} 条需求, {} 块板卡",
            requirements.len(),
            catalog.len()
        );

        let mut matched_boards: Vec<MatchRecord> = Vec::new();
        let mut specs: Vec<RequirementSpec> = Vec::new();
        let mut candidate_ids: BTreeSet<String> = BTreeSet::new();
        let mut full_match_ids: BTreeSet<String> = BTreeSet::new();
        let mut originals_by_board: BTreeMap<String, Vec<String>> = BTreeMap::new();

        // 1. 逐条需求匹配
        for (index, requirement) in requirements.iter().enumerate() {
            let requirement_id = Self::requirement_id(requirement, index);
            if requirement.dnf.trim().is_empty() {
                warn!("需求 {} 的 DNF 为空，跳过", requirement_id);
                continue;
            }

            let dnf = ExpressionParser::parse(&requirement.dnf);
            if dnf.is_empty() {
                warn!("需求 {} 的 DNF 无可用合取项，跳过", requirement_id);
                continue;
            }

            let fields = MatchingEngine::extract_fields(&dnf);
            let requirement_spec = MatchingEngine::extract_requirement_specification(&dnf);
            specs.push(requirement_spec.clone());

            for board in MatchingEngine::boards_with_values(catalog, &fields) {
                let board_id = board.id();
                let compliance = MatchingEngine::build_compliance(board, &dnf);
                let match_percentage = MatchingEngine::match_percentage(&compliance);
                candidate_ids.insert(board_id.clone());

                if match_percentage == 100 {
                    full_match_ids.insert(board_id.clone());
                    // 相同需求原文不重复累积
                    let originals = originals_by_board.entry(board_id.clone()).or_default();
                    if !originals.contains(&requirement.original) {
                        originals.push(requirement.original.clone());
                    }
                }

                matched_boards.push(MatchRecord {
                    id: board_id,
                    requirement_id: requirement_id.clone(),
                    model: board.model(),
                    description: board.description(),
                    original: requirement.original.clone(),
                    match_percentage,
                    requirement_specification: requirement_spec.clone(),
                    board_specification: MatchingEngine::extract_board_specification(
                        board,
                        &requirement_spec,
                    ),
                    compliance,
                });
            }
        }

        // 2. 聚合通道需求向量
        let linprog_requirements = RequirementAggregator::aggregate(&specs);

        // 3. 候选行去重（按目录顺序，仅 100% 匹配的板卡）
        let mut linprog_input_data: Vec<CandidateBoard> = Vec::new();
        let mut added: BTreeSet<String> = BTreeSet::new();
        for board in catalog.boards() {
            let board_id = board.id();
            if !full_match_ids.contains(&board_id) || !added.insert(board_id.clone()) {
                continue;
            }
            linprog_input_data.push(CandidateBoard {
                id: board_id.clone(),
                matrix_channel_count: board.matrix_channel_count(),
                model: board.model(),
                price_cny: board.price_cny(),
                original: originals_by_board.remove(&board_id).unwrap_or_default(),
            });
        }

        // 4. 优化求解
        let optimization = if linprog_input_data.is_empty() {
            warn!("无 100% 匹配的候选板卡，跳过优化求解");
            ProcurementPlan::no_candidates()
        } else {
            SelectionOptimizer::optimize(&linprog_input_data, &linprog_requirements)?
        };

        info!(
            "批处理完成: {} 条需求, 候选 {} 块, 完全匹配 {} 块, 求解 {}",
            requirements.len(),
            candidate_ids.len(),
            full_match_ids.len(),
            if optimization.success { "成功" } else { "失败" }
        );

        Ok(BatchOutput {
            timestamp: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            linprog_requirements,
            total_candidates: candidate_ids.len(),
            total_matches: full_match_ids.len(),
            processing_info: ProcessingInfo {
                requirements_processed: requirements.len(),
                boards_found: linprog_input_data.len(),
                matches_made: matched_boards.len(),
            },
            linprog_input_data,
            matched_boards,
            optimization,
        })
    }

    /// 需求 ID: 调用方指定优先，缺省合成 "req_<序号>_<uuid前8位>"
    fn requirement_id(requirement: &RequirementInput, index: usize) -> String {
        match &requirement.id {
            Some(id) if !id.trim().is_empty() => id.clone(),
            _ => {
                let uuid = Uuid::new_v4().simple().to_string();
                format!("req_{}_{}", index, &uuid[..8])
            }
        }
    }
}
