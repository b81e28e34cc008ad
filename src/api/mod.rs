// ==========================================
// 板卡选型优化系统 - 对外批处理接口层
// ==========================================

pub mod dto;
pub mod selection_api;

pub use selection_api::SelectionApi;
