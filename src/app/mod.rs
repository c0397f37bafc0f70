// ==========================================
// 航线舱位配置向导 - 应用层
// ==========================================
// 职责: 一次性初始化, 组装存储、参考数据、缓存与 API
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_data_dir, get_default_db_path, AppState};
