// ==========================================
// 航线舱位配置向导 - 核心库
// ==========================================
// 功能: 按三舱需求与机型座位数计算单班舱位配置和日航班数
//       按无向航线保存/预填历史需求
// 技术栈: Rust + SQLite + tokio
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 键值存储 / 参考数据
pub mod repository;

// 引擎层 - 求解器与航线缓存
pub mod engine;

// 导入层 - 外部需求表
pub mod importer;

// 配置层
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 表单工作流
pub mod api;

// 应用层 - 初始化与组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{AircraftSpec, AllocationResult, Airport, DemandTriple, FareClass, RouteKey, WizardForm};
pub use engine::{allocate, normalize_key, AllocationSolver, RouteDemandCache};
pub use repository::{KvStore, MemoryKvStore, ReferenceData, SqliteKvStore};
pub use api::{WizardApi, WizardOptions};
pub use app::AppState;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "航线舱位配置向导";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
