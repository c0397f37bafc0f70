// ==========================================
// 航线舱位配置向导 - 配置层
// ==========================================
// 职责: 系统配置管理, 缺省值 + 存储覆写
// 存储: 键值存储 config/* 路径
// ==========================================

pub mod config_manager;
pub mod wizard_config_reader;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager, CONFIG_ROOT};
pub use wizard_config_reader::WizardConfigReader;
