// ==========================================
// 航线舱位配置向导 - 配置读取 Trait
// ==========================================
// 职责: 定义向导所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

// ==========================================
// WizardConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从键值存储 config/* 读取）
#[async_trait]
pub trait WizardConfigReader: Send + Sync {
    /// 航线预设根路径
    ///
    /// # 默认值
    /// - "presets"
    async fn get_preset_root(&self) -> Result<String, Box<dyn Error + Send + Sync>>;

    /// 求解后是否自动保存需求预设
    ///
    /// # 默认值
    /// - true
    async fn get_autosave_presets(&self) -> Result<bool, Box<dyn Error + Send + Sync>>;

    /// 结果面板座位数保留的小数位
    ///
    /// # 默认值
    /// - 1
    async fn get_display_decimals(&self) -> Result<usize, Box<dyn Error + Send + Sync>>;
}
