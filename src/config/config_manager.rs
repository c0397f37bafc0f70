// ==========================================
// 航线舱位配置向导 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写
// 存储: 键值存储 config/{key}（与预设共用一个存储）
// ==========================================

use crate::config::wizard_config_reader::WizardConfigReader;
use crate::engine::route_cache::DEFAULT_PRESET_ROOT;
use crate::repository::error::RepositoryResult;
use crate::repository::kv_path;
use crate::repository::kv_store::KvStore;
use async_trait::async_trait;
use serde_json::Value;
use std::error::Error;
use std::sync::Arc;

/// 配置根路径
pub const CONFIG_ROOT: &str = "config";

/// 配置键
pub mod config_keys {
    pub const PRESET_ROOT: &str = "preset_root";
    pub const AUTOSAVE_PRESETS: &str = "autosave_presets";
    pub const DISPLAY_DECIMALS: &str = "display_decimals";
}

const DEFAULT_DISPLAY_DECIMALS: usize = 1;
const MAX_DISPLAY_DECIMALS: usize = 6;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    store: Arc<dyn KvStore>,
}

impl ConfigManager {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// 读取配置值; 字符串值去掉 JSON 引号, 其余按 JSON 文本返回
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub async fn get_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let path = kv_path::join(CONFIG_ROOT, key);
        let value = self.store.get(&path).await?;
        Ok(value.map(|v| match v {
            Value::String(s) => s,
            other => other.to_string(),
        }))
    }

    /// 写入配置值（按字符串保存）
    pub async fn set_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let path = kv_path::join(CONFIG_ROOT, key);
        self.store.set(&path, Value::String(value.to_string())).await?;
        tracing::info!(config_key = key, value, "配置已更新");
        Ok(())
    }

    async fn get_config_or_default(&self, key: &str, default: &str) -> RepositoryResult<String> {
        Ok(self
            .get_config_value(key)
            .await?
            .unwrap_or_else(|| default.to_string()))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

// ==========================================
// WizardConfigReader Trait 实现
// ==========================================
#[async_trait]
impl WizardConfigReader for ConfigManager {
    async fn get_preset_root(&self) -> Result<String, Box<dyn Error + Send + Sync>> {
        let value = self
            .get_config_or_default(config_keys::PRESET_ROOT, DEFAULT_PRESET_ROOT)
            .await?;
        match kv_path::validate_path(value.trim()) {
            Ok(root) => Ok(root.to_string()),
            Err(_) => {
                tracing::warn!(
                    config_key = config_keys::PRESET_ROOT,
                    raw_value = %value,
                    "预设根路径格式错误，使用默认值"
                );
                Ok(DEFAULT_PRESET_ROOT.to_string())
            }
        }
    }

    async fn get_autosave_presets(&self) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let value = self
            .get_config_or_default(config_keys::AUTOSAVE_PRESETS, "true")
            .await?;
        Ok(parse_bool(&value).unwrap_or_else(|| {
            tracing::warn!(
                config_key = config_keys::AUTOSAVE_PRESETS,
                raw_value = %value,
                "自动保存配置格式错误，使用默认值"
            );
            true
        }))
    }

    async fn get_display_decimals(&self) -> Result<usize, Box<dyn Error + Send + Sync>> {
        let value = self
            .get_config_or_default(config_keys::DISPLAY_DECIMALS, "1")
            .await?;
        Ok(value
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|d| *d <= MAX_DISPLAY_DECIMALS)
            .unwrap_or(DEFAULT_DISPLAY_DECIMALS))
    }
}
