// ==========================================
// 航线舱位配置向导 - 应用状态
// ==========================================
// 职责: 管理应用级共享资源（无全局可变状态, 句柄显式传递）
// 初始化顺序:
// 1. 打开键值存储
// 2. 读取配置
// 3. 加载参考数据
// 4. 一次性加载航线预设
// 5. 创建 API
// ==========================================

use crate::api::{WizardApi, WizardOptions};
use crate::config::{ConfigManager, WizardConfigReader};
use crate::engine::route_cache::{RouteDemandCache, DEFAULT_PRESET_ROOT};
use crate::repository::{KvStore, ReferenceData, SqliteKvStore};
use std::path::PathBuf;
use std::sync::Arc;

/// 应用状态
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 参考数据目录
    pub data_dir: PathBuf,

    /// 键值存储（预设 + 配置）
    pub store: Arc<dyn KvStore>,

    /// 配置管理器
    pub config: Arc<ConfigManager>,

    /// 参考数据
    pub reference: Arc<ReferenceData>,

    /// 航线需求缓存
    pub cache: Arc<RouteDemandCache>,

    /// 向导 API
    pub wizard_api: Arc<WizardApi>,
}

impl AppState {
    /// 以 SQLite 库文件初始化
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    /// - data_dir: 参考数据目录（airports.json / aircraft.json）
    pub async fn new(db_path: String, data_dir: PathBuf) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let store: Arc<dyn KvStore> = Arc::new(
            SqliteKvStore::new(&db_path).map_err(|e| format!("无法打开预设存储: {}", e))?,
        );
        let reference = ReferenceData::load_from_dir(&data_dir)
            .map_err(|e| format!("无法加载参考数据: {}", e))?;

        let mut state = Self::with_store(store, reference).await?;
        state.db_path = db_path;
        state.data_dir = data_dir;
        Ok(state)
    }

    /// 以任意存储初始化（测试 / 嵌入使用）
    pub async fn with_store(store: Arc<dyn KvStore>, reference: ReferenceData) -> Result<Self, String> {
        let config = Arc::new(ConfigManager::new(Arc::clone(&store)));

        let preset_root = config.get_preset_root().await.unwrap_or_else(|e| {
            tracing::warn!("读取预设根路径失败(使用默认值): {}", e);
            DEFAULT_PRESET_ROOT.to_string()
        });
        let defaults = WizardOptions::default();
        let options = WizardOptions {
            autosave_presets: config.get_autosave_presets().await.unwrap_or_else(|e| {
                tracing::warn!("读取自动保存配置失败(使用默认值): {}", e);
                defaults.autosave_presets
            }),
            display_decimals: config.get_display_decimals().await.unwrap_or_else(|e| {
                tracing::warn!("读取小数位配置失败(使用默认值): {}", e);
                defaults.display_decimals
            }),
        };

        let cache = Arc::new(RouteDemandCache::with_root(Arc::clone(&store), preset_root));
        // 预设加载失败不阻塞启动, 只是没有预填
        if let Err(e) = cache.load().await {
            tracing::warn!("航线预设加载失败(将继续启动): {}", e);
        }

        let reference = Arc::new(reference);
        let wizard_api = Arc::new(WizardApi::new(
            Arc::clone(&reference),
            Arc::clone(&cache),
            options,
        ));

        tracing::info!("AppState初始化成功");
        Ok(Self {
            db_path: String::new(),
            data_dir: PathBuf::new(),
            store,
            config,
            reference,
            cache,
            wizard_api,
        })
    }
}

/// 默认数据库路径
///
/// 优先级: 环境变量 AM4_WIZARD_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var("AM4_WIZARD_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./am4_config_wizard.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("am4-config-wizard");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("am4_config_wizard.db");
        }
    }

    path.to_string_lossy().to_string()
}

/// 默认参考数据目录
///
/// 优先级: 环境变量 AM4_WIZARD_DATA_DIR > ./data
pub fn get_default_data_dir() -> PathBuf {
    match std::env::var("AM4_WIZARD_DATA_DIR") {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir.trim()),
        _ => PathBuf::from("data"),
    }
}
