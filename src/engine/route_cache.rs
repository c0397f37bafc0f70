// ==========================================
// 航线舱位配置向导 - 航线需求缓存
// ==========================================
// 职责: 按无向航线保存/读取最近一次录入的需求, 用于表单预填
// 存储: {root}/{routeKey} -> {y, j, f}（root 默认 "presets"）
// 红线: 只读写规范键, 同一航线不会以两种顺序各存一份
// ==========================================
// 并发: 后写覆盖先写; 读-改-写之间无原子性保证
// ==========================================

use crate::domain::types::{DemandTriple, RouteKey};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::kv_path;
use crate::repository::kv_store::KvStore;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// 预设根路径
pub const DEFAULT_PRESET_ROOT: &str = "presets";

// ==========================================
// 键与路径
// ==========================================

/// 规范化航线键, normalize_key(a, b) == normalize_key(b, a)
pub fn normalize_key(a: &str, b: &str) -> RouteKey {
    RouteKey::new(a, b)
}

fn is_blank_route(a: &str, b: &str) -> bool {
    a.trim().is_empty() || b.trim().is_empty()
}

fn preset_path(root: &str, key: &RouteKey) -> String {
    kv_path::join(root, key.as_str())
}

fn decode_demand(path: &str, value: Value) -> RepositoryResult<DemandTriple> {
    serde_json::from_value(value).map_err(|e| RepositoryError::MalformedValue {
        path: path.to_string(),
        message: e.to_string(),
    })
}

fn encode_demand(demand: &DemandTriple) -> RepositoryResult<Value> {
    Ok(serde_json::to_value(demand)?)
}

// ==========================================
// 无状态操作（直接作用于存储）
// ==========================================

/// 读取航线预设（任一端为空时视为未找到）
pub async fn lookup(store: &dyn KvStore, a: &str, b: &str) -> RepositoryResult<Option<DemandTriple>> {
    lookup_in(store, DEFAULT_PRESET_ROOT, a, b).await
}

/// 写入/覆盖航线预设
pub async fn upsert(
    store: &dyn KvStore,
    a: &str,
    b: &str,
    demand: &DemandTriple,
) -> RepositoryResult<()> {
    upsert_in(store, DEFAULT_PRESET_ROOT, a, b, demand).await
}

/// 在指定根路径下读取航线预设
pub async fn lookup_in(
    store: &dyn KvStore,
    root: &str,
    a: &str,
    b: &str,
) -> RepositoryResult<Option<DemandTriple>> {
    if is_blank_route(a, b) {
        return Ok(None);
    }
    let path = preset_path(root, &normalize_key(a, b));
    match store.get(&path).await? {
        Some(value) => decode_demand(&path, value).map(Some),
        None => Ok(None),
    }
}

/// 在指定根路径下写入航线预设
pub async fn upsert_in(
    store: &dyn KvStore,
    root: &str,
    a: &str,
    b: &str,
    demand: &DemandTriple,
) -> RepositoryResult<()> {
    if is_blank_route(a, b) {
        return Err(RepositoryError::InvalidPath(format!(
            "航线端点为空: '{}' / '{}'",
            a, b
        )));
    }
    let path = preset_path(root, &normalize_key(a, b));
    store.set(&path, encode_demand(demand)?).await
}

// ==========================================
// PresetWriteHandle - 后台写入句柄
// ==========================================
// 仅用于日志/遥测, 不应用来阻塞后续界面状态
pub struct PresetWriteHandle {
    key: RouteKey,
    handle: JoinHandle<RepositoryResult<()>>,
}

impl PresetWriteHandle {
    pub fn key(&self) -> &RouteKey {
        &self.key
    }

    /// 等待写入结束, 返回是否成功（失败已在后台记录日志）
    pub async fn finished(self) -> bool {
        match self.handle.await {
            Ok(Ok(())) => true,
            Ok(Err(_)) => false,
            Err(e) => {
                tracing::warn!(route = %self.key, error = %e, "预设写入任务异常终止");
                false
            }
        }
    }
}

// ==========================================
// RouteDemandCache - 显式传递的缓存句柄
// ==========================================
// 初始化: load() 一次性读取整个预设子树到快照
// 读取: lookup() 以存储为准并刷新快照; cached() 只读快照
// 写入: upsert() 等待存储; upsert_detached() 不等待
pub struct RouteDemandCache {
    store: Arc<dyn KvStore>,
    root: String,
    snapshot: RwLock<HashMap<RouteKey, DemandTriple>>,
}

impl RouteDemandCache {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self::with_root(store, DEFAULT_PRESET_ROOT)
    }

    pub fn with_root(store: Arc<dyn KvStore>, root: impl Into<String>) -> Self {
        Self {
            store,
            root: root.into(),
            snapshot: RwLock::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// 一次性加载预设子树, 替换快照
    ///
    /// # 说明
    /// - 非规范顺序的旧键会被重新规范化
    /// - 无分隔符的键或格式错误的值被跳过并记录日志
    ///
    /// # 返回
    /// 快照中的航线数
    pub async fn load(&self) -> RepositoryResult<usize> {
        let tree = self.store.get(&self.root).await?;

        let mut loaded = HashMap::new();
        if let Some(Value::Object(entries)) = tree {
            for (raw_key, value) in entries {
                let Some(key) = RouteKey::parse(&raw_key) else {
                    tracing::debug!(raw_key = %raw_key, "忽略无法识别的预设键");
                    continue;
                };
                let path = kv_path::join(&self.root, &raw_key);
                match decode_demand(&path, value) {
                    Ok(demand) => {
                        loaded.insert(key, demand);
                    }
                    Err(e) => tracing::warn!(error = %e, "忽略格式错误的预设"),
                }
            }
        }

        let count = loaded.len();
        let mut snapshot = self
            .snapshot
            .write()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        *snapshot = loaded;

        tracing::info!(root = %self.root, presets = count, "航线预设加载完成");
        Ok(count)
    }

    /// 只读快照
    pub fn cached(&self, a: &str, b: &str) -> Option<DemandTriple> {
        if is_blank_route(a, b) {
            return None;
        }
        let key = normalize_key(a, b);
        self.snapshot.read().ok()?.get(&key).copied()
    }

    /// 从存储读取, 命中时刷新快照
    pub async fn lookup(&self, a: &str, b: &str) -> RepositoryResult<Option<DemandTriple>> {
        let found = lookup_in(self.store.as_ref(), &self.root, a, b).await?;
        if let Some(demand) = found {
            self.remember(normalize_key(a, b), demand);
        }
        Ok(found)
    }

    /// 写入存储并更新快照
    pub async fn upsert(&self, a: &str, b: &str, demand: DemandTriple) -> RepositoryResult<()> {
        upsert_in(self.store.as_ref(), &self.root, a, b, &demand).await?;
        self.remember(normalize_key(a, b), demand);
        Ok(())
    }

    /// 更新快照并在后台写入存储（调用方无需等待）
    ///
    /// 任一端为空, 或当前不在 tokio 运行时内时不写入, 返回 None
    pub fn upsert_detached(&self, a: &str, b: &str, demand: DemandTriple) -> Option<PresetWriteHandle> {
        if is_blank_route(a, b) {
            tracing::debug!("航线不完整, 跳过预设写入");
            return None;
        }
        let key = normalize_key(a, b);
        self.remember(key.clone(), demand);

        let runtime = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(route = %key, error = %e, "无异步运行时, 预设未写入存储");
                return None;
            }
        };

        let store = Arc::clone(&self.store);
        let path = preset_path(&self.root, &key);
        let route = key.clone();
        let handle = runtime.spawn(async move {
            let result = match encode_demand(&demand) {
                Ok(value) => store.set(&path, value).await,
                Err(e) => Err(e),
            };
            match &result {
                Ok(()) => tracing::debug!(route = %route, %demand, "预设已写入"),
                Err(e) => tracing::warn!(route = %route, error = %e, "预设写入失败, 本次更新丢失"),
            }
            result
        });

        Some(PresetWriteHandle { key, handle })
    }

    /// 快照中的航线数
    pub fn len(&self) -> usize {
        self.snapshot.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn remember(&self, key: RouteKey, demand: DemandTriple) {
        match self.snapshot.write() {
            Ok(mut snapshot) => {
                snapshot.insert(key, demand);
            }
            Err(e) => tracing::warn!(error = %e, "快照锁获取失败"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::kv_store::MemoryKvStore;
    use async_trait::async_trait;
    use serde_json::json;

    /// 所有操作都失败的存储
    struct FailingStore;

    #[async_trait]
    impl KvStore for FailingStore {
        async fn get(&self, _path: &str) -> RepositoryResult<Option<Value>> {
            Err(RepositoryError::DatabaseConnectionError("offline".to_string()))
        }

        async fn set(&self, _path: &str, _value: Value) -> RepositoryResult<()> {
            Err(RepositoryError::DatabaseConnectionError("offline".to_string()))
        }
    }

    #[test]
    fn test_normalize_key_symmetry() {
        let pairs = [("FRA", "MUC"), ("JFK", "JFK"), ("LHR", "AMS"), ("", "CDG")];
        for (a, b) in pairs {
            assert_eq!(normalize_key(a, b), normalize_key(b, a));
        }
    }

    #[tokio::test]
    async fn test_round_trip_both_orders() {
        let store = MemoryKvStore::new();
        let demand = DemandTriple::new(100, 20, 10);

        upsert(&store, "MUC", "FRA", &demand).await.unwrap();

        assert_eq!(lookup(&store, "MUC", "FRA").await.unwrap(), Some(demand));
        assert_eq!(lookup(&store, "FRA", "MUC").await.unwrap(), Some(demand));
        assert_eq!(
            store.get("presets/FRA_MUC").await.unwrap(),
            Some(json!({"y": 100, "j": 20, "f": 10}))
        );
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_lookup_checks_only_canonical_key() {
        let store = MemoryKvStore::new();
        store.set("presets/MUC_FRA", json!({"y": 1, "j": 1, "f": 1})).await.unwrap();

        assert_eq!(lookup(&store, "MUC", "FRA").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_blank_route() {
        let store = MemoryKvStore::new();
        assert_eq!(lookup(&store, "", "FRA").await.unwrap(), None);
        assert!(upsert(&store, "FRA", " ", &DemandTriple::new(1, 0, 0)).await.is_err());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_preset_is_error() {
        let store = MemoryKvStore::new();
        store.set("presets/FRA_MUC", json!("oops")).await.unwrap();
        assert!(matches!(
            lookup(&store, "FRA", "MUC").await,
            Err(RepositoryError::MalformedValue { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_rekeys_and_skips_bad_entries() {
        let store = Arc::new(MemoryKvStore::new());
        store.set("presets/MUC_FRA", json!({"y": 5, "j": 1, "f": 0})).await.unwrap();
        store.set("presets/JFK_LHR", json!({"y": 300, "j": 40, "f": 12})).await.unwrap();
        store.set("presets/NODELIM", json!({"y": 1, "j": 1, "f": 1})).await.unwrap();
        store.set("presets/CDG_NCE", json!([1, 2])).await.unwrap();

        let cache = RouteDemandCache::new(store);
        assert_eq!(cache.load().await.unwrap(), 2);
        assert_eq!(cache.cached("FRA", "MUC"), Some(DemandTriple::new(5, 1, 0)));
        assert_eq!(cache.cached("LHR", "JFK"), Some(DemandTriple::new(300, 40, 12)));
        assert_eq!(cache.cached("CDG", "NCE"), None);
    }

    #[tokio::test]
    async fn test_load_empty_store() {
        let cache = RouteDemandCache::new(Arc::new(MemoryKvStore::new()));
        assert_eq!(cache.load().await.unwrap(), 0);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_cache_upsert_updates_snapshot_and_store() {
        let store = Arc::new(MemoryKvStore::new());
        let cache = RouteDemandCache::with_root(store.clone(), "shared/presets");
        let demand = DemandTriple::new(80, 8, 2);

        cache.upsert("AMS", "LHR", demand).await.unwrap();

        assert_eq!(cache.cached("LHR", "AMS"), Some(demand));
        assert_eq!(
            lookup_in(store.as_ref(), "shared/presets", "LHR", "AMS").await.unwrap(),
            Some(demand)
        );
    }

    #[tokio::test]
    async fn test_detached_write_lands_in_store() {
        let store = Arc::new(MemoryKvStore::new());
        let cache = RouteDemandCache::new(store.clone());
        let demand = DemandTriple::new(100, 20, 10);

        let handle = cache.upsert_detached("MUC", "FRA", demand).unwrap();
        assert_eq!(handle.key().as_str(), "FRA_MUC");
        assert_eq!(cache.cached("FRA", "MUC"), Some(demand));

        assert!(handle.finished().await);
        assert_eq!(lookup(store.as_ref(), "FRA", "MUC").await.unwrap(), Some(demand));
    }

    #[tokio::test]
    async fn test_detached_write_failure_is_swallowed() {
        let cache = RouteDemandCache::new(Arc::new(FailingStore));
        let demand = DemandTriple::new(1, 2, 3);

        let handle = cache.upsert_detached("MUC", "FRA", demand).unwrap();
        assert!(!handle.finished().await);
        // 快照仍保留本次录入
        assert_eq!(cache.cached("MUC", "FRA"), Some(demand));
        assert!(cache.upsert_detached("", "FRA", demand).is_none());
    }

    #[test]
    fn test_detached_write_without_runtime_is_skipped() {
        let cache = RouteDemandCache::new(Arc::new(MemoryKvStore::new()));
        let demand = DemandTriple::new(1, 2, 3);

        assert!(cache.upsert_detached("MUC", "FRA", demand).is_none());
        assert_eq!(cache.cached("MUC", "FRA"), Some(demand));
    }

    #[tokio::test]
    async fn test_lookup_refreshes_snapshot() {
        let store = Arc::new(MemoryKvStore::new());
        let cache = RouteDemandCache::new(store.clone());
        cache.load().await.unwrap();

        upsert(store.as_ref(), "FRA", "MUC", &DemandTriple::new(9, 9, 9)).await.unwrap();
        assert_eq!(cache.cached("FRA", "MUC"), None);

        assert_eq!(cache.lookup("MUC", "FRA").await.unwrap(), Some(DemandTriple::new(9, 9, 9)));
        assert_eq!(cache.cached("FRA", "MUC"), Some(DemandTriple::new(9, 9, 9)));
    }

    #[tokio::test]
    async fn test_failing_store_propagates_on_lookup() {
        let cache = RouteDemandCache::new(Arc::new(FailingStore));
        assert!(cache.load().await.is_err());
        assert!(cache.lookup("FRA", "MUC").await.is_err());
    }
}
