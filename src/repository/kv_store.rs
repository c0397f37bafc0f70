// ==========================================
// 航线舱位配置向导 - 键值存储接口
// ==========================================
// 契约: get(path) -> value|null / set(path, value)
// 语义:
// - get 命中叶子则返回叶子; 否则返回后代组装的子树; 都没有返回 None
// - set 覆盖叶子, 同时清除其后代和祖先叶子（保持树形一致）
// - 同一路径并发写入: 后写覆盖先写
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::kv_path::{self, assemble_subtree, validate_path};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::RwLock;

// ==========================================
// KvStore Trait
// ==========================================
// 实现者: SqliteKvStore（持久化, 按文件共享）/ MemoryKvStore（进程内）
#[async_trait]
pub trait KvStore: Send + Sync {
    /// 读取路径上的值（叶子或子树）
    async fn get(&self, path: &str) -> RepositoryResult<Option<Value>>;

    /// 写入路径上的值
    async fn set(&self, path: &str, value: Value) -> RepositoryResult<()>;
}

/// 路径的所有祖先（"a/b/c" -> ["a", "a/b"]）
pub(crate) fn ancestors(path: &str) -> Vec<&str> {
    path.match_indices(kv_path::PATH_SEPARATOR)
        .map(|(idx, _)| &path[..idx])
        .collect()
}

// ==========================================
// MemoryKvStore - 进程内存储
// ==========================================
#[derive(Default)]
pub struct MemoryKvStore {
    entries: RwLock<BTreeMap<String, Value>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前叶子数量
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, path: &str) -> RepositoryResult<Option<Value>> {
        let path = validate_path(path)?;
        let entries = self
            .entries
            .read()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        if let Some(value) = entries.get(path) {
            return Ok(Some(value.clone()));
        }

        let prefix = kv_path::subtree_prefix(path);
        let descendants = entries
            .range(prefix.clone()..)
            .take_while(|(k, _)| k.starts_with(&prefix))
            .map(|(k, v)| (k.clone(), v.clone()));

        Ok(assemble_subtree(path, descendants))
    }

    async fn set(&self, path: &str, value: Value) -> RepositoryResult<()> {
        let path = validate_path(path)?;
        let mut entries = self
            .entries
            .write()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let prefix = kv_path::subtree_prefix(path);
        entries.retain(|k, _| !k.starts_with(&prefix));
        for ancestor in ancestors(path) {
            entries.remove(ancestor);
        }
        entries.insert(path.to_string(), value);

        tracing::trace!(path, "memory kv set");
        Ok(())
    }
}
